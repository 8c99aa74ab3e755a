/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Tests for input validation and parsing functions

extern crate core as trellis_core;
use trellis_core::input::*;

#[test]
fn test_port_in_range() {
    let port = port_in_range("8080").unwrap();
    assert_eq!(port, 8080);

    let port = port_in_range("65535").unwrap();
    assert_eq!(port, 65535);

    let port = port_in_range("65536").unwrap_err();
    assert_eq!(port, "port not in range 1-65535");

    let port = port_in_range("0").unwrap_err();
    assert_eq!(port, "port not in range 1-65535");

    let port = port_in_range("not-a-port").unwrap_err();
    assert_eq!(port, "`not-a-port` is not a port number");
}

#[test]
fn test_generate_slug() {
    let slug = generate_slug(12);
    assert_eq!(slug.len(), 12);
    assert!(
        slug.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    );

    assert!(generate_slug(0).is_empty());
}

#[test]
fn test_slugify() {
    assert_eq!(slugify("Website Redesign"), "website-redesign");
    assert_eq!(slugify("  Q3 / Launch!!"), "q3-launch");
    assert_eq!(slugify("already-a-slug"), "already-a-slug");
    assert_eq!(slugify("---"), "");
    assert_eq!(slugify(""), "");
}

#[test]
fn test_slugify_output_is_valid_slug() {
    for name in ["Website Redesign", "A", "x  y  z", "Über Project 9"] {
        let slug = slugify(name);
        if !slug.is_empty() {
            assert!(check_slug(&slug).is_ok(), "invalid slug from {:?}", name);
        }
    }
}

#[test]
fn test_check_slug() {
    assert!(check_slug("my-project").is_ok());
    assert!(check_slug("p1").is_ok());

    assert!(check_slug("").is_err());
    assert!(check_slug("My-Project").is_err());
    assert!(check_slug("has_underscore").is_err());
    assert!(check_slug("-leading").is_err());
    assert!(check_slug("trailing-").is_err());
}

#[test]
fn test_validate_display_name() {
    assert!(validate_display_name("Website Redesign").is_ok());

    assert!(validate_display_name("").is_err());
    assert!(validate_display_name("   ").is_err());
    assert!(validate_display_name(&"x".repeat(101)).is_err());
}
