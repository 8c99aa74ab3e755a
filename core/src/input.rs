/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use rand::Rng;

use super::consts::*;

pub fn port_in_range(s: &str) -> Result<u16, String> {
    let port: usize = s
        .parse()
        .map_err(|_| format!("`{s}` is not a port number"))?;

    if PORT_RANGE.contains(&port) {
        Ok(port as u16)
    } else {
        Err(format!(
            "port not in range {}-{}",
            PORT_RANGE.start(),
            PORT_RANGE.end()
        ))
    }
}

pub fn load_secret(f: &str) -> String {
    let s = std::fs::read_to_string(f).unwrap_or_default();
    s.trim().to_string()
}

/// Random lowercase alphanumeric slug, used for organization and task slugs.
pub fn generate_slug(length: usize) -> String {
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Derives a url-safe slug from a display name. Empty input yields an
/// empty string; callers append a random suffix on collision.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }

    slug.trim_end_matches('-').to_string()
}

pub fn check_slug(s: &str) -> Result<(), String> {
    if s.is_empty() {
        return Err("Slug cannot be empty".to_string());
    }

    if s != s.to_lowercase() {
        return Err("Slug must be lowercase".to_string());
    }

    if s.contains(|c: char| !c.is_ascii_alphanumeric() && c != '-') {
        return Err("Slug can only contain letters, numbers, and dashes".to_string());
    }

    if s.starts_with('-') || s.ends_with('-') {
        return Err("Slug can only start and end with letters or numbers".to_string());
    }

    Ok(())
}

pub fn validate_display_name(s: &str) -> Result<(), String> {
    if s.trim().is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    if s.len() > 100 {
        return Err("Name cannot exceed 100 characters".to_string());
    }

    Ok(())
}
