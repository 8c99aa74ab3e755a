/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::ops::RangeInclusive;

pub const PORT_RANGE: RangeInclusive<usize> = 1..=65535;

pub const ORG_SLUG_LENGTH: usize = 12;
pub const TASK_SLUG_LENGTH: usize = 8;

pub const INVITATION_TTL_DAYS: i64 = 7;

pub const PROVIDER_GITHUB: &str = "github";
pub const GITHUB_API_BASE: &str = "https://api.github.com";
