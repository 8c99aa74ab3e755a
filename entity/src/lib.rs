/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod file;
pub mod invitation;
pub mod member;
pub mod organization;
pub mod project;
pub mod project_member;
pub mod provider;
pub mod session;
pub mod sub_task;
pub mod task;
pub mod task_member;
pub mod user;
