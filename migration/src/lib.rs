/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub use sea_orm_migration::prelude::*;

mod m20250310_100000_create_table_user;
mod m20250310_100010_create_table_organization;
mod m20250310_100020_create_table_member;
mod m20250310_100030_create_table_project;
mod m20250310_100040_create_table_project_member;
mod m20250310_100050_create_table_task;
mod m20250310_100060_create_table_task_member;
mod m20250310_100070_create_table_sub_task;
mod m20250310_100080_create_table_invitation;
mod m20250310_100090_create_table_file;
mod m20250310_100100_create_table_provider;
mod m20250310_100110_create_table_session;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250310_100000_create_table_user::Migration),
            Box::new(m20250310_100010_create_table_organization::Migration),
            Box::new(m20250310_100020_create_table_member::Migration),
            Box::new(m20250310_100030_create_table_project::Migration),
            Box::new(m20250310_100040_create_table_project_member::Migration),
            Box::new(m20250310_100050_create_table_task::Migration),
            Box::new(m20250310_100060_create_table_task_member::Migration),
            Box::new(m20250310_100070_create_table_sub_task::Migration),
            Box::new(m20250310_100080_create_table_invitation::Migration),
            Box::new(m20250310_100090_create_table_file::Migration),
            Box::new(m20250310_100100_create_table_provider::Migration),
            Box::new(m20250310_100110_create_table_session::Migration),
        ]
    }
}
