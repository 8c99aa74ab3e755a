/*
 * SPDX-FileCopyrightText: 2025 Trellis Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TaskMember::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TaskMember::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TaskMember::Task).uuid().not_null())
                    .col(ColumnDef::new(TaskMember::User).uuid().not_null())
                    .col(ColumnDef::new(TaskMember::Role).string_len(16).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-task_member-task")
                            .from(TaskMember::Table, TaskMember::Task)
                            .to(Task::Table, Task::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-task_member-user")
                            .from(TaskMember::Table, TaskMember::User)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-task_member-task-user")
                    .table(TaskMember::Table)
                    .col(TaskMember::Task)
                    .col(TaskMember::User)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TaskMember::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TaskMember {
    Table,
    Id,
    Task,
    User,
    Role,
}

#[derive(DeriveIden)]
enum Task {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
