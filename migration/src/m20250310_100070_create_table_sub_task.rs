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
                    .table(SubTask::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SubTask::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(SubTask::Task).uuid().not_null())
                    .col(ColumnDef::new(SubTask::Title).string().not_null())
                    .col(
                        ColumnDef::new(SubTask::Done)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(SubTask::DoneAt).date_time())
                    .col(ColumnDef::new(SubTask::OrderIndex).integer().not_null())
                    .col(ColumnDef::new(SubTask::CreatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sub_task-task")
                            .from(SubTask::Table, SubTask::Task)
                            .to(Task::Table, Task::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SubTask::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SubTask {
    Table,
    Id,
    Task,
    Title,
    Done,
    DoneAt,
    OrderIndex,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Task {
    Table,
    Id,
}
