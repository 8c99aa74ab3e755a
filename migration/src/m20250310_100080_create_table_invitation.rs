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
                    .table(Invitation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Invitation::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Invitation::Organization).uuid().not_null())
                    .col(ColumnDef::new(Invitation::Email).string().not_null())
                    .col(ColumnDef::new(Invitation::Role).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Invitation::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Invitation::InvitedBy).uuid())
                    .col(ColumnDef::new(Invitation::ExpiresAt).date_time().not_null())
                    .col(ColumnDef::new(Invitation::CreatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-invitation-organization")
                            .from(Invitation::Table, Invitation::Organization)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-invitation-invited_by")
                            .from(Invitation::Table, Invitation::InvitedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one pending invitation per organization and email.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-invitation-pending")
                    .table(Invitation::Table)
                    .col(Invitation::Organization)
                    .col(Invitation::Email)
                    .unique()
                    .and_where(Expr::col(Invitation::Status).eq("pending"))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Invitation::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Invitation {
    Table,
    Id,
    Organization,
    Email,
    Role,
    Status,
    InvitedBy,
    ExpiresAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Organization {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
