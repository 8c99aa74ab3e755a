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
                    .table(Member::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Member::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Member::Organization).uuid().not_null())
                    .col(ColumnDef::new(Member::User).uuid().not_null())
                    .col(ColumnDef::new(Member::Role).string_len(16).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-member-organization")
                            .from(Member::Table, Member::Organization)
                            .to(Organization::Table, Organization::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-member-user")
                            .from(Member::Table, Member::User)
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
                    .name("idx-member-organization-user")
                    .table(Member::Table)
                    .col(Member::Organization)
                    .col(Member::User)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One owner per organization, enforced by the database rather than
        // by check-then-act in the handlers.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-member-one-owner")
                    .table(Member::Table)
                    .col(Member::Organization)
                    .unique()
                    .and_where(Expr::col(Member::Role).eq("owner"))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Member::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Member {
    Table,
    Id,
    Organization,
    User,
    Role,
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
