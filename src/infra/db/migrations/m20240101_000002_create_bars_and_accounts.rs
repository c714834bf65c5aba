//! Migration: bars and accounts.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_roles_table::Roles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bars::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bars::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Bars::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Bars::Address).string_len(500).null())
                    .col(
                        ColumnDef::new(Bars::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Accounts::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Accounts::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Accounts::FullName).string_len(255).not_null())
                    .col(ColumnDef::new(Accounts::Phone).string_len(20).null())
                    .col(ColumnDef::new(Accounts::BarId).uuid().null())
                    .col(ColumnDef::new(Accounts::RoleId).uuid().not_null())
                    .col(
                        ColumnDef::new(Accounts::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_accounts_role")
                            .from(Accounts::Table, Accounts::RoleId)
                            .to(Roles::Table, Roles::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_accounts_bar")
                            .from(Accounts::Table, Accounts::BarId)
                            .to(Bars::Table, Bars::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bars::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Bars {
    Table,
    Id,
    Name,
    Address,
    CreatedAt,
}

#[derive(Iden)]
pub enum Accounts {
    Table,
    Id,
    Email,
    PasswordHash,
    FullName,
    Phone,
    BarId,
    RoleId,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
