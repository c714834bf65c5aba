//! Migration: bookings and the payments made for them.

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_bars_and_accounts::{Accounts, Bars};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bookings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Bookings::AccountId).uuid().not_null())
                    .col(ColumnDef::new(Bookings::BarId).uuid().not_null())
                    .col(ColumnDef::new(Bookings::BookingDate).date().not_null())
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_account")
                            .from(Bookings::Table, Bookings::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_bar")
                            .from(Bookings::Table, Bookings::BarId)
                            .to(Bars::Table, Bars::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PaymentHistories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentHistories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PaymentHistories::AccountId).uuid().not_null())
                    .col(ColumnDef::new(PaymentHistories::BookingId).uuid().not_null())
                    .col(
                        ColumnDef::new(PaymentHistories::PaymentDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PaymentHistories::TotalPrice).double().not_null())
                    .col(
                        ColumnDef::new(PaymentHistories::ProviderName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentHistories::TransactionCode)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentHistories::Status)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(PaymentHistories::Note).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_histories_account")
                            .from(PaymentHistories::Table, PaymentHistories::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_histories_booking")
                            .from(PaymentHistories::Table, PaymentHistories::BookingId)
                            .to(Bookings::Table, Bookings::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payment_histories_payment_date")
                    .table(PaymentHistories::Table)
                    .col(PaymentHistories::PaymentDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PaymentHistories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Bookings {
    Table,
    Id,
    AccountId,
    BarId,
    BookingDate,
    CreatedAt,
}

#[derive(Iden)]
enum PaymentHistories {
    Table,
    Id,
    AccountId,
    BookingId,
    PaymentDate,
    TotalPrice,
    ProviderName,
    TransactionCode,
    Status,
    Note,
}
