//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_roles_table;
mod m20240101_000002_create_bars_and_accounts;
mod m20240101_000003_create_bookings_and_payments;
mod m20240101_000004_create_categories_table;
mod m20240101_000005_create_notifications;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_roles_table::Migration),
            Box::new(m20240101_000002_create_bars_and_accounts::Migration),
            Box::new(m20240101_000003_create_bookings_and_payments::Migration),
            Box::new(m20240101_000004_create_categories_table::Migration),
            Box::new(m20240101_000005_create_notifications::Migration),
        ]
    }
}
