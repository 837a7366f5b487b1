pub use sea_orm_migration::prelude::*;

mod m20260710_000001_create_catalog;
mod m20260710_000002_create_users;
mod m20260712_000001_create_sessions;
mod m20260715_000001_create_checkout;
mod m20260718_000001_create_delivery_pincodes;
mod m20260720_000001_create_otp_codes;
mod m20260722_000001_create_account_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260710_000001_create_catalog::Migration),
            Box::new(m20260710_000002_create_users::Migration),
            Box::new(m20260712_000001_create_sessions::Migration),
            Box::new(m20260715_000001_create_checkout::Migration),
            Box::new(m20260718_000001_create_delivery_pincodes::Migration),
            Box::new(m20260720_000001_create_otp_codes::Migration),
            Box::new(m20260722_000001_create_account_tables::Migration),
        ]
    }
}
