pub use sea_orm_migration::prelude::*;

mod m20260302_000001_users;
mod m20260302_000002_transactions;
mod m20260308_000001_budgets;
mod m20260315_000001_loans;
mod m20260322_000001_lending;
mod m20260402_000001_recurring;
mod m20260410_000001_settings_subscriptions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260302_000001_users::Migration),
            Box::new(m20260302_000002_transactions::Migration),
            Box::new(m20260308_000001_budgets::Migration),
            Box::new(m20260315_000001_loans::Migration),
            Box::new(m20260322_000001_lending::Migration),
            Box::new(m20260402_000001_recurring::Migration),
            Box::new(m20260410_000001_settings_subscriptions::Migration),
        ]
    }
}
