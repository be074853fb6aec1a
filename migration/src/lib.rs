pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_users_table;
mod m20250601_000002_create_projects_table;
mod m20250601_000003_create_contracts_table;
mod m20250601_000004_create_expenses_table;
mod m20250601_000005_create_payments_table;
mod m20250615_000001_add_ledger_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_users_table::Migration),
            Box::new(m20250601_000002_create_projects_table::Migration),
            Box::new(m20250601_000003_create_contracts_table::Migration),
            Box::new(m20250601_000004_create_expenses_table::Migration),
            Box::new(m20250601_000005_create_payments_table::Migration),
            Box::new(m20250615_000001_add_ledger_indexes::Migration),
        ]
    }
}
