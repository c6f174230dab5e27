pub use sea_orm_migration::prelude::*;

mod util;
mod m20250701_090000_create_payroll_schema;
mod m20250701_093000_seed_employees;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250701_090000_create_payroll_schema::Migration),
            Box::new(m20250701_093000_seed_employees::Migration),
        ]
    }
}
