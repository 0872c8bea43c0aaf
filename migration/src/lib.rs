pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20241001_000001_ip_country_table;
mod m20241015_000001_ip_country_country_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241001_000001_ip_country_table::Migration),
            Box::new(m20241015_000001_ip_country_country_index::Migration),
        ]
    }
}
