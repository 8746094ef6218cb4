pub use sea_orm_migration::prelude::*;

mod m20251010_000001_create_reference_tables;
mod m20251010_000002_create_maintenance_request_table;
mod m20251012_000003_add_maintenance_request_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251010_000001_create_reference_tables::Migration),
            Box::new(m20251010_000002_create_maintenance_request_table::Migration),
            Box::new(m20251012_000003_add_maintenance_request_indexes::Migration),
        ]
    }
}
