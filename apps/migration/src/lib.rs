//! Database schema for the Scribe backend.
//!
//! Tables are derived from the SeaORM entities in `scribe-infra`, so the
//! schema and the repositories cannot drift apart.

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_tables::Migration)]
    }
}
