pub use sea_orm_migration::prelude::*;

mod m20250110_000001_create_users;
mod m20250110_000002_create_catalog;
mod m20250112_000001_create_playlists;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250110_000001_create_users::Migration),
            Box::new(m20250110_000002_create_catalog::Migration),
            Box::new(m20250112_000001_create_playlists::Migration),
        ]
    }
}
