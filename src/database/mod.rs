pub mod connection;
pub mod entities;
pub mod migrations;

pub use connection::*;
pub use entities::*;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;

/// Run all migrations against a fresh or existing database.
pub async fn setup_database(db: &DatabaseConnection) -> Result<(), sea_orm::DbErr> {
    migrations::Migrator::up(db, None).await
}
