pub mod app;
pub mod error;
pub mod handlers;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum MigrateDirection {
    Up,
    Down,
    Fresh,
}

use crate::database::{connection::*, migrations::Migrator};
use crate::storage::FileStore;
use anyhow::Result;
use sea_orm_migration::prelude::*;
use tracing::info;

pub async fn start_server(
    port: u16,
    database_path: &str,
    storage_dir: &str,
    cors_origin: Option<&str>,
) -> Result<()> {
    let database_url = get_database_url(Some(database_path));
    let db = establish_connection(&database_url).await?;

    // Run migrations
    Migrator::up(&db, None).await?;
    info!("Database migrations completed");

    let files = FileStore::new(storage_dir)?;
    let app = app::create_app(db, files, cors_origin).await?;

    log_routes();

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn log_routes() {
    info!("API Endpoints:");
    info!("  GET    /health                      - Health check");
    info!("  POST   /api/upload/                 - Upload a CSV dataset");
    info!("  GET    /api/datasets/               - List the 5 most recent datasets");
    info!("  GET    /api/datasets/:id/           - Dataset record (DELETE to remove)");
    info!("  GET    /api/datasets/:id/rows/      - Paginated rows");
    info!("  GET    /api/datasets/:id/summary/   - Per-column numeric statistics");
    info!("  GET    /api/datasets/:id/download/  - Original file as attachment");
}

pub async fn migrate_database(database_path: &str, direction: MigrateDirection) -> Result<()> {
    let database_url = get_database_url(Some(database_path));
    let db = establish_connection(&database_url).await?;

    match direction {
        MigrateDirection::Up => {
            info!("Running migrations up");
            Migrator::up(&db, None).await?;
        }
        MigrateDirection::Down => {
            info!("Running migrations down");
            Migrator::down(&db, None).await?;
        }
        MigrateDirection::Fresh => {
            info!("Running fresh migrations (down then up)");
            Migrator::down(&db, None).await?;
            Migrator::up(&db, None).await?;
        }
    }

    info!("Database migration completed");
    Ok(())
}
