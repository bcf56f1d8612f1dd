use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use super::handlers::{datasets, health, upload};
use crate::services::DatasetService;
use crate::storage::FileStore;

#[derive(Clone)]
pub struct AppState {
    pub datasets: DatasetService,
}

pub async fn create_app(
    db: DatabaseConnection,
    files: FileStore,
    cors_origin: Option<&str>,
) -> Result<Router> {
    let state = AppState {
        datasets: DatasetService::new(db, files),
    };

    let cors = match cors_origin {
        Some(origin) if origin != "*" => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<axum::http::HeaderValue>()
                    .context("invalid CORS origin")?,
            )
            .allow_methods(Any)
            .allow_headers(Any),
        _ => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        // Health check endpoint
        .route("/health", get(health::health_check))
        // API routes
        .nest("/api", api_routes())
        // Add middleware
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    Ok(app)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/upload/", post(upload::upload_csv))
        .route("/datasets/", get(datasets::list_datasets))
        .route(
            "/datasets/:id/",
            get(datasets::get_dataset).delete(datasets::delete_dataset),
        )
        .route("/datasets/:id/rows/", get(datasets::dataset_rows))
        .route("/datasets/:id/summary/", get(datasets::dataset_summary))
        .route("/datasets/:id/download/", get(datasets::download_dataset))
}
