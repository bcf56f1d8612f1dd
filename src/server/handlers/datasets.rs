use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::entities::datasets;
use crate::pagination;
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::services::RETENTION_LIMIT;
use crate::summary;
use crate::tabular::{self, Table};

/// GET /api/datasets/
pub async fn list_datasets(
    State(state): State<AppState>,
) -> Result<Json<Vec<datasets::Model>>, ApiError> {
    Ok(Json(state.datasets.list_recent(RETENTION_LIMIT).await?))
}

/// GET /api/datasets/:id/
pub async fn get_dataset(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<datasets::Model>, ApiError> {
    let dataset = state.datasets.get(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(dataset))
}

/// DELETE /api/datasets/:id/
pub async fn delete_dataset(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let dataset = state.datasets.get(id).await?.ok_or(ApiError::NotFound)?;
    state.datasets.delete(dataset).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct RowsQuery {
    page: Option<u32>,
    page_size: Option<u32>,
}

/// GET /api/datasets/:id/rows/?page=&page_size=
pub async fn dataset_rows(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<RowsQuery>,
) -> Result<Json<pagination::Page>, ApiError> {
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(50);
    if page < 1 {
        return Err(ApiError::Validation("page must be >= 1".to_string()));
    }
    if page_size < 1 {
        return Err(ApiError::Validation("page_size must be >= 1".to_string()));
    }

    let table = load_table(&state, id).await?;
    Ok(Json(pagination::paginate(
        &table,
        page as usize,
        page_size as usize,
    )))
}

/// GET /api/datasets/:id/summary/
pub async fn dataset_summary(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let table = load_table(&state, id).await?;
    Ok(Json(json!({ "summary": summary::summarize(&table) })))
}

/// GET /api/datasets/:id/download/
pub async fn download_dataset(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let dataset = state.datasets.get(id).await?.ok_or(ApiError::NotFound)?;
    let path = state.datasets.files().path(&dataset.file);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|err| ApiError::Internal(err.into()))?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", dataset.file))
            .map_err(|err| ApiError::Internal(err.into()))?,
    );

    Ok((headers, bytes))
}

async fn load_table(state: &AppState, id: i32) -> Result<Table, ApiError> {
    let dataset = state.datasets.get(id).await?.ok_or(ApiError::NotFound)?;
    let path = state.datasets.files().path(&dataset.file);
    let file = std::fs::File::open(&path).map_err(|err| ApiError::Internal(err.into()))?;
    tabular::parse_csv(file).map_err(ApiError::Internal)
}
