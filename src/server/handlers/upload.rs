use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

use crate::checksum;
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::tabular;

/// POST /api/upload/
///
/// Multipart fields: `file` (required), `name` (optional, defaults to the
/// uploaded filename). On parse failure the record and stored file are rolled
/// back and a 400 is returned; otherwise row count and checksum are
/// backfilled and retention is enforced.
pub async fn upload_csv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut name: Option<String> = None;
    let mut file_name: Option<String> = None;
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::Validation(format!("Invalid multipart request: {}", err)))?
    {
        let key = field.name().unwrap_or("").to_string();
        match key.as_str() {
            "name" => {
                name = field.text().await.ok().filter(|value| !value.is_empty());
            }
            "file" => {
                file_name = field.file_name().map(|value| value.to_string());
                let bytes = field.bytes().await.map_err(|err| {
                    ApiError::Validation(format!("Failed to read file field: {}", err))
                })?;
                file_bytes = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    let Some(bytes) = file_bytes else {
        return Err(ApiError::Validation("No file uploaded".to_string()));
    };
    let name = name
        .or_else(|| file_name.clone())
        .unwrap_or_else(|| "dataset".to_string());
    let file_name = file_name.unwrap_or_else(|| "dataset.csv".to_string());

    let dataset = state.datasets.create(&name, &file_name, &bytes).await?;

    let table = match tabular::parse_csv(bytes.as_slice()) {
        Ok(table) => table,
        Err(err) => {
            state.datasets.delete(dataset).await?;
            return Err(ApiError::Validation(format!("Invalid CSV: {}", err)));
        }
    };

    let path = state.datasets.files().path(&dataset.file);
    let digest = checksum::digest_file(&path).map_err(anyhow::Error::from)?;
    let dataset = state
        .datasets
        .finalize(dataset, table.row_count() as i32, digest)
        .await?;
    state.datasets.enforce_retention().await?;

    info!(
        "Uploaded dataset {} ({}, {} rows)",
        dataset.id, dataset.name, dataset.row_count
    );
    Ok((StatusCode::CREATED, Json(dataset)))
}
