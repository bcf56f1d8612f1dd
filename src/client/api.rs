use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use reqwest::multipart;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

use crate::summary::ColumnStats;

/// Dataset record as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetRecord {
    pub id: i32,
    pub name: String,
    pub upload_time: String,
    pub file: String,
    pub row_count: i64,
    pub checksum: String,
}

#[derive(Debug, Deserialize)]
pub struct SummaryResponse {
    pub summary: IndexMap<String, ColumnStats>,
}

#[derive(Debug, Deserialize)]
pub struct RowsResponse {
    pub rows: Vec<IndexMap<String, Value>>,
    pub total: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    pub async fn upload(&self, path: &Path) -> Result<DatasetRecord> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("dataset.csv")
            .to_string();
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("text/csv")?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/upload/", self.base_url))
            .multipart(form)
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::CREATED {
            bail!("upload failed: {}", error_message(response).await);
        }
        Ok(response.json().await?)
    }

    pub async fn dataset(&self, id: i32) -> Result<DatasetRecord> {
        self.get_json(&format!("{}/datasets/{}/", self.base_url, id))
            .await
    }

    pub async fn summary(&self, id: i32) -> Result<SummaryResponse> {
        self.get_json(&format!("{}/datasets/{}/summary/", self.base_url, id))
            .await
    }

    pub async fn rows(&self, id: i32, page: u32, page_size: u32) -> Result<RowsResponse> {
        self.get_json(&format!(
            "{}/datasets/{}/rows/?page={}&page_size={}",
            self.base_url, id, page, page_size
        ))
        .await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            bail!("request to {} failed: {}", url, error_message(response).await);
        }
        Ok(response.json().await?)
    }
}

async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(body) => format!("{} {}", status, body.error),
        Err(_) => status.to_string(),
    }
}
