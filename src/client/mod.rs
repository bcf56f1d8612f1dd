pub mod api;
pub mod browser;
pub mod cache;
pub mod render;

use anyhow::Result;
use clap::ValueEnum;
use std::path::PathBuf;
use tracing::warn;

use api::ApiClient;
use cache::CacheStore;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RunTarget {
    Desktop,
    Website,
}

pub struct ClientOptions {
    pub api_url: String,
    pub cache_dir: String,
    pub upload: Option<PathBuf>,
}

/// Desktop flow: render the cached result if present, then optionally upload
/// a file, fetch and render its summary and sample rows, and refresh the
/// cache.
pub async fn run_desktop(options: ClientOptions) -> Result<()> {
    let cache = CacheStore::new(&options.cache_dir);
    if let Some(document) = cache.load() {
        let view = render::render(&document.summary, &document.rows);
        println!("{}", view.to_text());
        println!(
            "Loaded cached dataset: {} (uploaded {})",
            document.name, document.uploaded_at
        );
    }

    let Some(path) = options.upload else {
        return Ok(());
    };

    let client = ApiClient::new(&options.api_url);
    let record = client.upload(&path).await?;
    println!("Uploaded: {}", record.name);

    let summary = client.summary(record.id).await?.summary;
    let rows_page = client.rows(record.id, 1, 50).await?;
    println!("Summary fetched - rows: {}", rows_page.total);

    let view = render::render(&summary, &rows_page.rows);
    println!("{}", view.to_text());

    let name = match client.dataset(record.id).await {
        Ok(detail) => detail.name,
        Err(err) => {
            warn!("Failed to fetch dataset detail: {}", err);
            format!("dataset_{}", record.id)
        }
    };
    cache.save(&name, summary, rows_page.rows);

    Ok(())
}

/// Website flow: hand the local web UI URL to a browser and return.
pub fn run_website(url: &str) {
    browser::open_website(url);
}
