use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set,
};
use tracing::info;

use crate::database::entities::{datasets, datasets::Entity as Datasets};
use crate::storage::FileStore;

/// At most this many dataset records persist at any time.
pub const RETENTION_LIMIT: u64 = 5;

/// Persistence for dataset records and their backing files. Handlers get an
/// instance through the app state; there is no process-wide store.
#[derive(Clone)]
pub struct DatasetService {
    db: DatabaseConnection,
    files: FileStore,
}

impl DatasetService {
    pub fn new(db: DatabaseConnection, files: FileStore) -> Self {
        Self { db, files }
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    /// Persist the file and insert a record with zero row count and empty
    /// checksum. The caller must validate the content and either `finalize`
    /// or `delete` the record.
    pub async fn create(&self, name: &str, file_name: &str, bytes: &[u8]) -> Result<datasets::Model> {
        let stored = self.files.save(file_name, bytes)?;
        let dataset = datasets::ActiveModel {
            name: Set(name.to_string()),
            upload_time: Set(Utc::now()),
            file: Set(stored),
            row_count: Set(0),
            checksum: Set(String::new()),
            ..Default::default()
        };
        Ok(dataset.insert(&self.db).await?)
    }

    /// Backfill row count and checksum after successful validation. The one
    /// mutation a record sees in its lifetime.
    pub async fn finalize(
        &self,
        dataset: datasets::Model,
        row_count: i32,
        checksum: String,
    ) -> Result<datasets::Model> {
        let mut dataset: datasets::ActiveModel = dataset.into();
        dataset.row_count = Set(row_count);
        dataset.checksum = Set(checksum);
        Ok(dataset.update(&self.db).await?)
    }

    pub async fn list_recent(&self, limit: u64) -> Result<Vec<datasets::Model>> {
        Ok(Datasets::find()
            .order_by_desc(datasets::Column::UploadTime)
            .order_by_desc(datasets::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?)
    }

    pub async fn get(&self, id: i32) -> Result<Option<datasets::Model>> {
        Ok(Datasets::find_by_id(id).one(&self.db).await?)
    }

    /// Remove the backing file (best-effort) and the record.
    pub async fn delete(&self, dataset: datasets::Model) -> Result<()> {
        self.files.remove(&dataset.file);
        Datasets::delete_by_id(dataset.id).exec(&self.db).await?;
        Ok(())
    }

    /// Drop every record beyond the `RETENTION_LIMIT` most recent by upload
    /// time. Fixed window keyed on upload time only, not access time.
    pub async fn enforce_retention(&self) -> Result<()> {
        let stale: Vec<datasets::Model> = Datasets::find()
            .order_by_desc(datasets::Column::UploadTime)
            .order_by_desc(datasets::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .skip(RETENTION_LIMIT as usize)
            .collect();

        for old in stale {
            info!("Retention: removing dataset {} ({})", old.id, old.name);
            self.delete(old).await?;
        }
        Ok(())
    }
}
