//! In-memory file store for single-node deployments and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_entity::file::{ContentSave, CreateFileRecord, FileRecord, MetadataPatch};

use crate::store::FileStore;

/// [`FileStore`] backed by a process-local map.
///
/// The write lock makes every mutating operation atomic, which gives the
/// compare-and-swap the same guarantee the SQL implementation gets from a
/// single conditional UPDATE.
#[derive(Debug, Default)]
pub struct InMemoryFileStore {
    records: RwLock<HashMap<Uuid, FileRecord>>,
}

impl InMemoryFileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn insert(&self, record: CreateFileRecord) -> AppResult<FileRecord> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(AppError::database(format!(
                "File record {} already exists",
                record.id
            )));
        }
        let record = record.into_record(Utc::now());
        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn insert_many(&self, batch: Vec<CreateFileRecord>) -> AppResult<Vec<FileRecord>> {
        let mut records = self.records.write().await;

        // Validate the whole batch before touching the map so a failure
        // leaves no row behind.
        let mut seen = Vec::with_capacity(batch.len());
        for record in &batch {
            if records.contains_key(&record.id) || seen.contains(&record.id) {
                return Err(AppError::database(format!(
                    "File record {} already exists",
                    record.id
                )));
            }
            seen.push(record.id);
        }

        let now = Utc::now();
        let mut created = Vec::with_capacity(batch.len());
        for record in batch {
            let record = record.into_record(now);
            records.insert(record.id, record.clone());
            created.push(record);
        }
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileRecord>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn list_active(&self) -> AppResult<Vec<FileRecord>> {
        let records = self.records.read().await;
        let mut files: Vec<FileRecord> = records
            .values()
            .filter(|r| !r.is_deleted && !r.is_pending_storage())
            .cloned()
            .collect();
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(files)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<FileRecord>> {
        let records = self.records.read().await;
        let mut files: Vec<FileRecord> = records
            .values()
            .filter(|r| r.owner_id == owner_id && !r.is_deleted && !r.is_pending_storage())
            .cloned()
            .collect();
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(files)
    }

    async fn list_trashed(&self) -> AppResult<Vec<FileRecord>> {
        let records = self.records.read().await;
        let mut files: Vec<FileRecord> = records
            .values()
            .filter(|r| r.is_deleted)
            .cloned()
            .collect();
        files.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));
        Ok(files)
    }

    async fn apply_patch(&self, id: Uuid, patch: MetadataPatch) -> AppResult<FileRecord> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;

        match patch {
            MetadataPatch::Rename { file_name } => record.file_name = file_name,
            MetadataPatch::Favorite { is_favorite } => record.is_favorite = is_favorite,
        }
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn mark_deleted(&self, id: Uuid, deleted_at: DateTime<Utc>) -> AppResult<FileRecord> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;
        record.is_deleted = true;
        record.deleted_at = Some(deleted_at);
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn clear_deleted(&self, id: Uuid) -> AppResult<FileRecord> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;
        record.is_deleted = false;
        record.deleted_at = None;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn restore_many(&self, ids: &[Uuid]) -> AppResult<u64> {
        let mut records = self.records.write().await;
        let mut restored = 0u64;
        for id in ids {
            if let Some(record) = records.get_mut(id) {
                if record.is_deleted {
                    record.is_deleted = false;
                    record.deleted_at = None;
                    record.updated_at = Utc::now();
                    restored += 1;
                }
            }
        }
        Ok(restored)
    }

    async fn set_storage_path(&self, id: Uuid, storage_path: &str) -> AppResult<FileRecord> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;
        record.storage_path = storage_path.to_string();
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn compare_and_swap_version(
        &self,
        id: Uuid,
        expected_version: i32,
        save: &ContentSave,
    ) -> AppResult<bool> {
        let mut records = self.records.write().await;
        let Some(record) = records.get_mut(&id) else {
            return Ok(false);
        };
        if record.version != expected_version {
            return Ok(false);
        }
        record.version += 1;
        record.size_bytes = save.size_bytes;
        record.content_snapshot = save.content_snapshot.clone();
        record.last_saved_at = Some(save.saved_at);
        record.last_saved_by = save.saved_by;
        record.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.records.write().await.remove(&id).is_some())
    }
}
