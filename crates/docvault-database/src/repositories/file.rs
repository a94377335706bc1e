//! PostgreSQL file repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgQueryResult;
use uuid::Uuid;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_entity::file::{ContentSave, CreateFileRecord, FileRecord, MetadataPatch};

use crate::store::FileStore;

/// PostgreSQL-backed [`FileStore`].
///
/// All queries use runtime binding; the `files` table itself is owned by
/// external migration tooling.
#[derive(Debug, Clone)]
pub struct PgFileStore {
    pool: PgPool,
}

impl PgFileStore {
    /// Create a new file store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_in<'e, E>(executor: E, record: CreateFileRecord) -> AppResult<FileRecord>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let record = record.into_record(Utc::now());
        sqlx::query_as::<_, FileRecord>(
            "INSERT INTO files (id, owner_id, file_name, kind, size_bytes, storage_path, \
             version, content_snapshot, is_deleted, deleted_at, is_favorite, \
             last_saved_at, last_saved_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING *",
        )
        .bind(record.id)
        .bind(record.owner_id)
        .bind(&record.file_name)
        .bind(record.kind)
        .bind(record.size_bytes)
        .bind(&record.storage_path)
        .bind(record.version)
        .bind(&record.content_snapshot)
        .bind(record.is_deleted)
        .bind(record.deleted_at)
        .bind(record.is_favorite)
        .bind(record.last_saved_at)
        .bind(record.last_saved_by)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(executor)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("files_pkey") => {
                AppError::database(format!("File record {} already exists", record.id))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to insert file record", e),
        })
    }
}

#[async_trait]
impl FileStore for PgFileStore {
    async fn insert(&self, record: CreateFileRecord) -> AppResult<FileRecord> {
        Self::insert_in(&self.pool, record).await
    }

    async fn insert_many(&self, records: Vec<CreateFileRecord>) -> AppResult<Vec<FileRecord>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let mut created = Vec::with_capacity(records.len());
        for record in records {
            created.push(Self::insert_in(&mut *tx, record).await?);
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit batch insert", e)
        })?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileRecord>> {
        sqlx::query_as::<_, FileRecord>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    async fn list_active(&self) -> AppResult<Vec<FileRecord>> {
        sqlx::query_as::<_, FileRecord>(
            "SELECT * FROM files WHERE is_deleted = FALSE AND storage_path <> '' \
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<FileRecord>> {
        sqlx::query_as::<_, FileRecord>(
            "SELECT * FROM files WHERE owner_id = $1 AND is_deleted = FALSE \
             AND storage_path <> '' ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list user files", e))
    }

    async fn list_trashed(&self) -> AppResult<Vec<FileRecord>> {
        sqlx::query_as::<_, FileRecord>(
            "SELECT * FROM files WHERE is_deleted = TRUE ORDER BY deleted_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list trash", e))
    }

    async fn apply_patch(&self, id: Uuid, patch: MetadataPatch) -> AppResult<FileRecord> {
        let query = match patch {
            MetadataPatch::Rename { file_name } => sqlx::query_as::<_, FileRecord>(
                "UPDATE files SET file_name = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
            )
            .bind(id)
            .bind(file_name),
            MetadataPatch::Favorite { is_favorite } => sqlx::query_as::<_, FileRecord>(
                "UPDATE files SET is_favorite = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
            )
            .bind(id)
            .bind(is_favorite),
        };

        query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to patch file", e))?
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    async fn mark_deleted(&self, id: Uuid, deleted_at: DateTime<Utc>) -> AppResult<FileRecord> {
        sqlx::query_as::<_, FileRecord>(
            "UPDATE files SET is_deleted = TRUE, deleted_at = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(deleted_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to trash file", e))?
        .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    async fn clear_deleted(&self, id: Uuid) -> AppResult<FileRecord> {
        sqlx::query_as::<_, FileRecord>(
            "UPDATE files SET is_deleted = FALSE, deleted_at = NULL, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to restore file", e))?
        .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    async fn restore_many(&self, ids: &[Uuid]) -> AppResult<u64> {
        let result: PgQueryResult = sqlx::query(
            "UPDATE files SET is_deleted = FALSE, deleted_at = NULL, updated_at = NOW() \
             WHERE id = ANY($1) AND is_deleted = TRUE",
        )
        .bind(ids.to_vec())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to restore files", e))?;

        Ok(result.rows_affected())
    }

    async fn set_storage_path(&self, id: Uuid, storage_path: &str) -> AppResult<FileRecord> {
        sqlx::query_as::<_, FileRecord>(
            "UPDATE files SET storage_path = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(storage_path)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to set storage path", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    async fn compare_and_swap_version(
        &self,
        id: Uuid,
        expected_version: i32,
        save: &ContentSave,
    ) -> AppResult<bool> {
        // The guard and the increment live in one statement so no
        // read-modify-write window is visible to concurrent callers.
        let result = sqlx::query(
            "UPDATE files SET version = version + 1, size_bytes = $3, \
             content_snapshot = $4, last_saved_at = $5, last_saved_by = $6, \
             updated_at = NOW() \
             WHERE id = $1 AND version = $2",
        )
        .bind(id)
        .bind(expected_version)
        .bind(save.size_bytes)
        .bind(&save.content_snapshot)
        .bind(save.saved_at)
        .bind(save.saved_by)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to swap version", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }
}
