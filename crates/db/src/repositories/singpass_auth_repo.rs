//! Repository for the `singpass_auth_records` table.

use async_trait::async_trait;
use iras_core::pagination::Page;
use iras_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::singpass::{
    CreateSingPassAuthRecord, SingPassAuthRecord, UpdateSingPassAuthRecord,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, auth_url, state, scope, callback_url, client_id, status, \
    deleted_at, created_at, updated_at";

#[async_trait]
pub trait SingPassAuthStore: Send + Sync {
    async fn create(&self, input: &CreateSingPassAuthRecord) -> RepoResult<SingPassAuthRecord>;

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<SingPassAuthRecord>>;

    async fn find_by_state(&self, state: &str) -> RepoResult<Option<SingPassAuthRecord>>;

    async fn list(&self, page: &Page) -> RepoResult<(Vec<SingPassAuthRecord>, i64)>;

    async fn update(
        &self,
        id: DbId,
        input: &UpdateSingPassAuthRecord,
    ) -> RepoResult<Option<SingPassAuthRecord>>;

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool>;
}

/// PostgreSQL-backed [`SingPassAuthStore`].
pub struct SingPassAuthRepo {
    pool: PgPool,
}

impl SingPassAuthRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SingPassAuthStore for SingPassAuthRepo {
    /// An empty `status` falls back to `pending`.
    async fn create(&self, input: &CreateSingPassAuthRecord) -> RepoResult<SingPassAuthRecord> {
        let query = format!(
            "INSERT INTO singpass_auth_records
                (auth_url, state, scope, callback_url, client_id, status)
             VALUES ($1, $2, $3, $4, $5, COALESCE(NULLIF($6, ''), 'pending'))
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, SingPassAuthRecord>(&query)
            .bind(&input.auth_url)
            .bind(&input.state)
            .bind(&input.scope)
            .bind(&input.callback_url)
            .bind(&input.client_id)
            .bind(&input.status)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<SingPassAuthRecord>> {
        let query = format!(
            "SELECT {COLUMNS} FROM singpass_auth_records WHERE id = $1 AND deleted_at IS NULL"
        );
        let row = sqlx::query_as::<_, SingPassAuthRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_state(&self, state: &str) -> RepoResult<Option<SingPassAuthRecord>> {
        let query = format!(
            "SELECT {COLUMNS} FROM singpass_auth_records WHERE state = $1 AND deleted_at IS NULL"
        );
        let row = sqlx::query_as::<_, SingPassAuthRecord>(&query)
            .bind(state)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(&self, page: &Page) -> RepoResult<(Vec<SingPassAuthRecord>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM singpass_auth_records WHERE deleted_at IS NULL",
        )
        .fetch_one(&self.pool)
        .await?;
        let query = format!(
            "SELECT {COLUMNS} FROM singpass_auth_records WHERE deleted_at IS NULL
             ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, SingPassAuthRecord>(&query)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok((rows, total))
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateSingPassAuthRecord,
    ) -> RepoResult<Option<SingPassAuthRecord>> {
        let query = format!(
            "UPDATE singpass_auth_records SET
                auth_url = COALESCE($2, auth_url),
                scope = COALESCE($3, scope),
                callback_url = COALESCE($4, callback_url),
                client_id = COALESCE($5, client_id),
                status = COALESCE($6, status)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, SingPassAuthRecord>(&query)
            .bind(id)
            .bind(&input.auth_url)
            .bind(&input.scope)
            .bind(&input.callback_url)
            .bind(&input.client_id)
            .bind(&input.status)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE singpass_auth_records SET deleted_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
