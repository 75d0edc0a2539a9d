//! Repository for the `cit_conversions` table.

use async_trait::async_trait;
use iras_core::pagination::Page;
use iras_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::cit_conversion::{CitConversion, CreateCitConversion, UpdateCitConversion};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, conversion_id, request_id, client_id, status, conversion_date, \
    processed_by, conversion_result, deleted_at, created_at, updated_at";

#[async_trait]
pub trait CitConversionStore: Send + Sync {
    async fn create(&self, input: &CreateCitConversion) -> RepoResult<CitConversion>;

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<CitConversion>>;

    async fn find_by_conversion_id(&self, conversion_id: &str)
        -> RepoResult<Option<CitConversion>>;

    /// Oldest live conversion for a request id (the one first returned to the caller).
    async fn find_by_request_id(&self, request_id: i64) -> RepoResult<Option<CitConversion>>;

    async fn list(&self, page: &Page) -> RepoResult<(Vec<CitConversion>, i64)>;

    async fn update(
        &self,
        id: DbId,
        input: &UpdateCitConversion,
    ) -> RepoResult<Option<CitConversion>>;

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool>;
}

/// PostgreSQL-backed [`CitConversionStore`].
pub struct CitConversionRepo {
    pool: PgPool,
}

impl CitConversionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CitConversionStore for CitConversionRepo {
    async fn create(&self, input: &CreateCitConversion) -> RepoResult<CitConversion> {
        let query = format!(
            "INSERT INTO cit_conversions
                (conversion_id, request_id, client_id, status, conversion_date,
                 processed_by, conversion_result)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, CitConversion>(&query)
            .bind(&input.conversion_id)
            .bind(input.request_id)
            .bind(&input.client_id)
            .bind(&input.status)
            .bind(&input.conversion_date)
            .bind(&input.processed_by)
            .bind(&input.conversion_result)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<CitConversion>> {
        let query =
            format!("SELECT {COLUMNS} FROM cit_conversions WHERE id = $1 AND deleted_at IS NULL");
        let row = sqlx::query_as::<_, CitConversion>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_conversion_id(
        &self,
        conversion_id: &str,
    ) -> RepoResult<Option<CitConversion>> {
        let query = format!(
            "SELECT {COLUMNS} FROM cit_conversions
             WHERE conversion_id = $1 AND deleted_at IS NULL"
        );
        let row = sqlx::query_as::<_, CitConversion>(&query)
            .bind(conversion_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_request_id(&self, request_id: i64) -> RepoResult<Option<CitConversion>> {
        let query = format!(
            "SELECT {COLUMNS} FROM cit_conversions
             WHERE request_id = $1 AND deleted_at IS NULL
             ORDER BY id ASC LIMIT 1"
        );
        let row = sqlx::query_as::<_, CitConversion>(&query)
            .bind(request_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(&self, page: &Page) -> RepoResult<(Vec<CitConversion>, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM cit_conversions WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;
        let query = format!(
            "SELECT {COLUMNS} FROM cit_conversions WHERE deleted_at IS NULL
             ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, CitConversion>(&query)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok((rows, total))
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateCitConversion,
    ) -> RepoResult<Option<CitConversion>> {
        let query = format!(
            "UPDATE cit_conversions SET
                client_id = COALESCE($2, client_id),
                status = COALESCE($3, status),
                conversion_date = COALESCE($4, conversion_date),
                processed_by = COALESCE($5, processed_by),
                conversion_result = COALESCE($6, conversion_result)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, CitConversion>(&query)
            .bind(id)
            .bind(&input.client_id)
            .bind(&input.status)
            .bind(&input.conversion_date)
            .bind(&input.processed_by)
            .bind(&input.conversion_result)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE cit_conversions SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
