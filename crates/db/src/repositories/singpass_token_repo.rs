//! Repository for the `singpass_token_records` table.

use async_trait::async_trait;
use iras_core::oauth::SINGPASS_STATUS_COMPLETED;
use iras_core::pagination::Page;
use iras_core::types::DbId;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

use crate::error::{RepoError, RepoResult};
use crate::models::singpass::{
    CreateSingPassTokenRecord, SingPassTokenRecord, UpdateSingPassTokenRecord,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, code, state, access_token, token_type, expires_in, refresh_token, \
    scope, callback_url, client_id, status, deleted_at, created_at, updated_at";

/// Empty `token_type`/`status` and a zero `expires_in` take the column defaults.
const INSERT_TOKEN: &str = "\
    INSERT INTO singpass_token_records
        (code, state, access_token, token_type, expires_in, refresh_token,
         scope, callback_url, client_id, status)
    VALUES ($1, $2, $3, COALESCE(NULLIF($4, ''), 'Bearer'),
            COALESCE(NULLIF($5, 0), 3600), $6, $7, $8, $9,
            COALESCE(NULLIF($10, ''), 'active'))";

type TokenQuery<'q> = QueryAs<'q, Postgres, SingPassTokenRecord, PgArguments>;

fn bind_token<'q>(query: TokenQuery<'q>, input: &'q CreateSingPassTokenRecord) -> TokenQuery<'q> {
    query
        .bind(&input.code)
        .bind(&input.state)
        .bind(&input.access_token)
        .bind(&input.token_type)
        .bind(input.expires_in)
        .bind(&input.refresh_token)
        .bind(&input.scope)
        .bind(&input.callback_url)
        .bind(&input.client_id)
        .bind(&input.status)
}

#[async_trait]
pub trait SingPassTokenStore: Send + Sync {
    async fn create(&self, input: &CreateSingPassTokenRecord) -> RepoResult<SingPassTokenRecord>;

    /// Store a token and mark auth record `auth_id` completed, atomically.
    ///
    /// Fails with [`sqlx::Error::RowNotFound`] and stores nothing when the
    /// auth record is missing or soft-deleted.
    async fn issue(
        &self,
        auth_id: DbId,
        input: &CreateSingPassTokenRecord,
    ) -> RepoResult<SingPassTokenRecord>;

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<SingPassTokenRecord>>;

    /// Newest token issued for an authorization state.
    async fn find_by_state(&self, state: &str) -> RepoResult<Option<SingPassTokenRecord>>;

    async fn list(&self, page: &Page) -> RepoResult<(Vec<SingPassTokenRecord>, i64)>;

    async fn update(
        &self,
        id: DbId,
        input: &UpdateSingPassTokenRecord,
    ) -> RepoResult<Option<SingPassTokenRecord>>;

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool>;
}

/// PostgreSQL-backed [`SingPassTokenStore`].
pub struct SingPassTokenRepo {
    pool: PgPool,
}

impl SingPassTokenRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SingPassTokenStore for SingPassTokenRepo {
    async fn create(&self, input: &CreateSingPassTokenRecord) -> RepoResult<SingPassTokenRecord> {
        let query = format!("{INSERT_TOKEN} RETURNING {COLUMNS}");
        let row = bind_token(sqlx::query_as(&query), input)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn issue(
        &self,
        auth_id: DbId,
        input: &CreateSingPassTokenRecord,
    ) -> RepoResult<SingPassTokenRecord> {
        let mut tx = self.pool.begin().await?;

        let query = format!("{INSERT_TOKEN} RETURNING {COLUMNS}");
        let token = bind_token(sqlx::query_as(&query), input)
            .fetch_one(&mut *tx)
            .await?;

        let completed = sqlx::query(
            "UPDATE singpass_auth_records SET status = $2 \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(auth_id)
        .bind(SINGPASS_STATUS_COMPLETED)
        .execute(&mut *tx)
        .await?;
        if completed.rows_affected() == 0 {
            // Dropping `tx` rolls the token insert back.
            return Err(RepoError::Database(sqlx::Error::RowNotFound));
        }

        tx.commit().await?;
        Ok(token)
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<SingPassTokenRecord>> {
        let query = format!(
            "SELECT {COLUMNS} FROM singpass_token_records WHERE id = $1 AND deleted_at IS NULL"
        );
        let row = sqlx::query_as::<_, SingPassTokenRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_state(&self, state: &str) -> RepoResult<Option<SingPassTokenRecord>> {
        let query = format!(
            "SELECT {COLUMNS} FROM singpass_token_records
             WHERE state = $1 AND deleted_at IS NULL
             ORDER BY created_at DESC, id DESC LIMIT 1"
        );
        let row = sqlx::query_as::<_, SingPassTokenRecord>(&query)
            .bind(state)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(&self, page: &Page) -> RepoResult<(Vec<SingPassTokenRecord>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM singpass_token_records WHERE deleted_at IS NULL",
        )
        .fetch_one(&self.pool)
        .await?;
        let query = format!(
            "SELECT {COLUMNS} FROM singpass_token_records WHERE deleted_at IS NULL
             ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, SingPassTokenRecord>(&query)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok((rows, total))
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateSingPassTokenRecord,
    ) -> RepoResult<Option<SingPassTokenRecord>> {
        let query = format!(
            "UPDATE singpass_token_records SET
                token_type = COALESCE($2, token_type),
                expires_in = COALESCE($3, expires_in),
                refresh_token = COALESCE($4, refresh_token),
                scope = COALESCE($5, scope),
                callback_url = COALESCE($6, callback_url),
                client_id = COALESCE($7, client_id),
                status = COALESCE($8, status)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, SingPassTokenRecord>(&query)
            .bind(id)
            .bind(&input.token_type)
            .bind(input.expires_in)
            .bind(&input.refresh_token)
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
            "UPDATE singpass_token_records SET deleted_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
