//! Repository for the `gst_registrations` table.

use async_trait::async_trait;
use iras_core::pagination::Page;
use iras_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::gst_registration::{
    CreateGstRegistration, GstRegistration, UpdateGstRegistration,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, client_id, registration_id, gst_registration_number, name, \
    registered_from, registered_to, status, remarks, deleted_at, created_at, updated_at";

#[async_trait]
pub trait GstRegistrationStore: Send + Sync {
    async fn create(&self, input: &CreateGstRegistration) -> RepoResult<GstRegistration>;

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<GstRegistration>>;

    /// Public lookup key: registration id scoped to the client that owns it.
    async fn find_by_registration(
        &self,
        registration_id: &str,
        client_id: &str,
    ) -> RepoResult<Option<GstRegistration>>;

    async fn list(&self, page: &Page) -> RepoResult<(Vec<GstRegistration>, i64)>;

    async fn update(
        &self,
        id: DbId,
        input: &UpdateGstRegistration,
    ) -> RepoResult<Option<GstRegistration>>;

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool>;
}

/// PostgreSQL-backed [`GstRegistrationStore`].
pub struct GstRegistrationRepo {
    pool: PgPool,
}

impl GstRegistrationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GstRegistrationStore for GstRegistrationRepo {
    async fn create(&self, input: &CreateGstRegistration) -> RepoResult<GstRegistration> {
        let query = format!(
            "INSERT INTO gst_registrations
                (client_id, registration_id, gst_registration_number, name,
                 registered_from, registered_to, status, remarks)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, GstRegistration>(&query)
            .bind(&input.client_id)
            .bind(&input.registration_id)
            .bind(&input.gst_registration_number)
            .bind(&input.name)
            .bind(&input.registered_from)
            .bind(&input.registered_to)
            .bind(&input.status)
            .bind(&input.remarks)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<GstRegistration>> {
        let query = format!(
            "SELECT {COLUMNS} FROM gst_registrations WHERE id = $1 AND deleted_at IS NULL"
        );
        let row = sqlx::query_as::<_, GstRegistration>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_registration(
        &self,
        registration_id: &str,
        client_id: &str,
    ) -> RepoResult<Option<GstRegistration>> {
        let query = format!(
            "SELECT {COLUMNS} FROM gst_registrations
             WHERE registration_id = $1 AND client_id = $2 AND deleted_at IS NULL"
        );
        let row = sqlx::query_as::<_, GstRegistration>(&query)
            .bind(registration_id)
            .bind(client_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(&self, page: &Page) -> RepoResult<(Vec<GstRegistration>, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM gst_registrations WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;
        let query = format!(
            "SELECT {COLUMNS} FROM gst_registrations WHERE deleted_at IS NULL
             ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, GstRegistration>(&query)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok((rows, total))
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateGstRegistration,
    ) -> RepoResult<Option<GstRegistration>> {
        let query = format!(
            "UPDATE gst_registrations SET
                client_id = COALESCE($2, client_id),
                gst_registration_number = COALESCE($3, gst_registration_number),
                name = COALESCE($4, name),
                registered_from = COALESCE($5, registered_from),
                registered_to = COALESCE($6, registered_to),
                status = COALESCE($7, status),
                remarks = COALESCE($8, remarks)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, GstRegistration>(&query)
            .bind(id)
            .bind(&input.client_id)
            .bind(&input.gst_registration_number)
            .bind(&input.name)
            .bind(&input.registered_from)
            .bind(&input.registered_to)
            .bind(&input.status)
            .bind(&input.remarks)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE gst_registrations SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
