//! Repository for the `rental_submissions` table.

use async_trait::async_trait;
use iras_core::pagination::Page;
use iras_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::rental_submission::{
    CreateRentalSubmission, RentalSubmission, UpdateRentalSubmission,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, ref_no, assmt_year, authorised_person_email, authorised_person_name, \
    development_name, submission_data, total_properties, status, \
    deleted_at, created_at, updated_at";

#[async_trait]
pub trait RentalSubmissionStore: Send + Sync {
    async fn create(&self, input: &CreateRentalSubmission) -> RepoResult<RentalSubmission>;

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<RentalSubmission>>;

    async fn find_by_ref_no(&self, ref_no: &str) -> RepoResult<Option<RentalSubmission>>;

    async fn list(&self, page: &Page) -> RepoResult<(Vec<RentalSubmission>, i64)>;

    async fn update(
        &self,
        id: DbId,
        input: &UpdateRentalSubmission,
    ) -> RepoResult<Option<RentalSubmission>>;

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool>;
}

/// PostgreSQL-backed [`RentalSubmissionStore`].
pub struct RentalSubmissionRepo {
    pool: PgPool,
}

impl RentalSubmissionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RentalSubmissionStore for RentalSubmissionRepo {
    /// An empty `status` falls back to the column default (`submitted`).
    async fn create(&self, input: &CreateRentalSubmission) -> RepoResult<RentalSubmission> {
        let query = format!(
            "INSERT INTO rental_submissions
                (ref_no, assmt_year, authorised_person_email, authorised_person_name,
                 development_name, submission_data, total_properties, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE(NULLIF($8, ''), 'submitted'))
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, RentalSubmission>(&query)
            .bind(&input.ref_no)
            .bind(input.assmt_year)
            .bind(&input.authorised_person_email)
            .bind(&input.authorised_person_name)
            .bind(&input.development_name)
            .bind(&input.submission_data)
            .bind(input.total_properties)
            .bind(&input.status)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<RentalSubmission>> {
        let query = format!(
            "SELECT {COLUMNS} FROM rental_submissions WHERE id = $1 AND deleted_at IS NULL"
        );
        let row = sqlx::query_as::<_, RentalSubmission>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_ref_no(&self, ref_no: &str) -> RepoResult<Option<RentalSubmission>> {
        let query = format!(
            "SELECT {COLUMNS} FROM rental_submissions WHERE ref_no = $1 AND deleted_at IS NULL"
        );
        let row = sqlx::query_as::<_, RentalSubmission>(&query)
            .bind(ref_no)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(&self, page: &Page) -> RepoResult<(Vec<RentalSubmission>, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM rental_submissions WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;
        let query = format!(
            "SELECT {COLUMNS} FROM rental_submissions WHERE deleted_at IS NULL
             ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, RentalSubmission>(&query)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok((rows, total))
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateRentalSubmission,
    ) -> RepoResult<Option<RentalSubmission>> {
        let query = format!(
            "UPDATE rental_submissions SET
                assmt_year = COALESCE($2, assmt_year),
                authorised_person_email = COALESCE($3, authorised_person_email),
                authorised_person_name = COALESCE($4, authorised_person_name),
                development_name = COALESCE($5, development_name),
                submission_data = COALESCE($6, submission_data),
                total_properties = COALESCE($7, total_properties),
                status = COALESCE($8, status)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, RentalSubmission>(&query)
            .bind(id)
            .bind(input.assmt_year)
            .bind(&input.authorised_person_email)
            .bind(&input.authorised_person_name)
            .bind(&input.development_name)
            .bind(&input.submission_data)
            .bind(input.total_properties)
            .bind(&input.status)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE rental_submissions SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
