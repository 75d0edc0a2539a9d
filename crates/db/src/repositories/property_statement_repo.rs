//! Repository for the `property_statements` table.

use async_trait::async_trait;
use iras_core::pagination::Page;
use iras_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::property_statement::{
    CreatePropertyStatement, PropertyStatement, UpdatePropertyStatement,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, ref_no, property_tax_ref, statement_date, total_amount, consolidated_data, \
    deleted_at, created_at, updated_at";

#[async_trait]
pub trait PropertyStatementStore: Send + Sync {
    async fn create(&self, input: &CreatePropertyStatement) -> RepoResult<PropertyStatement>;

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<PropertyStatement>>;

    /// Composite lookup used by the public retrieve endpoint.
    async fn find_by_ref(
        &self,
        ref_no: &str,
        property_tax_ref: &str,
    ) -> RepoResult<Option<PropertyStatement>>;

    async fn list(&self, page: &Page) -> RepoResult<(Vec<PropertyStatement>, i64)>;

    async fn update(
        &self,
        id: DbId,
        input: &UpdatePropertyStatement,
    ) -> RepoResult<Option<PropertyStatement>>;

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool>;
}

/// PostgreSQL-backed [`PropertyStatementStore`].
pub struct PropertyStatementRepo {
    pool: PgPool,
}

impl PropertyStatementRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PropertyStatementStore for PropertyStatementRepo {
    async fn create(&self, input: &CreatePropertyStatement) -> RepoResult<PropertyStatement> {
        let query = format!(
            "INSERT INTO property_statements
                (ref_no, property_tax_ref, statement_date, total_amount, consolidated_data)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, PropertyStatement>(&query)
            .bind(&input.ref_no)
            .bind(&input.property_tax_ref)
            .bind(&input.statement_date)
            .bind(&input.total_amount)
            .bind(&input.consolidated_data)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<PropertyStatement>> {
        let query = format!(
            "SELECT {COLUMNS} FROM property_statements WHERE id = $1 AND deleted_at IS NULL"
        );
        let row = sqlx::query_as::<_, PropertyStatement>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_ref(
        &self,
        ref_no: &str,
        property_tax_ref: &str,
    ) -> RepoResult<Option<PropertyStatement>> {
        let query = format!(
            "SELECT {COLUMNS} FROM property_statements
             WHERE ref_no = $1 AND property_tax_ref = $2 AND deleted_at IS NULL"
        );
        let row = sqlx::query_as::<_, PropertyStatement>(&query)
            .bind(ref_no)
            .bind(property_tax_ref)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(&self, page: &Page) -> RepoResult<(Vec<PropertyStatement>, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM property_statements WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;
        let query = format!(
            "SELECT {COLUMNS} FROM property_statements WHERE deleted_at IS NULL
             ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, PropertyStatement>(&query)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok((rows, total))
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdatePropertyStatement,
    ) -> RepoResult<Option<PropertyStatement>> {
        let query = format!(
            "UPDATE property_statements SET
                statement_date = COALESCE($2, statement_date),
                total_amount = COALESCE($3, total_amount),
                consolidated_data = COALESCE($4, consolidated_data)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, PropertyStatement>(&query)
            .bind(id)
            .bind(&input.statement_date)
            .bind(&input.total_amount)
            .bind(&input.consolidated_data)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE property_statements SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
