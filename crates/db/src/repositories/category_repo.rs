//! Repository for the `categories` table.

use async_trait::async_trait;
use iras_core::pagination::Page;
use iras_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::category::{Category, CreateCategory, UpdateCategory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, deleted_at, created_at, updated_at";

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn create(&self, input: &CreateCategory) -> RepoResult<Category>;

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<Category>>;

    async fn list(&self, page: &Page) -> RepoResult<(Vec<Category>, i64)>;

    async fn update(&self, id: DbId, input: &UpdateCategory) -> RepoResult<Option<Category>>;

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool>;
}

/// PostgreSQL-backed [`CategoryStore`].
pub struct CategoryRepo {
    pool: PgPool,
}

impl CategoryRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for CategoryRepo {
    async fn create(&self, input: &CreateCategory) -> RepoResult<Category> {
        let query = format!(
            "INSERT INTO categories (name, description) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<Category>> {
        let query =
            format!("SELECT {COLUMNS} FROM categories WHERE id = $1 AND deleted_at IS NULL");
        let row = sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(&self, page: &Page) -> RepoResult<(Vec<Category>, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;
        let query = format!(
            "SELECT {COLUMNS} FROM categories WHERE deleted_at IS NULL
             ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, Category>(&query)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok((rows, total))
    }

    async fn update(&self, id: DbId, input: &UpdateCategory) -> RepoResult<Option<Category>> {
        let query = format!(
            "UPDATE categories SET
                name = COALESCE($2, name),
                description = COALESCE($3, description)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE categories SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
