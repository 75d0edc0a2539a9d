//! Repository for the `products` table.
//!
//! Every read joins `categories` so rows carry `category_name`. A category
//! that has been soft-deleted yields `NULL` there.

use async_trait::async_trait;
use iras_core::pagination::Page;
use iras_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::product::{CreateProduct, Product, UpdateProduct};

/// Product columns qualified with the `p` alias, plus the joined name.
const COLUMNS: &str = "\
    p.id, p.name, p.description, p.price, p.stock, p.category_id, p.user_id, \
    c.name AS category_name, p.deleted_at, p.created_at, p.updated_at";

const JOIN: &str = "LEFT JOIN categories c ON c.id = p.category_id AND c.deleted_at IS NULL";

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn create(&self, input: &CreateProduct) -> RepoResult<Product>;

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<Product>>;

    async fn list(&self, page: &Page) -> RepoResult<(Vec<Product>, i64)>;

    /// Live products referencing a category.
    async fn count_by_category(&self, category_id: DbId) -> RepoResult<i64>;

    async fn update(&self, id: DbId, input: &UpdateProduct) -> RepoResult<Option<Product>>;

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool>;
}

/// PostgreSQL-backed [`ProductStore`].
pub struct ProductRepo {
    pool: PgPool,
}

impl ProductRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for ProductRepo {
    async fn create(&self, input: &CreateProduct) -> RepoResult<Product> {
        let query = format!(
            "WITH p AS (
                INSERT INTO products (name, description, price, stock, category_id, user_id)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
             )
             SELECT {COLUMNS} FROM p {JOIN}"
        );
        let row = sqlx::query_as::<_, Product>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.stock)
            .bind(input.category_id)
            .bind(input.user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<Product>> {
        let query = format!(
            "SELECT {COLUMNS} FROM products p {JOIN} WHERE p.id = $1 AND p.deleted_at IS NULL"
        );
        let row = sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(&self, page: &Page) -> RepoResult<(Vec<Product>, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;
        let query = format!(
            "SELECT {COLUMNS} FROM products p {JOIN} WHERE p.deleted_at IS NULL
             ORDER BY p.created_at DESC, p.id DESC LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, Product>(&query)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok((rows, total))
    }

    async fn count_by_category(&self, category_id: DbId) -> RepoResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE category_id = $1 AND deleted_at IS NULL",
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn update(&self, id: DbId, input: &UpdateProduct) -> RepoResult<Option<Product>> {
        let query = format!(
            "WITH p AS (
                UPDATE products SET
                    name = COALESCE($2, name),
                    description = COALESCE($3, description),
                    price = COALESCE($4, price),
                    stock = COALESCE($5, stock),
                    category_id = COALESCE($6, category_id)
                WHERE id = $1 AND deleted_at IS NULL
                RETURNING *
             )
             SELECT {COLUMNS} FROM p {JOIN}"
        );
        let row = sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.stock)
            .bind(input.category_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE products SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
