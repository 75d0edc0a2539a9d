//! Repository for the `users` table.

use async_trait::async_trait;
use iras_core::pagination::Page;
use iras_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::user::{CreateUser, UpdateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, name, username, email, password_hash, role, is_active, \
    deleted_at, created_at, updated_at";

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, input: &CreateUser) -> RepoResult<User>;

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Login lookup: `identifier` may be either the username or the email.
    async fn find_by_login(&self, identifier: &str) -> RepoResult<Option<User>>;

    async fn list(&self, page: &Page) -> RepoResult<(Vec<User>, i64)>;

    async fn update(&self, id: DbId, input: &UpdateUser) -> RepoResult<Option<User>>;

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool>;
}

/// PostgreSQL-backed [`UserStore`].
pub struct UserRepo {
    pool: PgPool,
}

impl UserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_where(&self, predicate: &str, value: &str) -> RepoResult<Option<User>> {
        let query =
            format!("SELECT {COLUMNS} FROM users WHERE {predicate} AND deleted_at IS NULL");
        let row = sqlx::query_as::<_, User>(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl UserStore for UserRepo {
    async fn create(&self, input: &CreateUser) -> RepoResult<User> {
        let query = format!(
            "INSERT INTO users (name, username, email, password_hash, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL");
        let row = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        self.find_where("username = $1", username).await
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.find_where("email = $1", email).await
    }

    async fn find_by_login(&self, identifier: &str) -> RepoResult<Option<User>> {
        self.find_where("(username = $1 OR email = $1)", identifier)
            .await
    }

    async fn list(&self, page: &Page) -> RepoResult<(Vec<User>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await?;
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE deleted_at IS NULL
             ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, User>(&query)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok((rows, total))
    }

    async fn update(&self, id: DbId, input: &UpdateUser) -> RepoResult<Option<User>> {
        let query = format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                role = COALESCE($5, role),
                is_active = COALESCE($6, is_active)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .bind(input.is_active)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool> {
        let result =
            sqlx::query("UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
