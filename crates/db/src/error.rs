//! Repository error type.

/// Errors surfaced by every store implementation.
///
/// PostgreSQL constraint failures are lifted out of [`sqlx::Error`] so
/// callers can map them without inspecting driver codes. The in-memory
/// stores produce the same variants with the same constraint names.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A unique constraint (named `uq_*`) rejected the write.
    #[error("Duplicate value violates unique constraint: {0}")]
    UniqueViolation(String),

    /// A foreign key (named `fk_*`) rejected the write.
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => return RepoError::UniqueViolation(constraint),
                Some(FOREIGN_KEY_VIOLATION) => return RepoError::ForeignKeyViolation(constraint),
                _ => {}
            }
        }
        RepoError::Database(err)
    }
}

impl RepoError {
    /// True for a unique violation on the named constraint.
    pub fn is_unique_violation_of(&self, name: &str) -> bool {
        matches!(self, RepoError::UniqueViolation(c) if c == name)
    }
}

pub type RepoResult<T> = Result<T, RepoError>;
