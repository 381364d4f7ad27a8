use async_trait::async_trait;
use users_shared::User;

use crate::deadline::Deadline;

mod postgres;

pub use postgres::PgUserStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("user not found")]
    NotFound,

    #[error("deadline exceeded")]
    Timeout,

    #[error("request canceled")]
    Canceled,

    #[error("server shutting down")]
    ShuttingDown,

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Database(other),
        }
    }
}

/// Single point of SQL execution for the `users` table. Implementations
/// classify failures and forward them; they never retry or recover.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(
        &self,
        deadline: &Deadline,
        email: &str,
        name: &str,
        surname: &str,
    ) -> Result<i32, StoreError>;

    async fn get(&self, deadline: &Deadline, id: i32) -> Result<User, StoreError>;

    /// An empty table yields an empty vec.
    async fn list(&self, deadline: &Deadline) -> Result<Vec<User>, StoreError>;

    /// Replaces email/name/surname and stamps `updated_at`.
    async fn update(
        &self,
        deadline: &Deadline,
        id: i32,
        email: &str,
        name: &str,
        surname: &str,
    ) -> Result<User, StoreError>;

    /// Deleting a missing id is `NotFound`, not a no-op.
    async fn delete(&self, deadline: &Deadline, id: i32) -> Result<(), StoreError>;
}
