use std::sync::Arc;

use users_shared::User;

use crate::deadline::Deadline;
use crate::store::{StoreError, UserStore};

/// Classification every layer above the store branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Persistence,
    Timeout,
    Canceled,
    ShuttingDown,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("failed to {op}: {source}")]
    Store {
        op: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Validation(_) => ErrorKind::Validation,
            ServiceError::Store { source, .. } => match source {
                StoreError::NotFound => ErrorKind::NotFound,
                StoreError::Timeout => ErrorKind::Timeout,
                StoreError::Canceled => ErrorKind::Canceled,
                StoreError::ShuttingDown => ErrorKind::ShuttingDown,
                StoreError::Database(_) => ErrorKind::Persistence,
            },
        }
    }
}

pub const EMAIL_REQUIRED: &str = "email required";
pub const INVALID_ID: &str = "invalid id";

fn context(op: &'static str) -> impl FnOnce(StoreError) -> ServiceError {
    move |source| ServiceError::Store { op, source }
}

fn check_id(id: i32) -> Result<(), ServiceError> {
    if id < 1 {
        return Err(ServiceError::Validation(INVALID_ID));
    }
    Ok(())
}

fn check_email(email: &str) -> Result<(), ServiceError> {
    if email.trim().is_empty() {
        return Err(ServiceError::Validation(EMAIL_REQUIRED));
    }
    Ok(())
}

/// Business rules in front of the store. Nothing here retries: a failure is
/// returned once to the caller.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn create_user(
        &self,
        deadline: &Deadline,
        email: &str,
        name: &str,
        surname: &str,
    ) -> Result<i32, ServiceError> {
        check_email(email)?;
        self.store
            .create(deadline, email, name, surname)
            .await
            .map_err(context("create user"))
    }

    pub async fn get_user(&self, deadline: &Deadline, id: i32) -> Result<User, ServiceError> {
        check_id(id)?;
        self.store
            .get(deadline, id)
            .await
            .map_err(context("get user"))
    }

    pub async fn list_users(&self, deadline: &Deadline) -> Result<Vec<User>, ServiceError> {
        self.store
            .list(deadline)
            .await
            .map_err(context("list users"))
    }

    pub async fn update_user(
        &self,
        deadline: &Deadline,
        id: i32,
        email: &str,
        name: &str,
        surname: &str,
    ) -> Result<User, ServiceError> {
        check_id(id)?;
        check_email(email)?;
        self.store
            .update(deadline, id, email, name, surname)
            .await
            .map_err(context("update user"))
    }

    pub async fn delete_user(&self, deadline: &Deadline, id: i32) -> Result<(), ServiceError> {
        check_id(id)?;
        self.store
            .delete(deadline, id)
            .await
            .map_err(context("delete user"))
    }
}
