#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tower::util::ServiceExt;
use users_server::{
    deadline::Deadline,
    routes::{create_router, AppState},
    service::UserService,
    store::{StoreError, UserStore},
};
use users_shared::User;

#[derive(Default)]
struct Table {
    rows: BTreeMap<i32, User>,
    next_id: i32,
}

/// In-memory `UserStore` that counts calls and can be made slow or broken.
#[derive(Default)]
pub struct MemoryUserStore {
    table: Mutex<Table>,
    calls: AtomicUsize,
    latency: Mutex<Option<Duration>>,
    broken: Mutex<bool>,
}

impl MemoryUserStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = Some(latency);
    }

    /// Every later call fails with a driver error.
    pub fn break_connection(&self) {
        *self.broken.lock().unwrap() = true;
    }

    async fn enter(&self, deadline: &Deadline) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let latency = *self.latency.lock().unwrap();
        let broken = *self.broken.lock().unwrap();

        deadline
            .run(async move {
                if let Some(latency) = latency {
                    tokio::time::sleep(latency).await;
                }
                if broken {
                    return Err(StoreError::from(sqlx::Error::PoolClosed));
                }
                Ok(())
            })
            .await
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(
        &self,
        deadline: &Deadline,
        email: &str,
        name: &str,
        surname: &str,
    ) -> Result<i32, StoreError> {
        self.enter(deadline).await?;
        let mut table = self.table.lock().unwrap();
        table.next_id += 1;
        let id = table.next_id;
        table.rows.insert(
            id,
            User {
                id,
                email: email.to_string(),
                name: name.to_string(),
                surname: surname.to_string(),
                created_at: Utc::now(),
                updated_at: None,
            },
        );
        Ok(id)
    }

    async fn get(&self, deadline: &Deadline, id: i32) -> Result<User, StoreError> {
        self.enter(deadline).await?;
        let table = self.table.lock().unwrap();
        table.rows.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn list(&self, deadline: &Deadline) -> Result<Vec<User>, StoreError> {
        self.enter(deadline).await?;
        let table = self.table.lock().unwrap();
        Ok(table.rows.values().cloned().collect())
    }

    async fn update(
        &self,
        deadline: &Deadline,
        id: i32,
        email: &str,
        name: &str,
        surname: &str,
    ) -> Result<User, StoreError> {
        self.enter(deadline).await?;
        let mut table = self.table.lock().unwrap();
        let user = table.rows.get_mut(&id).ok_or(StoreError::NotFound)?;

        // Keep the stamp strictly increasing even on a coarse clock.
        let floor = user.updated_at.unwrap_or(user.created_at) + chrono::Duration::microseconds(1);
        user.email = email.to_string();
        user.name = name.to_string();
        user.surname = surname.to_string();
        user.updated_at = Some(Utc::now().max(floor));
        Ok(user.clone())
    }

    async fn delete(&self, deadline: &Deadline, id: i32) -> Result<(), StoreError> {
        self.enter(deadline).await?;
        let mut table = self.table.lock().unwrap();
        table.rows.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}

pub fn test_app(store: Arc<MemoryUserStore>) -> Router {
    test_app_with(store, Duration::from_secs(2), CancellationToken::new())
}

pub fn test_app_with(
    store: Arc<MemoryUserStore>,
    request_timeout: Duration,
    shutdown: CancellationToken,
) -> Router {
    let state = AppState::new(UserService::new(store), request_timeout, shutdown);
    create_router(state)
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response: Response<Body> = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

pub async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}
