use std::time::Duration;

use axum::{routing::get, Router};
use tokio_util::sync::CancellationToken;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::deadline::Deadline;
use crate::handlers::users as user_handlers;
use crate::service::UserService;

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub request_timeout: Duration,
    /// Parent of every request token; cancelled when shutdown runs out of grace.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(users: UserService, request_timeout: Duration, shutdown: CancellationToken) -> Self {
        Self {
            users,
            request_timeout,
            shutdown,
        }
    }

    pub fn deadline(&self) -> Deadline {
        Deadline::with_parent(&self.shutdown, self.request_timeout)
    }
}

pub fn create_router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route(
            "/",
            get(user_handlers::list_users).post(user_handlers::create_user),
        )
        .route(
            "/:id",
            get(user_handlers::get_user)
                .put(user_handlers::update_user)
                .delete(user_handlers::delete_user),
        );

    Router::new()
        .route("/healthcheck", get(health_check))
        .nest("/users", user_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "Server is up!"
}
