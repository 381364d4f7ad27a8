use axum::{
    body::{self, Body},
    extract::{Path, Request, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use serde::de::DeserializeOwned;
use users_shared::api::{CreateUserRequest, CreatedUser, UpdateUserRequest};

use crate::error::AppError;
use crate::response;
use crate::routes::AppState;

/// Upper bound on buffered request bodies, same as axum's default limit.
pub const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Accepts `application/json` with optional parameters such as `charset`.
fn require_json(headers: &HeaderMap) -> Result<(), AppError> {
    let essence = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .ok_or(AppError::UnsupportedMediaType)?;

    if !essence.eq_ignore_ascii_case("application/json") {
        return Err(AppError::UnsupportedMediaType);
    }
    Ok(())
}

/// Checks the Content-Type before a single body byte is buffered.
async fn read_json<T: DeserializeOwned>(request: Request) -> Result<T, AppError> {
    require_json(request.headers())?;
    let bytes = body::to_bytes(request.into_body(), BODY_LIMIT)
        .await
        .map_err(AppError::BodyTooLarge)?;
    serde_json::from_slice(&bytes).map_err(AppError::InvalidJson)
}

fn parse_id(raw: &str) -> Result<i32, AppError> {
    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::InvalidId(raw.to_string())),
    }
}

/// POST /users
#[tracing::instrument(name = "create_user", skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Result<Response, AppError> {
    let req: CreateUserRequest = read_json(request).await?;
    let deadline = state.deadline();

    let id = state
        .users
        .create_user(&deadline, &req.email, &req.name, &req.surname)
        .await?;

    tracing::debug!(id, "user created");
    Ok(response::json(StatusCode::CREATED, &CreatedUser { id }))
}

/// GET /users
#[tracing::instrument(name = "list_users", skip_all)]
pub async fn list_users(State(state): State<AppState>) -> Result<Response, AppError> {
    let deadline = state.deadline();
    let users = state.users.list_users(&deadline).await?;
    Ok(response::json(StatusCode::OK, &users))
}

/// GET /users/:id
#[tracing::instrument(name = "get_user", skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let deadline = state.deadline();

    let user = state.users.get_user(&deadline, id).await?;
    Ok(response::json(StatusCode::OK, &user))
}

/// PUT /users/:id
#[tracing::instrument(name = "update_user", skip(state, request))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Request<Body>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let req: UpdateUserRequest = read_json(request).await?;
    let deadline = state.deadline();

    let user = state
        .users
        .update_user(&deadline, id, &req.email, &req.name, &req.surname)
        .await?;
    Ok(response::json(StatusCode::OK, &user))
}

/// DELETE /users/:id
#[tracing::instrument(name = "delete_user", skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let deadline = state.deadline();

    state.users.delete_user(&deadline, id).await?;
    Ok(response::no_content())
}
