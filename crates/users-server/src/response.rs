use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use users_shared::api::ErrorBody;

const FALLBACK_BODY: &str = r#"{"error":"internal server error"}"#;

fn with_json_body(status: StatusCode, bytes: Vec<u8>) -> Response {
    let mut response = (status, Body::from(bytes)).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

/// Writes `value` as the JSON body with `status`. Every handler, success or
/// failure, goes through here.
pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(bytes) => with_json_body(status, bytes),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode response body");
            with_json_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                FALLBACK_BODY.as_bytes().to_vec(),
            )
        }
    }
}

pub fn error(status: StatusCode, message: &str) -> Response {
    json(status, &ErrorBody::new(message))
}

pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}
