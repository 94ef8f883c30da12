use axum::response::{IntoResponse, Response};
use http::StatusCode;

#[tracing::instrument]
pub async fn handler() -> Response {
    (StatusCode::OK, "ok").into_response()
}
