use axum::{http::StatusCode, response::IntoResponse};

/// GET /healthz - liveness probe
pub async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}
