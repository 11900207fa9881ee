use axum::{extract::State, Json};
use serde::Serialize;

use crate::{api::error::ApiError, controller::AppState, ml::TrainingMetrics};

#[derive(Debug, Serialize)]
pub struct RetrainResponse {
    status: &'static str,
    message: &'static str,
    metrics: TrainingMetrics,
}

/// POST /api/retrain - Fit a fresh model and swap it in
///
/// Runs to completion before responding. Concurrent calls queue behind each
/// other; predictions keep being served by the previous model meanwhile.
pub async fn retrain(State(state): State<AppState>) -> Result<Json<RetrainResponse>, ApiError> {
    let metrics = state.retrain().await?;

    Ok(Json(RetrainResponse {
        status: "success",
        message: "Model retrained",
        metrics,
    }))
}
