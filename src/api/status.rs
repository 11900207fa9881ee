use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    controller::AppState,
    ml::{FeatureImportance, ModelStatus},
};

/// Model status response
#[derive(Debug, Serialize)]
pub struct SystemStatus {
    model_status: ModelStatus,
    model_accuracy: f64,
    training_samples: usize,
    trained_at: Option<DateTime<Utc>>,
    timestamp: DateTime<Utc>,
}

/// GET /api/status - Current model state
///
/// Accuracy, sample count and training time are zero/null after a load
/// from disk, since the artifact only carries the estimator.
pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let model = state.model.read();

    Json(SystemStatus {
        model_status: model.status(),
        model_accuracy: model.model_accuracy(),
        training_samples: model.training_samples(),
        trained_at: model.trained_at(),
        timestamp: Utc::now(),
    })
}

/// GET /api/features - Feature importance in percent
pub async fn get_features(State(state): State<AppState>) -> Json<FeatureImportance> {
    Json(state.model.read().feature_importance())
}
