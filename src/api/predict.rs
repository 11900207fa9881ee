use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    api::error::ApiError,
    controller::AppState,
    ml::OccupancyPrediction,
    optimizer::{decide, Decision},
};

/// Inputs for a single-hour prediction. Missing fields take the defaults of
/// a mid-morning Wednesday.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct PredictRequest {
    #[validate(range(min = 0, max = 23))]
    pub hour: u32,
    #[validate(range(min = 0, max = 6))]
    pub day_of_week: u32,
    pub temperature: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub humidity: f64,
}

impl Default for PredictRequest {
    fn default() -> Self {
        Self {
            hour: 10,
            day_of_week: 2,
            temperature: 22.0,
            humidity: 45.0,
        }
    }
}

/// Prediction merged with the decision it implies
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    #[serde(flatten)]
    pub prediction: OccupancyPrediction,
    #[serde(flatten)]
    pub decision: Decision,
}

/// POST /api/predict - Occupancy and HVAC/lighting decision for one hour
pub async fn predict(
    State(state): State<AppState>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(req) = body?;
    req.validate()?;

    let prediction = state
        .model
        .read()
        .predict(req.hour, req.day_of_week, req.temperature, req.humidity)?;

    Ok(Json(PredictResponse {
        decision: decide(prediction.occupancy),
        prediction,
    }))
}
