use axum::{
    extract::{rejection::QueryRejection, Query},
    Json,
};
use serde::Deserialize;

use crate::{
    api::error::ApiError,
    optimizer::{
        baseline_schedule, build_daily_schedule, energy_comparison, scenario_predictions,
        DailySchedule, EnergyComparison, ScenarioMode,
    },
};

#[derive(Debug, Default, Deserialize)]
pub struct ScheduleQuery {
    pub mode: Option<String>,
}

impl ScheduleQuery {
    fn scenario(&self) -> Result<ScenarioMode, ApiError> {
        match self.mode.as_deref() {
            None => Ok(ScenarioMode::default()),
            Some(mode) => mode
                .parse()
                .map_err(|_| ApiError::BadRequest(format!("unknown mode '{mode}'"))),
        }
    }
}

fn scenario_schedule(mode: ScenarioMode) -> DailySchedule {
    let predictions = scenario_predictions(mode, &mut rand::thread_rng());
    build_daily_schedule(&predictions)
}

/// GET /api/schedule/24h?mode=normal|weekend|peak
///
/// Decisions for a jittered scenario profile; two calls rarely match.
pub async fn get_schedule(
    query: Result<Query<ScheduleQuery>, QueryRejection>,
) -> Result<Json<DailySchedule>, ApiError> {
    let Query(query) = query?;
    let mode = query.scenario()?;
    tracing::debug!(%mode, "building scenario schedule");

    Ok(Json(scenario_schedule(mode)))
}

/// GET /api/baseline/24h - Always-on reference schedule
pub async fn get_baseline() -> Json<DailySchedule> {
    Json(baseline_schedule())
}

/// GET /api/energy/comparison - Always-on vs optimized reference day
pub async fn get_energy_comparison() -> Json<EnergyComparison> {
    Json(energy_comparison())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_defaults_to_normal() {
        assert_eq!(ScheduleQuery::default().scenario().unwrap(), ScenarioMode::Normal);
    }

    #[test]
    fn test_unknown_mode_is_bad_request() {
        let query = ScheduleQuery {
            mode: Some("holiday".to_string()),
        };
        assert!(matches!(query.scenario(), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_scenario_schedule_shape() {
        let schedule = scenario_schedule(ScenarioMode::Weekend);
        assert_eq!(schedule.len(), 24);
        assert!(schedule
            .iter()
            .all(|e| (0.0..=1.0).contains(&e.predicted_occupancy)));
    }
}
