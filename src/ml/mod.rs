//! Occupancy Prediction Module
//!
//! This module owns the regression side of the pipeline:
//! - A swappable [`Regressor`] capability with a SmartCore random-forest backend
//! - Chronological train/held-out evaluation (MSE, MAE, R²)
//! - The [`OccupancyModel`] lifecycle: train, predict, introspect, save, load
//!
//! # Feature order
//! Every feature row is `[hour, day_of_week, temperature, humidity]`, in the
//! order of [`FEATURE_NAMES`]. Callers must supply values in exactly this order.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

pub mod error;
pub mod models;
pub mod occupancy;
pub mod smartcore;
pub mod training;

pub use error::{ModelError, ModelResult};
pub use models::Regressor;
pub use occupancy::OccupancyModel;
pub use self::smartcore::{ForestParams, ForestRegressor};
pub use training::TrainingDataset;

/// Input dimensions of the occupancy model, order-significant.
pub const FEATURE_NAMES: [&str; 4] = ["hour", "day_of_week", "temperature", "humidity"];

/// Where the currently held estimator came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ModelStatus {
    Untrained,
    Trained,
    /// Restored from an artifact. Training metadata is not part of the
    /// artifact, so `training_samples` and `model_accuracy` read 0.
    Loaded,
}

/// Held-out evaluation of a training run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TrainingMetrics {
    pub mse: f64,
    pub mae: f64,
    pub r2: f64,
    /// `clamp(r2 * 100 + 80, 0, 100)`. A dashboard-friendly score derived
    /// from R², not a calibrated accuracy.
    pub accuracy: f64,
}

impl TrainingMetrics {
    pub fn new(mse: f64, mae: f64, r2: f64) -> Self {
        Self {
            mse,
            mae,
            r2,
            accuracy: (r2 * 100.0 + 80.0).clamp(0.0, 100.0),
        }
    }
}

/// Result of a single occupancy inference
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OccupancyPrediction {
    /// Estimated occupancy fraction, clamped to [0, 1]
    pub occupancy: f64,
    /// Heuristic `1 - |occupancy - 0.5| * 0.3`: highest at mid occupancy,
    /// lowest at the extremes. Not a statistical confidence interval.
    pub confidence: f64,
}

impl OccupancyPrediction {
    pub fn from_raw(raw: f64) -> Self {
        let occupancy = raw.clamp(0.0, 1.0);
        Self {
            occupancy,
            confidence: 1.0 - (occupancy - 0.5).abs() * 0.3,
        }
    }
}

/// Relative importance (percent) per feature, in [`FEATURE_NAMES`] order.
///
/// Serializes as a JSON object whose keys keep the feature order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureImportance {
    entries: Vec<(String, f64)>,
}

impl FeatureImportance {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for FeatureImportance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_heuristic_is_clamped() {
        assert_eq!(TrainingMetrics::new(0.0, 0.0, 0.9).accuracy, 100.0);
        assert!((TrainingMetrics::new(0.0, 0.0, 0.1).accuracy - 90.0).abs() < 1e-9);
        assert_eq!(TrainingMetrics::new(0.0, 0.0, -1.5).accuracy, 0.0);
    }

    #[test]
    fn test_prediction_clamps_and_scores_confidence() {
        let low = OccupancyPrediction::from_raw(-0.3);
        assert_eq!(low.occupancy, 0.0);
        assert!((low.confidence - 0.85).abs() < 1e-9);

        let high = OccupancyPrediction::from_raw(1.7);
        assert_eq!(high.occupancy, 1.0);
        assert!((high.confidence - 0.85).abs() < 1e-9);

        let mid = OccupancyPrediction::from_raw(0.5);
        assert_eq!(mid.confidence, 1.0);
    }

    #[test]
    fn test_feature_importance_serializes_in_order() {
        let importance = FeatureImportance::new(
            FEATURE_NAMES
                .iter()
                .zip([40.0, 30.0, 20.0, 10.0])
                .map(|(n, v)| (n.to_string(), v))
                .collect(),
        );

        let json = serde_json::to_string(&importance).unwrap();
        assert_eq!(
            json,
            r#"{"hour":40.0,"day_of_week":30.0,"temperature":20.0,"humidity":10.0}"#
        );
        assert_eq!(importance.get("temperature"), Some(20.0));
        assert_eq!(importance.get("pressure"), None);
    }

    #[test]
    fn test_model_status_display() {
        assert_eq!(ModelStatus::Loaded.to_string(), "loaded");
        assert_eq!(
            serde_json::to_string(&ModelStatus::Untrained).unwrap(),
            "\"untrained\""
        );
    }
}
