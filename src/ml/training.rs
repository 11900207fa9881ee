//! Training dataset handling and held-out evaluation.

use super::{ModelError, ModelResult, TrainingMetrics};
use crate::simulation::TrainingSample;

/// Feature matrix and target vector in chronological order
#[derive(Debug, Clone, Default)]
pub struct TrainingDataset {
    pub features: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
}

impl TrainingDataset {
    /// Build rows in [`FEATURE_NAMES`](super::FEATURE_NAMES) order with
    /// occupancy as the target.
    pub fn from_samples(samples: &[TrainingSample]) -> Self {
        let (features, targets) = samples
            .iter()
            .map(|s| (s.features().to_vec(), s.occupancy))
            .unzip();
        Self { features, targets }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Split without shuffling: the first `floor(len * train_ratio)` rows fit
    /// the model, the remainder is held out.
    pub fn split(&self, train_ratio: f64) -> ModelResult<(TrainingDataset, TrainingDataset)> {
        let split_idx = (self.len() as f64 * train_ratio).floor() as usize;

        if split_idx == 0 || split_idx >= self.len() {
            return Err(ModelError::InsufficientData {
                samples: self.len(),
            });
        }

        let train = TrainingDataset {
            features: self.features[..split_idx].to_vec(),
            targets: self.targets[..split_idx].to_vec(),
        };

        let held_out = TrainingDataset {
            features: self.features[split_idx..].to_vec(),
            targets: self.targets[split_idx..].to_vec(),
        };

        Ok((train, held_out))
    }
}

/// Mean squared error, mean absolute error and R² of `predictions`
pub fn evaluate(predictions: &[f64], targets: &[f64]) -> ModelResult<TrainingMetrics> {
    if predictions.len() != targets.len() {
        return Err(ModelError::Estimator(format!(
            "Prediction and target count mismatch: {} predictions, {} targets",
            predictions.len(),
            targets.len()
        )));
    }

    if predictions.is_empty() {
        return Err(ModelError::InsufficientData { samples: 0 });
    }

    let n = predictions.len() as f64;

    let mae: f64 = predictions
        .iter()
        .zip(targets.iter())
        .map(|(p, t)| (p - t).abs())
        .sum::<f64>()
        / n;

    let mse: f64 = predictions
        .iter()
        .zip(targets.iter())
        .map(|(p, t)| (p - t).powi(2))
        .sum::<f64>()
        / n;

    let mean_target: f64 = targets.iter().sum::<f64>() / n;
    let ss_tot: f64 = targets.iter().map(|t| (t - mean_target).powi(2)).sum();
    let ss_res: f64 = predictions
        .iter()
        .zip(targets.iter())
        .map(|(p, t)| (t - p).powi(2))
        .sum();

    // Constant target: R² is undefined, report no explained variance
    let r2 = if ss_tot.abs() < 1e-10 {
        0.0
    } else {
        1.0 - (ss_res / ss_tot)
    };

    Ok(TrainingMetrics::new(mse, mae, r2))
}
