//! SmartCore Random Forest Backend
//!
//! Wraps SmartCore's `RandomForestRegressor` behind the [`Regressor`]
//! capability. SmartCore does not expose impurity-based importances, so
//! importance is measured by permutation on the fit set right after training
//! and stored alongside the forest; it therefore survives save/load.

use super::{ModelError, ModelResult, Regressor};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Random forest hyper-parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: Option<u16>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features considered per split; `None` considers every feature
    pub max_features: Option<usize>,
    pub seed: u64,
}

impl Default for ForestParams {
    /// 100 trees, depth 15, split at 5 samples, seed 42
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: Some(15),
            min_samples_split: 5,
            min_samples_leaf: 1,
            max_features: None,
            seed: 42,
        }
    }
}

impl ForestParams {
    fn to_smartcore(&self, n_features: usize) -> RandomForestRegressorParameters {
        RandomForestRegressorParameters {
            max_depth: self.max_depth,
            min_samples_leaf: self.min_samples_leaf,
            min_samples_split: self.min_samples_split,
            n_trees: self.n_trees,
            m: Some(self.max_features.unwrap_or(n_features).clamp(1, n_features)),
            keep_samples: false, // Don't store training samples (saves memory)
            seed: self.seed,
        }
    }
}

/// Trained SmartCore random forest with its permutation importances
#[derive(Debug, Serialize, Deserialize)]
pub struct ForestRegressor {
    forest: Forest,
    importances: Vec<f64>,
}

impl Regressor for ForestRegressor {
    type Params = ForestParams;

    fn fit(x: &[Vec<f64>], y: &[f64], params: &ForestParams) -> ModelResult<Self> {
        if x.is_empty() || y.is_empty() {
            return Err(ModelError::InsufficientData { samples: x.len() });
        }

        if x.len() != y.len() {
            return Err(ModelError::Estimator(format!(
                "Feature and target count mismatch: {} rows, {} targets",
                x.len(),
                y.len()
            )));
        }

        let n_features = x[0].len();
        let x_matrix = to_matrix(x)?;

        let forest = Forest::fit(&x_matrix, &y.to_vec(), params.to_smartcore(n_features))
            .map_err(|e| ModelError::Estimator(format!("RandomForest training failed: {e:?}")))?;

        let importances = permutation_importance(&forest, x, y, params.seed)?;

        Ok(Self {
            forest,
            importances,
        })
    }

    fn predict(&self, x: &[Vec<f64>]) -> ModelResult<Vec<f64>> {
        predict_rows(&self.forest, x)
    }

    fn feature_importances(&self) -> &[f64] {
        &self.importances
    }

    fn to_bytes(&self) -> ModelResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    fn from_bytes(bytes: &[u8]) -> ModelResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

fn to_matrix(x: &[Vec<f64>]) -> ModelResult<DenseMatrix<f64>> {
    let n_samples = x.len();
    let n_features = x.first().map(Vec::len).unwrap_or(0);

    let mut flat_data = Vec::with_capacity(n_samples * n_features);
    for row in x {
        if row.len() != n_features {
            return Err(ModelError::Estimator(
                "All feature vectors must have the same length".to_string(),
            ));
        }
        flat_data.extend_from_slice(row);
    }

    Ok(DenseMatrix::new(n_samples, n_features, flat_data, false))
}

fn predict_rows(forest: &Forest, x: &[Vec<f64>]) -> ModelResult<Vec<f64>> {
    if x.is_empty() {
        return Ok(Vec::new());
    }

    forest
        .predict(&to_matrix(x)?)
        .map_err(|e| ModelError::Estimator(format!("Prediction failed: {e:?}")))
}

fn mean_squared_error(predictions: &[f64], targets: &[f64]) -> f64 {
    let n = predictions.len().max(1) as f64;
    predictions
        .iter()
        .zip(targets)
        .map(|(p, t)| (p - t).powi(2))
        .sum::<f64>()
        / n
}

/// Increase in MSE when one column is shuffled, normalized to sum to 1.
/// Negative increases (shuffling helped by chance) count as zero.
fn permutation_importance(
    forest: &Forest,
    x: &[Vec<f64>],
    y: &[f64],
    seed: u64,
) -> ModelResult<Vec<f64>> {
    let n_features = x[0].len();
    let baseline = mean_squared_error(&predict_rows(forest, x)?, y);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut scores = Vec::with_capacity(n_features);
    for col in 0..n_features {
        let mut column: Vec<f64> = x.iter().map(|row| row[col]).collect();
        column.shuffle(&mut rng);

        let permuted: Vec<Vec<f64>> = x
            .iter()
            .zip(column)
            .map(|(row, value)| {
                let mut row = row.clone();
                row[col] = value;
                row
            })
            .collect();

        let score = mean_squared_error(&predict_rows(forest, &permuted)?, y);
        scores.push((score - baseline).max(0.0));
    }

    let total: f64 = scores.iter().sum();
    if total > 0.0 {
        scores.iter_mut().for_each(|s| *s /= total);
    }

    Ok(scores)
}
