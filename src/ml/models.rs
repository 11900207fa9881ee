//! Regression capability used by the occupancy model.

use super::ModelResult;

/// Anything that can learn a scalar target from tabular features.
///
/// [`OccupancyModel`](super::OccupancyModel) is generic over this trait so the
/// random forest can be replaced by a linear or boosted implementation
/// without touching the model lifecycle.
pub trait Regressor: Send + Sync + Sized {
    /// Hyper-parameters handed to [`Regressor::fit`]
    type Params: Clone + Default + Send + Sync;

    /// Fit a fresh estimator. `x` is row-major, one row per sample.
    fn fit(x: &[Vec<f64>], y: &[f64], params: &Self::Params) -> ModelResult<Self>;

    /// Predict one value per row of `x`
    fn predict(&self, x: &[Vec<f64>]) -> ModelResult<Vec<f64>>;

    /// Relative importance of each input column as fractions summing to 1
    /// (or all zeros when no column carries signal).
    fn feature_importances(&self) -> &[f64];

    /// Serialize the learned state into an opaque blob
    fn to_bytes(&self) -> ModelResult<Vec<u8>>;

    /// Restore learned state previously produced by [`Regressor::to_bytes`]
    fn from_bytes(bytes: &[u8]) -> ModelResult<Self>;
}
