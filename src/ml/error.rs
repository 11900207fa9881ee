use thiserror::Error;

/// Failures surfaced by the occupancy model.
///
/// A missing model artifact is not an error: [`OccupancyModel::load`]
/// reports it as `Ok(false)` so the caller can decide to train instead.
///
/// [`OccupancyModel::load`]: super::OccupancyModel::load
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model not trained")]
    NotTrained,

    #[error("Insufficient training data: {samples} samples cannot be split into fit and held-out sets")]
    InsufficientData { samples: usize },

    #[error("Estimator error: {0}")]
    Estimator(String),

    #[error("Model artifact I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Model artifact encoding failed: {0}")]
    Codec(#[from] bincode::Error),
}

pub type ModelResult<T> = std::result::Result<T, ModelError>;
