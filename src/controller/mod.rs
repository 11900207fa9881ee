//! Application state shared by the HTTP handlers.
//!
//! One [`OccupancyModel`] lives here for the life of the process. It is made
//! usable once, before the server accepts requests, by loading the artifact
//! or, failing that, training and saving a fresh model.

use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::{Config, ModelConfig};
use crate::ml::{ModelResult, OccupancyModel, TrainingMetrics};
use crate::simulation;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub model: Arc<RwLock<OccupancyModel>>,
    /// Serializes retraining; held by the blocking task until the swap is done
    retrain_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Build state with a ready model (loaded or freshly trained)
    pub async fn new(cfg: Config) -> Result<Self> {
        let model_cfg = cfg.model.clone();
        let model = tokio::task::spawn_blocking(move || prepare_model(&model_cfg))
            .await
            .context("model preparation task panicked")??;

        Ok(Self::with_model(cfg, model))
    }

    /// Wrap an already prepared model
    pub fn with_model(cfg: Config, model: OccupancyModel) -> Self {
        Self {
            cfg,
            model: Arc::new(RwLock::new(model)),
            retrain_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Train a new model on `retrain_days` of fresh history, save it, and
    /// swap it in. Predictions keep using the old model until the swap.
    ///
    /// Once the retrain lock is taken, the fit, the save and the swap run
    /// together on the blocking pool and finish even if the caller is
    /// dropped (e.g. by a request timeout). The lock is held until then.
    pub async fn retrain(&self) -> Result<TrainingMetrics> {
        let guard = Arc::clone(&self.retrain_lock).lock_owned().await;
        let model_cfg = self.cfg.model.clone();
        let live = Arc::clone(&self.model);

        let metrics = tokio::task::spawn_blocking(move || -> ModelResult<TrainingMetrics> {
            let _guard = guard;

            let mut model: OccupancyModel = OccupancyModel::with_params(model_cfg.forest_params());
            let data = simulation::generate(model_cfg.retrain_days);
            let metrics = model.train(Some(&data))?;
            model.save(&model_cfg.path)?;

            *live.write() = model;
            info!(accuracy = metrics.accuracy, "retrained model is live");
            Ok(metrics)
        })
        .await
        .context("retrain task panicked")??;

        Ok(metrics)
    }
}

/// Load the configured artifact, or train on `training_days` of synthetic
/// history and save the result.
pub fn prepare_model(cfg: &ModelConfig) -> Result<OccupancyModel> {
    let mut model: OccupancyModel = OccupancyModel::with_params(cfg.forest_params());

    match model.load(&cfg.path) {
        Ok(true) => return Ok(model),
        Ok(false) => info!(path = %cfg.path.display(), "no saved model, training a new one"),
        Err(e) => warn!(error = %e, path = %cfg.path.display(), "saved model unreadable, training a new one"),
    }

    let data = simulation::generate(cfg.training_days);
    model.train(Some(&data))?;
    model.save(&cfg.path)?;
    Ok(model)
}
