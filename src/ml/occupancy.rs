//! Occupancy model lifecycle.
//!
//! An [`OccupancyModel`] starts untrained, becomes usable after a successful
//! [`train`](OccupancyModel::train) or [`load`](OccupancyModel::load), and can
//! be retrained at any time. Training always replaces the estimator and its
//! metadata wholesale; a failed training run leaves the previous state intact.
//!
//! The model does no locking. Callers that share one instance must serialize
//! `train`/`load` against each other and against readers.

use super::training::{self, TrainingDataset};
use super::{
    FeatureImportance, ForestRegressor, ModelError, ModelResult, ModelStatus,
    OccupancyPrediction, Regressor, TrainingMetrics, FEATURE_NAMES,
};
use crate::simulation::{self, TrainingSample};
use chrono::{DateTime, Utc};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Days of synthetic history used when `train` is given no data
pub const DEFAULT_TRAINING_DAYS: u32 = 60;

/// Share of samples (oldest first) used for fitting; the rest is held out
pub const TRAIN_RATIO: f64 = 0.8;

pub struct OccupancyModel<R: Regressor = ForestRegressor> {
    estimator: Option<R>,
    params: R::Params,
    training_samples: usize,
    model_accuracy: f64,
    trained_at: Option<DateTime<Utc>>,
    status: ModelStatus,
}

impl OccupancyModel<ForestRegressor> {
    /// Untrained random-forest model with default hyper-parameters
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: Regressor> Default for OccupancyModel<R> {
    fn default() -> Self {
        Self::with_params(R::Params::default())
    }
}

impl<R: Regressor> OccupancyModel<R> {
    /// Untrained model that will fit its estimator with `params`
    pub fn with_params(params: R::Params) -> Self {
        Self {
            estimator: None,
            params,
            training_samples: 0,
            model_accuracy: 0.0,
            trained_at: None,
            status: ModelStatus::Untrained,
        }
    }

    /// Fit a fresh estimator and evaluate it on the held-out tail.
    ///
    /// With `data = None`, [`DEFAULT_TRAINING_DAYS`] of synthetic history are
    /// generated. The split is chronological (no shuffling).
    pub fn train(&mut self, data: Option<&[TrainingSample]>) -> ModelResult<TrainingMetrics> {
        let generated;
        let samples = match data {
            Some(samples) => samples,
            None => {
                info!(days = DEFAULT_TRAINING_DAYS, "generating synthetic training data");
                generated = simulation::generate(DEFAULT_TRAINING_DAYS);
                &generated
            }
        };

        let dataset = TrainingDataset::from_samples(samples);
        let (fit_set, held_out) = dataset.split(TRAIN_RATIO)?;

        info!(
            samples = dataset.len(),
            fit = fit_set.len(),
            held_out = held_out.len(),
            "training occupancy model"
        );

        let estimator = R::fit(&fit_set.features, &fit_set.targets, &self.params)?;
        let predictions = estimator.predict(&held_out.features)?;
        let metrics = training::evaluate(&predictions, &held_out.targets)?;

        self.estimator = Some(estimator);
        self.training_samples = dataset.len();
        self.model_accuracy = metrics.accuracy;
        self.trained_at = Some(Utc::now());
        self.status = ModelStatus::Trained;

        info!(
            accuracy = metrics.accuracy,
            r2 = metrics.r2,
            mse = metrics.mse,
            mae = metrics.mae,
            "occupancy model trained"
        );

        Ok(metrics)
    }

    /// Predict occupancy for one hour. Arguments follow [`FEATURE_NAMES`].
    pub fn predict(
        &self,
        hour: u32,
        day_of_week: u32,
        temperature: f64,
        humidity: f64,
    ) -> ModelResult<OccupancyPrediction> {
        let estimator = self.estimator.as_ref().ok_or(ModelError::NotTrained)?;

        let row = vec![hour as f64, day_of_week as f64, temperature, humidity];
        let raw = estimator
            .predict(&[row])?
            .first()
            .copied()
            .ok_or_else(|| ModelError::Estimator("Model returned empty predictions".to_string()))?;

        Ok(OccupancyPrediction::from_raw(raw))
    }

    /// Importance of each feature in percent; empty when untrained.
    /// Values are not rounded and need not sum to exactly 100.
    pub fn feature_importance(&self) -> FeatureImportance {
        let Some(estimator) = &self.estimator else {
            return FeatureImportance::default();
        };

        FeatureImportance::new(
            FEATURE_NAMES
                .iter()
                .zip(estimator.feature_importances())
                .map(|(name, share)| (name.to_string(), share * 100.0))
                .collect(),
        )
    }

    /// Write the estimator's learned state to `path`, creating parent
    /// directories. Training metadata is not written.
    ///
    /// The bytes go to a temporary file in the same directory which is then
    /// renamed over `path`, so readers never see a partial artifact.
    pub fn save(&self, path: impl AsRef<Path>) -> ModelResult<()> {
        let path = path.as_ref();
        let estimator = self.estimator.as_ref().ok_or(ModelError::NotTrained)?;

        let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                parent
            }
            None => Path::new("."),
        };

        let bytes = estimator.to_bytes()?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;

        info!(path = %path.display(), bytes = bytes.len(), "occupancy model saved");
        Ok(())
    }

    /// Restore an estimator saved by [`save`](Self::save).
    ///
    /// Returns `Ok(false)` and leaves the model untouched when `path` does not
    /// exist. On success the status becomes [`ModelStatus::Loaded`] and the
    /// training metadata reads as zero, since the artifact does not carry it.
    pub fn load(&mut self, path: impl AsRef<Path>) -> ModelResult<bool> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no model artifact found");
            return Ok(false);
        }

        let bytes = fs::read(path)?;
        let estimator = R::from_bytes(&bytes)?;

        self.estimator = Some(estimator);
        self.training_samples = 0;
        self.model_accuracy = 0.0;
        self.trained_at = None;
        self.status = ModelStatus::Loaded;

        info!(path = %path.display(), "occupancy model loaded");
        Ok(true)
    }

    pub fn is_trained(&self) -> bool {
        self.estimator.is_some()
    }

    pub fn status(&self) -> ModelStatus {
        self.status
    }

    pub fn feature_names(&self) -> &'static [&'static str] {
        &FEATURE_NAMES
    }

    pub fn training_samples(&self) -> usize {
        self.training_samples
    }

    pub fn model_accuracy(&self) -> f64 {
        self.model_accuracy
    }

    pub fn trained_at(&self) -> Option<DateTime<Utc>> {
        self.trained_at
    }

    pub fn params(&self) -> &R::Params {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::ForestParams;
    use chrono::NaiveDate;

    fn history(days: u32) -> Vec<TrainingSample> {
        let today = NaiveDate::from_ymd_opt(2024, 6, 17).unwrap();
        simulation::generate_seeded(days, 11, today)
    }

    fn small_model() -> OccupancyModel {
        OccupancyModel::with_params(ForestParams {
            n_trees: 12,
            max_depth: Some(8),
            ..ForestParams::default()
        })
    }

    /// Always answers the same value, whatever the input
    struct ConstantRegressor(f64);

    impl Regressor for ConstantRegressor {
        type Params = f64;

        fn fit(_x: &[Vec<f64>], _y: &[f64], params: &f64) -> ModelResult<Self> {
            Ok(Self(*params))
        }

        fn predict(&self, x: &[Vec<f64>]) -> ModelResult<Vec<f64>> {
            Ok(vec![self.0; x.len()])
        }

        fn feature_importances(&self) -> &[f64] {
            &[0.25, 0.25, 0.25, 0.25]
        }

        fn to_bytes(&self) -> ModelResult<Vec<u8>> {
            Ok(self.0.to_le_bytes().to_vec())
        }

        fn from_bytes(bytes: &[u8]) -> ModelResult<Self> {
            let raw: [u8; 8] = bytes
                .try_into()
                .map_err(|_| ModelError::Estimator("expected 8 bytes".to_string()))?;
            Ok(Self(f64::from_le_bytes(raw)))
        }
    }

    #[test]
    fn test_untrained_model() {
        let model = OccupancyModel::new();
        assert!(!model.is_trained());
        assert_eq!(model.status(), ModelStatus::Untrained);
        assert!(matches!(
            model.predict(10, 2, 22.0, 45.0),
            Err(ModelError::NotTrained)
        ));
        assert!(model.feature_importance().is_empty());
        assert!(matches!(
            model.save("unused/model.bin"),
            Err(ModelError::NotTrained)
        ));
        assert_eq!(model.feature_names(), &["hour", "day_of_week", "temperature", "humidity"]);
    }

    #[test]
    fn test_train_populates_metadata() {
        let mut model = small_model();
        let data = history(14);

        let metrics = model.train(Some(&data)).unwrap();

        assert!(model.is_trained());
        assert_eq!(model.status(), ModelStatus::Trained);
        assert_eq!(model.training_samples(), 14 * 24);
        assert_eq!(model.model_accuracy(), metrics.accuracy);
        assert!(model.trained_at().is_some());
        assert!(metrics.mse >= 0.0 && metrics.mae >= 0.0);
        assert!((0.0..=100.0).contains(&metrics.accuracy));
        assert_eq!(
            metrics.accuracy,
            (metrics.r2 * 100.0 + 80.0).clamp(0.0, 100.0)
        );
    }

    #[test]
    fn test_predictions_are_bounded() {
        let mut model = small_model();
        model.train(Some(&history(14))).unwrap();

        for hour in 0..24 {
            let p = model.predict(hour, 2, 22.0, 45.0).unwrap();
            assert!((0.0..=1.0).contains(&p.occupancy));
            assert!((0.85..=1.0).contains(&p.confidence));
        }
    }

    #[test]
    fn test_office_hours_predict_higher_than_night() {
        let mut model = small_model();
        model.train(Some(&history(28))).unwrap();

        let office = model.predict(10, 2, 24.0, 55.0).unwrap().occupancy;
        let night = model.predict(3, 2, 23.0, 55.0).unwrap().occupancy;
        assert!(office > night);
    }

    #[test]
    fn test_feature_importance_follows_feature_order() {
        let mut model = small_model();
        model.train(Some(&history(14))).unwrap();

        let importance = model.feature_importance();
        let names: Vec<&str> = importance.iter().map(|(n, _)| n).collect();
        assert_eq!(names, FEATURE_NAMES);

        let total: f64 = importance.iter().map(|(_, v)| v).sum();
        assert!(total == 0.0 || (total - 100.0).abs() < 1e-6);
        assert!(importance.iter().all(|(_, v)| v >= 0.0));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("models").join("rf_model.bin");

        let mut model = small_model();
        model.train(Some(&history(14))).unwrap();
        model.save(&path).unwrap();
        assert!(path.exists());

        let mut restored = OccupancyModel::new();
        assert!(restored.load(&path).unwrap());
        assert_eq!(restored.status(), ModelStatus::Loaded);

        for (hour, dow, temp, hum) in [(9, 1, 23.5, 52.0), (22, 6, 20.1, 41.0), (13, 3, 25.0, 61.2)] {
            assert_eq!(
                model.predict(hour, dow, temp, hum).unwrap(),
                restored.predict(hour, dow, temp, hum).unwrap()
            );
        }
        assert_eq!(model.feature_importance(), restored.feature_importance());

        // Metadata is not part of the artifact
        assert_eq!(restored.training_samples(), 0);
        assert_eq!(restored.model_accuracy(), 0.0);
        assert!(restored.trained_at().is_none());
    }

    #[test]
    fn test_train_without_data_uses_default_history() {
        let mut model = small_model();

        let metrics = model.train(None).unwrap();

        assert_eq!(model.status(), ModelStatus::Trained);
        assert_eq!(model.training_samples(), DEFAULT_TRAINING_DAYS as usize * 24);
        assert_eq!(model.training_samples(), 60 * 24);
        assert!((0.0..=100.0).contains(&metrics.accuracy));
    }

    #[test]
    fn test_save_replaces_artifact_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rf_model.bin");

        let mut first = small_model();
        first.train(Some(&history(7))).unwrap();
        first.save(&path).unwrap();

        let mut second = small_model();
        second.train(Some(&history(10))).unwrap();
        second.save(&path).unwrap();

        let files: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);

        let mut restored = OccupancyModel::new();
        assert!(restored.load(&path).unwrap());
        for hour in [2, 10, 15] {
            assert_eq!(
                second.predict(hour, 1, 22.0, 45.0).unwrap(),
                restored.predict(hour, 1, 22.0, 45.0).unwrap()
            );
        }
    }

    #[test]
    fn test_load_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let mut model = OccupancyModel::new();

        assert!(!model.load(dir.path().join("missing.bin")).unwrap());
        assert!(!model.is_trained());
        assert_eq!(model.status(), ModelStatus::Untrained);
    }

    #[test]
    fn test_load_corrupt_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.bin");
        fs::write(&path, b"not a model").unwrap();

        let mut model = OccupancyModel::new();
        assert!(model.load(&path).is_err());
        assert!(!model.is_trained());
    }

    #[test]
    fn test_failed_training_keeps_previous_state() {
        let mut model = small_model();
        model.train(Some(&history(7))).unwrap();

        let tiny = history(7).into_iter().take(1).collect::<Vec<_>>();
        assert!(matches!(
            model.train(Some(&tiny)),
            Err(ModelError::InsufficientData { samples: 1 })
        ));

        assert!(model.is_trained());
        assert_eq!(model.training_samples(), 7 * 24);
    }

    #[test]
    fn test_retrain_replaces_metadata() {
        let mut model = small_model();
        model.train(Some(&history(7))).unwrap();
        model.train(Some(&history(10))).unwrap();
        assert_eq!(model.training_samples(), 10 * 24);
    }

    #[test]
    fn test_clamps_any_estimator_output() {
        let mut high: OccupancyModel<ConstantRegressor> = OccupancyModel::with_params(42.0);
        high.train(Some(&history(2))).unwrap();
        assert_eq!(high.predict(10, 2, 22.0, 45.0).unwrap().occupancy, 1.0);

        let mut low: OccupancyModel<ConstantRegressor> = OccupancyModel::with_params(-3.0);
        low.train(Some(&history(2))).unwrap();
        let p = low.predict(10, 2, 22.0, 45.0).unwrap();
        assert_eq!(p.occupancy, 0.0);
        assert!((p.confidence - 0.85).abs() < 1e-12);
    }

    #[test]
    fn test_swapped_estimator_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("constant.bin");

        let mut model: OccupancyModel<ConstantRegressor> = OccupancyModel::with_params(0.3);
        model.train(Some(&history(2))).unwrap();
        model.save(&path).unwrap();

        let mut restored: OccupancyModel<ConstantRegressor> = OccupancyModel::default();
        assert!(restored.load(&path).unwrap());
        assert_eq!(restored.predict(0, 0, 0.0, 0.0).unwrap().occupancy, 0.3);
        assert_eq!(restored.feature_importance().get("hour"), Some(25.0));
    }
}
