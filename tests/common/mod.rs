#![allow(dead_code)]

use chrono::NaiveDate;
use ecosense::config::{Config, ModelConfig};
use ecosense::controller::AppState;
use ecosense::ml::{ForestParams, OccupancyModel};
use ecosense::simulation;
use std::path::Path;

/// Monday
pub fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 17).unwrap()
}

pub fn small_forest() -> ForestParams {
    ForestParams {
        n_trees: 12,
        max_depth: Some(8),
        ..ForestParams::default()
    }
}

pub fn trained_model(days: u32) -> OccupancyModel {
    let data = simulation::generate_seeded(days, 42, reference_date());
    let mut model: OccupancyModel = OccupancyModel::with_params(small_forest());
    model.train(Some(&data)).unwrap();
    model
}

/// Config whose artifact lives under `dir` and whose retrains stay small
pub fn test_config(dir: &Path) -> Config {
    let forest = small_forest();
    Config {
        model: ModelConfig {
            path: dir.join("rf_model.bin"),
            training_days: 10,
            retrain_days: 7,
            n_trees: forest.n_trees,
            max_depth: forest.max_depth,
            ..ModelConfig::default()
        },
        ..Config::default()
    }
}

pub fn test_state(dir: &Path) -> AppState {
    AppState::with_model(test_config(dir), trained_model(14))
}
