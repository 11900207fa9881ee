//! Offline training: fit on synthetic history and write the model artifact.

use anyhow::Result;
use ecosense::{config::Config, ml::OccupancyModel, simulation, telemetry::init_tracing};
use tracing::info;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;
    init_tracing(&cfg.logging);

    let data = simulation::generate(cfg.model.training_days);
    info!(days = cfg.model.training_days, samples = data.len(), "generated training data");

    let mut model: OccupancyModel = OccupancyModel::with_params(cfg.model.forest_params());
    let metrics = model.train(Some(&data))?;
    info!(
        mse = metrics.mse,
        mae = metrics.mae,
        r2 = metrics.r2,
        accuracy = metrics.accuracy,
        "training complete"
    );

    for (feature, importance) in model.feature_importance().iter() {
        info!(feature, importance, "feature importance");
    }

    model.save(&cfg.model.path)?;
    info!(path = %cfg.model.path.display(), "model saved");
    Ok(())
}
