use anyhow::Result;
use ecosense::{api, config, controller, telemetry};
use config::Config;
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;
    init_tracing(&cfg.logging);

    let app_state = controller::AppState::new(cfg.clone()).await?;
    {
        let model = app_state.model.read();
        info!(
            status = %model.status(),
            training_samples = model.training_samples(),
            "occupancy model ready"
        );
    }

    let app = api::router(app_state, &cfg);
    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!("server binding to 0.0.0.0, the API will be reachable from the network");
    }

    info!(%addr, "starting EcoSense");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
