pub mod error;
pub mod health;
pub mod predict;
pub mod schedule;
pub mod status;
pub mod training;

use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{config::Config, controller::AppState};

pub fn router(state: AppState, cfg: &Config) -> Router {
    let api = Router::new()
        .route("/status", get(status::get_status))
        .route("/predict", post(predict::predict))
        .route("/schedule/24h", get(schedule::get_schedule))
        .route("/baseline/24h", get(schedule::get_baseline))
        .route("/energy/comparison", get(schedule::get_energy_comparison))
        .route("/features", get(status::get_features))
        .route("/retrain", post(training::retrain));

    let mut router = Router::new()
        .route("/healthz", get(health::healthz))
        .nest("/api", api)
        .with_state(state);

    if cfg.server.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
            .allow_headers([axum::http::header::CONTENT_TYPE]);
        router = router.layer(cors);
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(axum::extract::DefaultBodyLimit::max(64 * 1024))
                .layer(TimeoutLayer::new(Duration::from_secs(cfg.server.request_timeout_secs))),
        )
        .layer(TraceLayer::new_for_http())
}
