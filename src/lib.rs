pub mod api;
pub mod config;
pub mod controller;
pub mod ml;
pub mod optimizer;
pub mod simulation;
pub mod telemetry;
pub mod utils;
