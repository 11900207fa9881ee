//! # Building History Simulation
//!
//! Synthetic stand-in for sensor history. The occupancy model trains on
//! these samples whenever no external dataset is supplied.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use ecosense::simulation::generate_seeded;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 6, 17).unwrap();
//! let samples = generate_seeded(7, 42, today);
//! assert_eq!(samples.len(), 7 * 24);
//! ```

pub mod occupancy;

pub use occupancy::{base_occupancy, generate, generate_seeded, OccupancyGenerator, TrainingSample};
