//! # Occupancy History Simulation
//!
//! Produces labeled hourly samples for training the occupancy model. Office
//! occupancy follows a fixed weekday/weekend step profile; temperature and
//! humidity follow a diurnal sine wave pushed up by occupancy. Gaussian noise
//! is added to every signal.

use crate::utils::round_to;
use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const OCCUPANCY_NOISE_STD: f64 = 0.08;
const TEMPERATURE_NOISE_STD: f64 = 0.5;
const HUMIDITY_NOISE_STD: f64 = 2.0;

/// One labeled hour of building history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    /// Hour of day (0-23)
    pub hour: u32,
    /// Day of week (0=Monday, 6=Sunday)
    pub day_of_week: u32,
    /// Indoor temperature (Celsius)
    pub temperature: f64,
    /// Relative humidity (20-80%)
    pub humidity: f64,
    /// Occupancy fraction (0-1)
    pub occupancy: f64,
}

impl TrainingSample {
    /// Feature row in `ml::FEATURE_NAMES` order
    pub fn features(&self) -> [f64; 4] {
        [
            self.hour as f64,
            self.day_of_week as f64,
            self.temperature,
            self.humidity,
        ]
    }
}

/// Noise-free occupancy for an hour of a weekday or weekend day
pub fn base_occupancy(hour: u32, is_weekend: bool) -> f64 {
    if is_weekend {
        return 0.15;
    }

    match hour {
        8..=11 => 0.7,
        12 => 0.4,
        13..=18 => 0.65,
        _ => 0.1,
    }
}

/// Generator for synthetic occupancy history
pub struct OccupancyGenerator {
    rng: StdRng,
}

impl OccupancyGenerator {
    /// Create a generator; `None` seeds from entropy
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Generate `days * 24` samples ending the day before `today`, oldest
    /// day first and hours ascending within a day.
    pub fn generate(&mut self, days: u32, today: NaiveDate) -> Vec<TrainingSample> {
        let mut samples = Vec::with_capacity(days as usize * 24);

        for day in 0..days {
            let date = today - Duration::days(i64::from(days - day));
            let weekday = date.weekday();
            let is_weekend = matches!(weekday, Weekday::Sat | Weekday::Sun);

            for hour in 0..24 {
                samples.push(self.sample(hour, weekday.num_days_from_monday(), is_weekend));
            }
        }

        samples
    }

    fn sample(&mut self, hour: u32, day_of_week: u32, is_weekend: bool) -> TrainingSample {
        let occupancy =
            (base_occupancy(hour, is_weekend) + self.noise(OCCUPANCY_NOISE_STD)).clamp(0.0, 1.0);

        let diurnal = (hour as f64 * PI / 12.0).sin();
        let temperature =
            20.0 + 4.0 * diurnal + occupancy * 2.0 + self.noise(TEMPERATURE_NOISE_STD);
        let humidity = (40.0 + 20.0 * diurnal + occupancy * 10.0 + self.noise(HUMIDITY_NOISE_STD))
            .clamp(20.0, 80.0);

        TrainingSample {
            hour,
            day_of_week,
            temperature: round_to(temperature, 2),
            humidity: round_to(humidity, 2),
            occupancy: round_to(occupancy, 3),
        }
    }

    fn noise(&mut self, std_dev: f64) -> f64 {
        let z: f64 = self.rng.sample(StandardNormal);
        z * std_dev
    }
}

/// Generate `days` of history ending yesterday, with fresh randomness
pub fn generate(days: u32) -> Vec<TrainingSample> {
    OccupancyGenerator::new(None).generate(days, Local::now().date_naive())
}

/// Reproducible variant of [`generate`] for a fixed seed and reference date
pub fn generate_seeded(days: u32, seed: u64, today: NaiveDate) -> Vec<TrainingSample> {
    OccupancyGenerator::new(Some(seed)).generate(days, today)
}
