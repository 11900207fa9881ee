//! Canned 24-hour occupancy profiles for the dashboard views.

use super::decision::Decision;
use super::savings::{compute_savings, SavingsReport};
use super::schedule::{build_daily_schedule, time_slot_label, DailySchedule, ScheduleEntry};
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

const SCENARIO_NOISE_STD: f64 = 0.05;

/// Occupancy curve for the energy-comparison view
pub const REFERENCE_DAY: [f64; 24] = [
    0.1, 0.15, 0.2, 0.3, 0.65, 0.7, 0.75, 0.7, 0.6, 0.5, 0.4, 0.3, 0.35, 0.6, 0.65, 0.4, 0.25,
    0.15, 0.12, 0.1, 0.08, 0.08, 0.09, 0.1,
];

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScenarioMode {
    /// Regular office day
    #[default]
    Normal,
    /// Light use with a late-morning to evening bump
    Weekend,
    /// Sustained high use through business hours
    Peak,
}

impl ScenarioMode {
    /// Noise-free occupancy for `hour`
    pub fn base_occupancy(self, hour: usize) -> f64 {
        match self {
            ScenarioMode::Normal => match hour {
                8..=11 => 0.7,
                12 => 0.4,
                13..=17 => 0.65,
                _ => 0.1,
            },
            ScenarioMode::Weekend => {
                if (10..=18).contains(&hour) {
                    0.35
                } else {
                    0.15
                }
            }
            ScenarioMode::Peak => {
                if (8..=18).contains(&hour) {
                    0.6
                } else {
                    0.15
                }
            }
        }
    }
}

/// 24 hourly occupancies for `mode`, with Gaussian jitter, clamped to [0, 1]
pub fn scenario_predictions<R: Rng>(mode: ScenarioMode, rng: &mut R) -> Vec<f64> {
    (0..24)
        .map(|hour| {
            let z: f64 = rng.sample(StandardNormal);
            (mode.base_occupancy(hour) + z * SCENARIO_NOISE_STD).clamp(0.0, 1.0)
        })
        .collect()
}

/// Schedule with every hour at full power, the reference for savings.
///
/// No prediction backs these entries; `predicted_occupancy` is a synthetic
/// 1.0 standing for "treat the room as full".
pub fn baseline_schedule() -> DailySchedule {
    (0..24)
        .map(|hour| ScheduleEntry {
            hour,
            time_slot: time_slot_label(hour),
            predicted_occupancy: 1.0,
            decision: Decision::always_on(),
        })
        .collect::<Vec<_>>()
        .into()
}

/// Always-on vs optimized energy for the reference day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyComparison {
    pub baseline_24h: Vec<f64>,
    pub optimized_24h: Vec<f64>,
    pub comparison: SavingsReport,
}

pub fn energy_comparison() -> EnergyComparison {
    let baseline = baseline_schedule();
    let optimized = build_daily_schedule(&REFERENCE_DAY);

    EnergyComparison {
        baseline_24h: baseline.energy_curve(),
        optimized_24h: optimized.energy_curve(),
        comparison: compute_savings(baseline.entries(), optimized.entries()),
    }
}
