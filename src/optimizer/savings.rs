use super::decision::Decision;
use super::schedule::ScheduleEntry;
use crate::utils::round_to;
use serde::{Deserialize, Serialize};

/// Grid emission factor, kg CO₂ per kWh
pub const CO2_KG_PER_KWH: f64 = 0.5;
/// Tariff, rupees per kWh
pub const COST_PER_KWH: f64 = 7.5;

/// Anything that reports an hourly energy figure
pub trait EnergyReading {
    fn total_energy(&self) -> f64;
}

impl EnergyReading for f64 {
    fn total_energy(&self) -> f64 {
        *self
    }
}

impl EnergyReading for Decision {
    fn total_energy(&self) -> f64 {
        self.total_energy
    }
}

impl EnergyReading for ScheduleEntry {
    fn total_energy(&self) -> f64 {
        self.decision.total_energy
    }
}

/// Baseline vs optimized energy comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsReport {
    pub baseline_energy: f64,
    pub optimized_energy: f64,
    pub energy_saved_kwh: f64,
    /// Rounded to one decimal
    pub savings_percent: f64,
    pub co2_saved_kg: f64,
    pub cost_saved_rupees: f64,
}

/// Compare the summed energy of two schedules. A non-positive baseline yields
/// a 0% saving rather than a division error.
pub fn compute_savings<B, O>(baseline: &[B], optimized: &[O]) -> SavingsReport
where
    B: EnergyReading,
    O: EnergyReading,
{
    let baseline_total: f64 = baseline.iter().map(EnergyReading::total_energy).sum();
    let optimized_total: f64 = optimized.iter().map(EnergyReading::total_energy).sum();
    let saved = baseline_total - optimized_total;

    let savings_percent = if baseline_total > 0.0 {
        saved / baseline_total * 100.0
    } else {
        0.0
    };

    SavingsReport {
        baseline_energy: round_to(baseline_total, 2),
        optimized_energy: round_to(optimized_total, 2),
        energy_saved_kwh: round_to(saved, 2),
        savings_percent: round_to(savings_percent, 1),
        co2_saved_kg: round_to(saved * CO2_KG_PER_KWH, 2),
        cost_saved_rupees: round_to(saved * COST_PER_KWH, 2),
    }
}
