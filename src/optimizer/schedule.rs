use super::decision::{decide, Decision};
use crate::utils::round_to;
use serde::{Deserialize, Serialize};

/// One hour of a daily schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub hour: usize,
    /// e.g. `"08:00 - 09:00"`; hour 23 wraps to `"23:00 - 00:00"`
    pub time_slot: String,
    /// Source occupancy, rounded to 2 decimals
    pub predicted_occupancy: f64,
    #[serde(flatten)]
    pub decision: Decision,
}

/// Per-hour decisions for one day, indexed by hour
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailySchedule {
    entries: Vec<ScheduleEntry>,
}

impl DailySchedule {
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScheduleEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `total_energy` of every hour, in hour order
    pub fn energy_curve(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.decision.total_energy).collect()
    }

    pub fn total_energy(&self) -> f64 {
        self.entries.iter().map(|e| e.decision.total_energy).sum()
    }
}

impl From<Vec<ScheduleEntry>> for DailySchedule {
    fn from(entries: Vec<ScheduleEntry>) -> Self {
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a DailySchedule {
    type Item = &'a ScheduleEntry;
    type IntoIter = std::slice::Iter<'a, ScheduleEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

pub fn time_slot_label(hour: usize) -> String {
    format!("{:02}:00 - {:02}:00", hour, (hour + 1) % 24)
}

/// Apply [`decide`] to each prediction, using its position as the hour.
///
/// Callers pass 24 values, one per hour of the day. Other lengths are not
/// rejected: the output always has one entry per input value.
pub fn build_daily_schedule(predictions: &[f64]) -> DailySchedule {
    predictions
        .iter()
        .enumerate()
        .map(|(hour, &occupancy)| ScheduleEntry {
            hour,
            time_slot: time_slot_label(hour),
            predicted_occupancy: round_to(occupancy, 2),
            decision: decide(occupancy),
        })
        .collect::<Vec<_>>()
        .into()
}
