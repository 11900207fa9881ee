use crate::utils::round_to;
use serde::{Deserialize, Serialize};

/// Constant load from always-on equipment (servers, network), kW
pub const SERVER_BASE_KW: f64 = 2.0;

/// Below this occupancy everything is switched off
pub const VACANT_BELOW: f64 = 0.15;
/// Below this occupancy (and at or above [`VACANT_BELOW`]) the room runs in economy mode
pub const PARTIAL_BELOW: f64 = 0.40;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum HvacMode {
    Off,
    Eco,
    Full,
}

impl HvacMode {
    /// Electrical draw in kW
    pub fn power_kw(self) -> f64 {
        match self {
            HvacMode::Off => 0.1,
            HvacMode::Eco => 1.2,
            HvacMode::Full => 3.5,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum LightsMode {
    Off,
    Dim,
    Full,
}

impl LightsMode {
    /// Electrical draw in kW
    pub fn power_kw(self) -> f64 {
        match self {
            LightsMode::Off => 0.05,
            LightsMode::Dim => 0.4,
            LightsMode::Full => 1.5,
        }
    }
}

/// Operating decision for one hour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub hvac_mode: HvacMode,
    pub hvac_power: f64,
    pub lights_mode: LightsMode,
    pub lights_power: f64,
    /// HVAC + lights + server base load, kW
    pub total_energy: f64,
    /// Estimated saving against running everything at full power
    pub savings_percent: u8,
}

impl Decision {
    fn new(hvac_mode: HvacMode, lights_mode: LightsMode, savings_percent: u8) -> Self {
        let hvac_power = hvac_mode.power_kw();
        let lights_power = lights_mode.power_kw();
        Self {
            hvac_mode,
            hvac_power: round_to(hvac_power, 2),
            lights_mode,
            lights_power: round_to(lights_power, 2),
            total_energy: round_to(hvac_power + lights_power + SERVER_BASE_KW, 2),
            savings_percent,
        }
    }

    /// Everything at full power, as if no optimization were running
    pub fn always_on() -> Self {
        Self::new(HvacMode::Full, LightsMode::Full, 0)
    }
}

/// Map an occupancy fraction to HVAC/lighting modes.
///
/// Bands are half-open: `[0, 0.15)` off, `[0.15, 0.40)` economy, `[0.40, 1]`
/// full. `occupancy` is expected in [0, 1] and is not validated; values below
/// 0 fall into the off band and values above 1 into the full band.
pub fn decide(occupancy: f64) -> Decision {
    if occupancy < VACANT_BELOW {
        Decision::new(HvacMode::Off, LightsMode::Off, 30)
    } else if occupancy < PARTIAL_BELOW {
        Decision::new(HvacMode::Eco, LightsMode::Dim, 15)
    } else {
        Decision::new(HvacMode::Full, LightsMode::Full, 0)
    }
}
