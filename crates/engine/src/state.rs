use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::profile::PlantProfile;

/// Step length used when a sample does not carry one.
pub const DEFAULT_DT_HOURS: f64 = 1.0;

// ---------------------------------------------------------------------------
// Per-plant state
// ---------------------------------------------------------------------------

/// Quantities carried from one step to the next for a single pot.  Owned and
/// persisted by the caller; the engine only ever returns a fresh copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Normalized soil moisture, within `[0, field_capacity]`.
    pub moisture: f64,
    /// Remaining reservoir water, never negative.
    pub reservoir: f64,
    pub water_stress: f64,
    pub temperature_stress: f64,
    pub light_stress: f64,
    /// Sum of the three channels, within `[0, stress_cap]`.
    pub total_stress: f64,
    /// Consecutive hours spent at or above field capacity.
    pub waterlogged_hours: f64,
}

impl SimulationState {
    /// Fresh state for a newly potted plant: profile moisture and reservoir,
    /// no accumulated stress.
    pub fn initial(profile: &PlantProfile) -> Self {
        Self {
            moisture: profile.initial_moisture,
            reservoir: profile.initial_reservoir,
            water_stress: 0.0,
            temperature_stress: 0.0,
            light_stress: 0.0,
            total_stress: 0.0,
            waterlogged_hours: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor sample
// ---------------------------------------------------------------------------

/// One decoded environment sample.  Field aliases accept the camelCase names
/// used by the backend's reading rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorData {
    #[serde(alias = "temperatureC")]
    pub temperature_c: f64,
    #[serde(alias = "humidityPct")]
    pub humidity_pct: f64,
    #[serde(alias = "lightLux")]
    pub light_lux: f64,
    #[serde(default, alias = "dtHours", skip_serializing_if = "Option::is_none")]
    pub dt_hours: Option<f64>,
}

impl SensorData {
    pub fn new(temperature_c: f64, humidity_pct: f64, light_lux: f64) -> Self {
        Self {
            temperature_c,
            humidity_pct,
            light_lux,
            dt_hours: None,
        }
    }

    pub fn with_dt_hours(self, dt_hours: f64) -> Self {
        Self {
            dt_hours: Some(dt_hours),
            ..self
        }
    }

    /// Integration step in hours, defaulting to one hour.
    pub fn dt_hours(&self) -> f64 {
        self.dt_hours.unwrap_or(DEFAULT_DT_HOURS)
    }

    /// Boundary check for callers.  The step function does not sanitize its
    /// inputs and propagates NaN, so samples should pass this first.
    pub fn check(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        for (name, value) in [
            ("temperature_c", self.temperature_c),
            ("humidity_pct", self.humidity_pct),
            ("light_lux", self.light_lux),
        ] {
            if !value.is_finite() {
                errors.push(format!("{name} is not finite ({value})"));
            }
        }
        if self.light_lux < 0.0 {
            errors.push(format!("light_lux {} is negative", self.light_lux));
        }
        if self.humidity_pct.is_finite() && !(0.0..=100.0).contains(&self.humidity_pct) {
            errors.push(format!(
                "humidity_pct {} out of range [0, 100]",
                self.humidity_pct
            ));
        }
        if let Some(dt) = self.dt_hours {
            if !(dt > 0.0 && dt.is_finite()) {
                errors.push(format!("dt_hours must be positive, got {dt}"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            bail!("invalid sensor sample: {}", errors.join("; "));
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
