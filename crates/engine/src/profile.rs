//! Per-species plant profiles: moisture thresholds, stress rate constants,
//! evapotranspiration parameters and pump/reservoir sizing.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Profile structure
// ---------------------------------------------------------------------------

/// Static parameter set for one plant species.  Loaded once from the catalog
/// and never mutated at runtime.
///
/// Moisture-scale fields (`wilting_point`, `critical_point`, `field_capacity`,
/// `sensor_threshold`, `initial_moisture`) use the normalized 0..1 soil
/// moisture index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantProfile {
    // ── Identity ────────────────────────────────────────
    pub common_name: String,
    #[serde(default)]
    pub scientific_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub water_preference: String,
    /// Ideal light level in lux.  Absent or zero means "use `light_min`".
    #[serde(default)]
    pub light_preference: Option<f64>,

    // ── Thresholds ──────────────────────────────────────
    pub wilting_point: f64,
    pub critical_point: f64,
    pub field_capacity: f64,
    /// Floor for the sensor-threshold controller.  Independent of the
    /// wilting/critical/field-capacity ladder.
    pub sensor_threshold: f64,
    /// Minimum acceptable light in lux.
    pub light_min: f64,

    // ── Stress channels ─────────────────────────────────
    pub water_stress_gain: f64,
    pub water_stress_recovery: f64,
    pub water_stress_exponent: f64,
    pub temperature_stress_gain: f64,
    pub temperature_stress_recovery: f64,
    pub light_stress_gain: f64,
    pub light_stress_recovery: f64,

    // ── Evapotranspiration ──────────────────────────────
    /// Maximum evapotranspiration rate, moisture index per hour.
    pub evap_max: f64,
    /// Soil/plant demand blend weight in [0, 1].
    pub evap_blend: f64,
    pub retention_exponent: f64,
    pub temperature_coeff: f64,
    pub humidity_coeff: f64,

    pub stress_cap: f64,

    // ── Waterlogging ────────────────────────────────────
    pub saturation_gain: f64,
    pub saturation_hours: f64,

    // ── Pump / reservoir ────────────────────────────────
    /// Water delivered per hour of pumping.
    pub pump_rate: f64,
    pub initial_moisture: f64,
    pub initial_reservoir: f64,
}

impl PlantProfile {
    /// Light level the advisory builder treats as ideal.
    pub fn ideal_light(&self) -> f64 {
        self.light_preference
            .filter(|&lux| lux > 0.0)
            .unwrap_or(self.light_min)
    }

    /// Validate the profile.  Returns `Ok(())` or an error describing every
    /// violation found (not just the first one).
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();
        self.collect_errors(&mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            bail!(
                "profile validation failed ({} error{}):\n  - {}",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" },
                errors.join("\n  - ")
            );
        }
    }

    pub(crate) fn collect_errors(&self, errors: &mut Vec<String>) {
        let ctx = if self.common_name.trim().is_empty() {
            "profile".to_string()
        } else {
            format!("profile '{}'", self.common_name)
        };

        if self.common_name.trim().is_empty() {
            errors.push(format!("{ctx}: common_name is empty"));
        }

        // ── Moisture scale ──────────────────────────────────
        let moisture_fields = [
            ("wilting_point", self.wilting_point),
            ("critical_point", self.critical_point),
            ("field_capacity", self.field_capacity),
            ("sensor_threshold", self.sensor_threshold),
            ("initial_moisture", self.initial_moisture),
        ];
        for (name, value) in moisture_fields {
            if !(0.0..=1.0).contains(&value) {
                errors.push(format!("{ctx}: {name} {value} out of range [0.0, 1.0]"));
            }
        }

        if self.wilting_point >= self.critical_point {
            errors.push(format!(
                "{ctx}: wilting_point ({}) must be less than critical_point ({})",
                self.wilting_point, self.critical_point
            ));
        }
        if self.critical_point > self.field_capacity {
            errors.push(format!(
                "{ctx}: critical_point ({}) must not exceed field_capacity ({})",
                self.critical_point, self.field_capacity
            ));
        }
        if self.initial_moisture > self.field_capacity {
            errors.push(format!(
                "{ctx}: initial_moisture ({}) exceeds field_capacity ({})",
                self.initial_moisture, self.field_capacity
            ));
        }

        // ── Non-negative constants ──────────────────────────
        let non_negative = [
            ("light_min", self.light_min),
            ("water_stress_gain", self.water_stress_gain),
            ("water_stress_recovery", self.water_stress_recovery),
            ("temperature_stress_gain", self.temperature_stress_gain),
            ("temperature_stress_recovery", self.temperature_stress_recovery),
            ("light_stress_gain", self.light_stress_gain),
            ("light_stress_recovery", self.light_stress_recovery),
            ("evap_max", self.evap_max),
            ("temperature_coeff", self.temperature_coeff),
            ("humidity_coeff", self.humidity_coeff),
            ("saturation_gain", self.saturation_gain),
            ("saturation_hours", self.saturation_hours),
            ("pump_rate", self.pump_rate),
            ("initial_reservoir", self.initial_reservoir),
        ];
        for (name, value) in non_negative {
            // Negated so NaN is rejected too.
            if !(value >= 0.0 && value.is_finite()) {
                errors.push(format!("{ctx}: {name} must be non-negative, got {value}"));
            }
        }
        if let Some(lux) = self.light_preference {
            if !(lux >= 0.0 && lux.is_finite()) {
                errors.push(format!(
                    "{ctx}: light_preference must be non-negative, got {lux}"
                ));
            }
        }

        if !(0.0..=1.0).contains(&self.evap_blend) {
            errors.push(format!(
                "{ctx}: evap_blend {} out of range [0.0, 1.0]",
                self.evap_blend
            ));
        }

        for (name, value) in [
            ("water_stress_exponent", self.water_stress_exponent),
            ("retention_exponent", self.retention_exponent),
            ("stress_cap", self.stress_cap),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                errors.push(format!("{ctx}: {name} must be positive, got {value}"));
            }
        }
    }
}

// ===========================================================================
// Test fixtures
// ===========================================================================


// ===========================================================================
// Tests
// ===========================================================================
