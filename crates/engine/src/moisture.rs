//! Soil water balance: availability curves, evapotranspiration, irrigation
//! input and the moisture/reservoir updates.
//!
//! ```text
//! ET = EMax · η(T, H) · [ α · avail(W)^n + (1 − α) · Ks(W) ]
//! W' = clamp(W + (I − ET) · dt, 0, θfc)
//! ```

use crate::profile::PlantProfile;

/// Optimal indoor temperature (°C) for the temperature scaling factor.
pub const OPTIMAL_TEMP_C: f64 = 22.0;

/// Reference relative humidity (%) for the humidity scaling factor.
pub const REFERENCE_HUMIDITY_PCT: f64 = 60.0;

/// Normalized pot volume: irrigation input is `pump_rate / POT_VOLUME`.
pub const POT_VOLUME: f64 = 1.0;

/// Fraction of the usable range (wilting point to field capacity) that `w`
/// represents.
pub fn water_availability(w: f64, profile: &PlantProfile) -> f64 {
    if w <= profile.wilting_point {
        return 0.0;
    }
    let span = profile.field_capacity - profile.wilting_point;
    if span <= 0.0 {
        return 0.0;
    }
    ((w - profile.wilting_point) / span).clamp(0.0, 1.0)
}

/// Water stress coefficient Ks: zero at the wilting point, one from the
/// critical point up.
pub fn stress_coefficient(w: f64, profile: &PlantProfile) -> f64 {
    if w <= profile.wilting_point {
        return 0.0;
    }
    if w >= profile.critical_point {
        return 1.0;
    }
    let span = profile.critical_point - profile.wilting_point;
    if span <= 0.0 {
        return 0.0;
    }
    ((w - profile.wilting_point) / span).clamp(0.0, 1.0)
}

/// Combined temperature and humidity multiplier.  Each factor floors at 0.
pub fn environmental_scaling(temperature_c: f64, humidity_pct: f64, profile: &PlantProfile) -> f64 {
    let temp_factor = (1.0 + profile.temperature_coeff * (temperature_c - OPTIMAL_TEMP_C)).max(0.0);
    let humidity_factor =
        (1.0 + profile.humidity_coeff * (REFERENCE_HUMIDITY_PCT - humidity_pct)).max(0.0);
    temp_factor * humidity_factor
}

/// Water lost per hour at moisture `w` under the given conditions.
pub fn evapotranspiration(
    w: f64,
    temperature_c: f64,
    humidity_pct: f64,
    profile: &PlantProfile,
) -> f64 {
    let soil = profile.evap_blend * water_availability(w, profile).powf(profile.retention_exponent);
    let plant = (1.0 - profile.evap_blend) * stress_coefficient(w, profile);
    let eta = environmental_scaling(temperature_c, humidity_pct, profile);

    (profile.evap_max * eta * (soil + plant).max(0.0)).max(0.0)
}

/// Moisture added per hour by the pump.  Nothing flows from an empty
/// reservoir.
pub fn irrigation_input(pump_on: bool, reservoir: f64, profile: &PlantProfile) -> f64 {
    if pump_on && reservoir > 0.0 {
        profile.pump_rate / POT_VOLUME
    } else {
        0.0
    }
}

pub fn next_moisture(w: f64, irrigation: f64, et: f64, dt_hours: f64, profile: &PlantProfile) -> f64 {
    (w + (irrigation - et) * dt_hours).clamp(0.0, profile.field_capacity)
}

pub fn next_reservoir(reservoir: f64, pump_on: bool, dt_hours: f64, profile: &PlantProfile) -> f64 {
    let drawn = if pump_on { profile.pump_rate * dt_hours } else { 0.0 };
    (reservoir - drawn).max(0.0)
}

// ===========================================================================
// Tests
// ===========================================================================
