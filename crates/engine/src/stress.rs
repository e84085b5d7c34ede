//! Stress channels.  Each is a leaky integrator
//!
//! ```text
//! S' = max(0, S + (gain · deficit − recovery · S) · dt)
//! ```
//!
//! driven by its own deficit signal.  Water stress additionally picks up a
//! waterlogging term once the soil has stayed saturated long enough.

use crate::profile::PlantProfile;

/// Below this temperature (°C) the plant accrues cold stress.
pub const MIN_TEMP_C: f64 = 10.0;

/// Above this temperature (°C) the plant accrues heat stress.
pub const MAX_TEMP_C: f64 = 30.0;

fn pos(x: f64) -> f64 {
    if x > 0.0 {
        x
    } else {
        0.0
    }
}

fn integrate(prev: f64, rate: f64, dt_hours: f64) -> f64 {
    (prev + rate * dt_hours).max(0.0)
}

// ---------------------------------------------------------------------------
// Waterlogging
// ---------------------------------------------------------------------------

/// Saturation bookkeeping for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waterlogging {
    /// Extra water-stress driving term (0 or `saturation_gain`).
    pub term: f64,
    /// Updated consecutive hours at or above field capacity.
    pub hours: f64,
}

/// Extend or reset the saturation run using the post-update moisture, and
/// apply `saturation_gain` once the run reaches `saturation_hours`.
pub fn waterlogging(
    next_moisture: f64,
    prev_hours: f64,
    dt_hours: f64,
    profile: &PlantProfile,
) -> Waterlogging {
    let hours = if next_moisture >= profile.field_capacity {
        prev_hours + dt_hours
    } else {
        0.0
    };
    let term = if hours >= profile.saturation_hours {
        profile.saturation_gain
    } else {
        0.0
    };
    Waterlogging { term, hours }
}

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

/// Water stress against the post-update moisture.
pub fn next_water_stress(
    prev: f64,
    moisture: f64,
    waterlog_term: f64,
    dt_hours: f64,
    profile: &PlantProfile,
) -> f64 {
    let deficit = pos(profile.critical_point - moisture);
    let drive = if deficit > 0.0 {
        profile.water_stress_gain * deficit.powf(profile.water_stress_exponent)
    } else {
        0.0
    };
    let rate = drive - profile.water_stress_recovery * prev + waterlog_term;
    integrate(prev, rate, dt_hours)
}

/// Distance outside the comfortable `[MIN_TEMP_C, MAX_TEMP_C]` band.
pub fn temperature_deviation(temperature_c: f64) -> f64 {
    pos(temperature_c - MAX_TEMP_C) + pos(MIN_TEMP_C - temperature_c)
}

pub fn next_temperature_stress(
    prev: f64,
    temperature_c: f64,
    dt_hours: f64,
    profile: &PlantProfile,
) -> f64 {
    let rate = profile.temperature_stress_gain * temperature_deviation(temperature_c)
        - profile.temperature_stress_recovery * prev;
    integrate(prev, rate, dt_hours)
}

pub fn next_light_stress(prev: f64, light_lux: f64, dt_hours: f64, profile: &PlantProfile) -> f64 {
    let rate = profile.light_stress_gain * pos(profile.light_min - light_lux)
        - profile.light_stress_recovery * prev;
    integrate(prev, rate, dt_hours)
}

/// Sum of the channels, capped at `stress_cap`.
pub fn total_stress(water: f64, temperature: f64, light: f64, profile: &PlantProfile) -> f64 {
    (water + temperature + light).clamp(0.0, profile.stress_cap)
}

// ===========================================================================
// Tests
// ===========================================================================
