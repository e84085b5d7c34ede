//! Care hints for the UI, chosen from fixed tiers.  Pure string selection:
//! identical inputs always give identical text.

use serde::{Deserialize, Serialize};

use crate::profile::PlantProfile;
use crate::stress::{MAX_TEMP_C, MIN_TEMP_C};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    pub water: String,
    pub light: String,
    pub temperature: String,
    pub overall: String,
}

/// Build all four hints from the post-step moisture and total stress and the
/// sample's environment.
pub fn build(
    moisture: f64,
    total_stress: f64,
    temperature_c: f64,
    light_lux: f64,
    profile: &PlantProfile,
) -> Advice {
    Advice {
        water: water_advice(moisture, profile).to_string(),
        light: light_advice(light_lux, profile).to_string(),
        temperature: temperature_advice(temperature_c).to_string(),
        overall: overall_advice(total_stress, profile).to_string(),
    }
}

pub fn water_advice(moisture: f64, profile: &PlantProfile) -> &'static str {
    if moisture <= profile.wilting_point {
        "Soil is extremely dry. Water immediately."
    } else if moisture < profile.critical_point {
        "Soil is slightly too dry. Watering soon is recommended."
    } else if moisture >= profile.field_capacity * 0.95 {
        "Soil is very wet. Avoid watering until it dries out a bit."
    } else {
        "Soil moisture is in a healthy range."
    }
}

pub fn light_advice(light_lux: f64, profile: &PlantProfile) -> &'static str {
    if light_lux < 0.5 * profile.light_min {
        "Light is far below the ideal level. Move the plant to a brighter spot."
    } else if light_lux < profile.light_min {
        "Light is a bit low. Slightly brighter location would help."
    } else if light_lux > 2.0 * profile.ideal_light() {
        "Light level is very high. Consider moving out of direct intense sun."
    } else {
        "Light level is good for this plant."
    }
}

pub fn temperature_advice(temperature_c: f64) -> &'static str {
    if temperature_c < MIN_TEMP_C {
        "It is too cold for this plant. Move it to a warmer location."
    } else if temperature_c > MAX_TEMP_C {
        "It is too hot for this plant. Provide some cooling or shade."
    } else {
        "Temperature is within a comfortable range."
    }
}

/// Stress as a fraction of the cap, in [0, 1].  A non-positive cap reads as
/// no stress.
pub fn stress_fraction(total_stress: f64, profile: &PlantProfile) -> f64 {
    if profile.stress_cap <= 0.0 {
        return 0.0;
    }
    (total_stress / profile.stress_cap).clamp(0.0, 1.0)
}

pub fn overall_advice(total_stress: f64, profile: &PlantProfile) -> &'static str {
    let s = stress_fraction(total_stress, profile);
    if s < 0.2 {
        "Plant is happy and healthy."
    } else if s < 0.5 {
        "Plant has mild stress. Keep an eye on moisture, light, and temperature."
    } else if s < 0.8 {
        "Plant is stressed and needs attention soon."
    } else {
        "Plant is in critical condition. Adjust care immediately."
    }
}

// ===========================================================================
// Tests
// ===========================================================================
