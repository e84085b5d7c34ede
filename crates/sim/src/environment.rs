//! Synthetic indoor environment for driving the engine without a pot.
//!
//! Models:
//! - Diurnal temperature cycle peaking mid-afternoon
//! - Relative humidity moving opposite to temperature
//! - Daylight curve between sunrise and sunset, dark at night
//! - Per-sample Gaussian noise on every channel
//!
//! A seeded RNG keeps runs reproducible.

use std::f64::consts::PI;
use std::fmt;

use bloompot_engine::SensorData;

const SUNRISE_HOUR: f64 = 6.0;
const SUNSET_HOUR: f64 = 20.0;

/// Hour at which the temperature sine crosses its mean on the way up; the
/// peak lands six hours later.
const WARMING_HOUR: f64 = 9.0;

// ---------------------------------------------------------------------------
// Gaussian approximation (no extra dependency)
// ---------------------------------------------------------------------------

/// Approximate a sample from N(0,1) using the Irwin-Hall method:
/// sum of 12 uniform [0,1) values minus 6.
fn approx_std_normal(rng: &mut fastrand::Rng) -> f64 {
    let mut sum: f64 = 0.0;
    for _ in 0..12 {
        sum += rng.f64();
    }
    sum - 6.0
}

fn gaussian(rng: &mut fastrand::Rng, mean: f64, sigma: f64) -> f64 {
    mean + sigma * approx_std_normal(rng)
}

// ---------------------------------------------------------------------------
// Scenario presets
// ---------------------------------------------------------------------------

/// Pre-configured climates selectable via the `SIM_SCENARIO` env var.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Living room: mild temperatures, moderate humidity, bright window
    /// light by day.
    Indoor,
    /// Hot, dry air and strong sun.  Pushes temperature stress and fast
    /// drying.
    Heatwave,
    /// North-facing room.  Light stays under most profiles' minimum.
    Dim,
    /// Unheated conservatory in winter.  Cold nights, weak light.
    Cold,
}

impl Scenario {
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "heatwave" => Self::Heatwave,
            "dim" => Self::Dim,
            "cold" => Self::Cold,
            _ => Self::Indoor, // default
        }
    }

    fn climate(self) -> Climate {
        match self {
            Self::Indoor => Climate {
                temp_mean: 22.0,
                temp_amplitude: 3.0,
                temp_sigma: 0.4,
                humidity_mean: 55.0,
                humidity_amplitude: 8.0,
                humidity_sigma: 2.0,
                light_peak: 1500.0,
            },
            Self::Heatwave => Climate {
                temp_mean: 31.0,
                temp_amplitude: 5.0,
                temp_sigma: 0.6,
                humidity_mean: 30.0,
                humidity_amplitude: 8.0,
                humidity_sigma: 2.0,
                light_peak: 6000.0,
            },
            Self::Dim => Climate {
                temp_mean: 20.0,
                temp_amplitude: 2.0,
                temp_sigma: 0.3,
                humidity_mean: 60.0,
                humidity_amplitude: 5.0,
                humidity_sigma: 2.0,
                light_peak: 300.0,
            },
            Self::Cold => Climate {
                temp_mean: 9.0,
                temp_amplitude: 3.0,
                temp_sigma: 0.5,
                humidity_mean: 65.0,
                humidity_amplitude: 6.0,
                humidity_sigma: 2.0,
                light_peak: 800.0,
            },
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indoor => write!(f, "indoor"),
            Self::Heatwave => write!(f, "heatwave"),
            Self::Dim => write!(f, "dim"),
            Self::Cold => write!(f, "cold"),
        }
    }
}

struct Climate {
    temp_mean: f64,
    temp_amplitude: f64,
    temp_sigma: f64,
    humidity_mean: f64,
    humidity_amplitude: f64,
    humidity_sigma: f64,
    light_peak: f64,
}

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------

/// Stateful environment simulator producing one [`SensorData`] per call.
pub struct EnvironmentSim {
    climate: Climate,
    rng: fastrand::Rng,
    /// Simulated hour of day, advanced by each sample's `dt`.
    hour: f64,
}

impl EnvironmentSim {
    /// Create a simulator starting at `start_hour` (0..24) of a simulated day.
    pub fn new(scenario: Scenario, seed: u64, start_hour: f64) -> Self {
        Self {
            climate: scenario.climate(),
            rng: fastrand::Rng::with_seed(seed),
            hour: start_hour.rem_euclid(24.0),
        }
    }

    /// Current simulated hour of day.
    #[cfg(test)]
    pub fn hour(&self) -> f64 {
        self.hour
    }

    /// Produce the sample for the current hour and advance the clock by
    /// `dt_hours`.
    pub fn sample(&mut self, dt_hours: f64) -> SensorData {
        let c = &self.climate;

        // Diurnal phase: +1 mid-afternoon, -1 before dawn.
        let phase = (2.0 * PI * (self.hour - WARMING_HOUR) / 24.0).sin();

        let temperature = gaussian(
            &mut self.rng,
            c.temp_mean + c.temp_amplitude * phase,
            c.temp_sigma,
        );
        let humidity = gaussian(
            &mut self.rng,
            c.humidity_mean - c.humidity_amplitude * phase,
            c.humidity_sigma,
        )
        .clamp(0.0, 100.0);

        let daylight = daylight_fraction(self.hour);
        let light = if daylight > 0.0 {
            gaussian(&mut self.rng, c.light_peak * daylight, c.light_peak * 0.05).max(0.0)
        } else {
            0.0
        };

        self.hour = (self.hour + dt_hours).rem_euclid(24.0);

        SensorData::new(temperature, humidity, light).with_dt_hours(dt_hours)
    }
}

/// Fraction of peak daylight at `hour`: a half-sine between sunrise and
/// sunset, zero otherwise.
fn daylight_fraction(hour: f64) -> f64 {
    if !(SUNRISE_HOUR..=SUNSET_HOUR).contains(&hour) {
        return 0.0;
    }
    (PI * (hour - SUNRISE_HOUR) / (SUNSET_HOUR - SUNRISE_HOUR)).sin().max(0.0)
}

// ===========================================================================
// Tests
// ===========================================================================
