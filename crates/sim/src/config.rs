//! Harness configuration from environment variables, validated up front.

use anyhow::{bail, Result};
use std::str::FromStr;
use time::macros::{date, format_description};
use time::Date;

use crate::environment::Scenario;

#[derive(Debug, Clone)]
pub struct SimConfig {
    /// TOML catalog to load instead of the built-in one.
    pub catalog_path: Option<String>,
    /// Common names, one simulated pot each.
    pub plants: Vec<String>,
    pub scenario: Scenario,
    pub steps: u32,
    pub dt_hours: f64,
    pub seed: u64,
    /// Wall-clock pause between steps; 0 runs flat out.
    pub sample_every_ms: u64,
    /// JSON-lines file of recorded samples to replay instead of simulating.
    pub trace_path: Option<String>,
    /// Simulated calendar day the run starts on, so output timestamps do
    /// not depend on the wall clock.
    pub start_date: Date,
    /// Simulated hour of day the run starts at.
    pub start_hour: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            plants: vec!["Pothos".to_string()],
            scenario: Scenario::Indoor,
            steps: 48,
            dt_hours: 1.0,
            seed: 42,
            sample_every_ms: 0,
            trace_path: None,
            start_date: date!(2026 - 01 - 01),
            start_hour: 8.0,
        }
    }
}

impl SimConfig {
    /// Build from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.  Every unparseable or invalid value
    /// is reported together.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut errors: Vec<String> = Vec::new();
        let defaults = Self::default();

        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let plants = match non_empty("PLANTS") {
            Some(v) => v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.plants,
        };

        let cfg = Self {
            catalog_path: non_empty("CATALOG_PATH"),
            plants,
            scenario: non_empty("SIM_SCENARIO")
                .map(|v| Scenario::from_str_lossy(&v))
                .unwrap_or(defaults.scenario),
            steps: parse_or(&lookup, "STEPS", defaults.steps, &mut errors),
            dt_hours: parse_or(&lookup, "DT_HOURS", defaults.dt_hours, &mut errors),
            seed: parse_or(&lookup, "SIM_SEED", defaults.seed, &mut errors),
            sample_every_ms: parse_or(
                &lookup,
                "SAMPLE_EVERY_MS",
                defaults.sample_every_ms,
                &mut errors,
            ),
            trace_path: non_empty("TRACE_PATH"),
            start_date: match non_empty("START_DATE") {
                Some(raw) => parse_date(&raw).unwrap_or_else(|e| {
                    errors.push(format!("START_DATE: cannot parse '{raw}': {e}"));
                    defaults.start_date
                }),
                None => defaults.start_date,
            },
            start_hour: parse_or(&lookup, "START_HOUR", defaults.start_hour, &mut errors),
        };

        cfg.validate_into(&mut errors);

        if errors.is_empty() {
            Ok(cfg)
        } else {
            bail!(
                "config validation failed ({} error{}):\n  - {}",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" },
                errors.join("\n  - ")
            );
        }
    }

    fn validate_into(&self, errors: &mut Vec<String>) {
        if self.plants.is_empty() {
            errors.push("PLANTS: no plant names given".to_string());
        }
        if self.steps == 0 {
            errors.push("STEPS must be positive".to_string());
        }
        if !(self.dt_hours > 0.0 && self.dt_hours.is_finite()) {
            errors.push(format!("DT_HOURS must be positive, got {}", self.dt_hours));
        }
        if !(0.0..24.0).contains(&self.start_hour) {
            errors.push(format!(
                "START_HOUR {} out of range [0, 24)",
                self.start_hour
            ));
        }
    }
}

/// `YYYY-MM-DD`.
fn parse_date(raw: &str) -> Result<Date, time::error::Parse> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
}

/// Parse `key` if set, otherwise use `default`.  A value that fails to parse
/// is recorded in `errors` and the default is kept.
fn parse_or<T, F>(lookup: &F, key: &str, default: T, errors: &mut Vec<String>) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => match raw.trim().parse() {
            Ok(v) => v,
            Err(e) => {
                errors.push(format!("{key}: cannot parse '{raw}': {e}"));
                default
            }
        },
        _ => default,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
