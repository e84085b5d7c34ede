//! The engine's single transition:
//!
//! ```text
//! step: (SimulationState, SensorData, PlantProfile) → StepOutput
//! ```
//!
//! Order within a step:
//!
//! 1. watering decision on the *previous* moisture and reservoir
//! 2. evapotranspiration at the previous moisture
//! 3. irrigation input, moisture and reservoir updates
//! 4. waterlogging run on the *new* moisture
//! 5. stress channels and total
//! 6. advice from the new state and the sample's environment

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::advice::{self, Advice};
use crate::decision;
use crate::moisture;
use crate::profile::PlantProfile;
use crate::state::{SensorData, SimulationState};
use crate::stress;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutput {
    pub pump_on: bool,
    pub reason: String,
    pub status: Status,
    pub advice: Advice,
    pub next_state: SimulationState,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub moisture: f64,
    pub reservoir: f64,
    pub stress: StressBreakdown,
    pub env: Environment,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressBreakdown {
    pub total: f64,
    pub water: f64,
    pub temperature: f64,
    pub light: f64,
}

/// The sample's environment, echoed back for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub light_lux: f64,
}

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// Advance one plant by one sensor sample.  Pure: the previous state is not
/// touched and the result depends only on the three arguments.
pub fn step(prev: &SimulationState, sensor: &SensorData, profile: &PlantProfile) -> StepOutput {
    let dt = sensor.dt_hours();
    let t = sensor.temperature_c;
    let h = sensor.humidity_pct;
    let lux = sensor.light_lux;

    let watering = decision::decide(prev.moisture, prev.reservoir, profile);
    let pump_on = watering.pump_on;

    let et = moisture::evapotranspiration(prev.moisture, t, h, profile);
    let irrigation = moisture::irrigation_input(pump_on, prev.reservoir, profile);
    let w_next = moisture::next_moisture(prev.moisture, irrigation, et, dt, profile);
    let r_next = moisture::next_reservoir(prev.reservoir, pump_on, dt, profile);

    let waterlog = stress::waterlogging(w_next, prev.waterlogged_hours, dt, profile);
    let water = stress::next_water_stress(prev.water_stress, w_next, waterlog.term, dt, profile);
    let temperature = stress::next_temperature_stress(prev.temperature_stress, t, dt, profile);
    let light = stress::next_light_stress(prev.light_stress, lux, dt, profile);
    let total = stress::total_stress(water, temperature, light, profile);

    let next_state = SimulationState {
        moisture: w_next,
        reservoir: r_next,
        water_stress: water,
        temperature_stress: temperature,
        light_stress: light,
        total_stress: total,
        waterlogged_hours: waterlog.hours,
    };

    debug!(
        plant = %profile.common_name,
        pump_on,
        et = format!("{et:.4}"),
        moisture = format!("{w_next:.3}"),
        reservoir = format!("{r_next:.3}"),
        stress = format!("{total:.3}"),
        "step"
    );

    StepOutput {
        pump_on,
        reason: watering.reason,
        status: Status {
            moisture: w_next,
            reservoir: r_next,
            stress: StressBreakdown {
                total,
                water,
                temperature,
                light,
            },
            env: Environment {
                temperature_c: t,
                humidity_pct: h,
                light_lux: lux,
            },
        },
        advice: advice::build(w_next, total, t, lux, profile),
        next_state,
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::fixtures::test_profile;

    /// Reference conditions: optimal temperature, reference humidity, light
    /// comfortably above `light_min` and below twice the preference.
    fn ideal_sensor() -> SensorData {
        SensorData::new(22.0, 60.0, 1000.0)
    }

    fn state_with(moisture: f64, reservoir: f64) -> SimulationState {
        SimulationState {
            moisture,
            reservoir,
            ..SimulationState::initial(&test_profile())
        }
    }

    fn assert_bounded(s: &SimulationState, p: &PlantProfile) {
        assert!(
            (0.0..=p.field_capacity).contains(&s.moisture),
            "moisture out of range: {s:?}"
        );
        assert!(s.reservoir >= 0.0, "reservoir negative: {s:?}");
        assert!(s.water_stress >= 0.0, "water stress negative: {s:?}");
        assert!(s.temperature_stress >= 0.0, "temp stress negative: {s:?}");
        assert!(s.light_stress >= 0.0, "light stress negative: {s:?}");
        assert!(
            (0.0..=p.stress_cap).contains(&s.total_stress),
            "total stress out of range: {s:?}"
        );
        assert!(s.waterlogged_hours >= 0.0);
    }

    // -- Scenarios ----------------------------------------------------------

    #[test]
    fn wilted_plant_gets_emergency_water() {
        let p = test_profile();
        let prev = state_with(p.wilting_point - 0.05, 5.0);
        let out = step(&prev, &ideal_sensor(), &p);

        assert!(out.pump_on);
        assert!(out.reason.contains("emergency"), "reason: {}", out.reason);
        assert!(
            out.next_state.moisture > prev.moisture,
            "moisture should rise: {} -> {}",
            prev.moisture,
            out.next_state.moisture
        );
        assert!((out.next_state.reservoir - 4.9).abs() < 1e-12);
    }

    #[test]
    fn empty_reservoir_keeps_pump_off() {
        let p = test_profile();
        let prev = state_with(0.1, 0.0);
        let out = step(&prev, &ideal_sensor(), &p);

        assert!(!out.pump_on);
        assert_eq!(out.reason, "Reservoir is empty – pump off.");
        assert_eq!(out.next_state.reservoir, 0.0);
    }

    #[test]
    fn healthy_plant_stays_healthy() {
        let p = test_profile();
        let midpoint = (p.critical_point + p.field_capacity) / 2.0;
        let mut state = state_with(midpoint, 5.0);

        for i in 0..5 {
            let out = step(&state, &ideal_sensor(), &p);
            assert!(!out.pump_on, "pump on at step {i}: {}", out.reason);
            assert_eq!(out.advice.overall, "Plant is happy and healthy.");
            state = out.next_state;
        }
        assert_eq!(state.total_stress, 0.0);
        assert_eq!(state.reservoir, 5.0);
        assert!(state.moisture < midpoint, "plant should be drinking");
    }

    // -- Invariants ---------------------------------------------------------

    #[test]
    fn state_stays_bounded_across_conditions() {
        let p = test_profile();
        let temps = [-10.0, 5.0, 22.0, 35.0, 50.0];
        let humidities = [0.0, 30.0, 60.0, 100.0];
        let lights = [0.0, 200.0, 800.0, 20_000.0];
        let dts = [0.25, 1.0, 6.0];

        for &t in &temps {
            for &h in &humidities {
                for &lux in &lights {
                    for &dt in &dts {
                        let sensor = SensorData::new(t, h, lux).with_dt_hours(dt);
                        let mut state = state_with(0.05, 1.0);
                        for _ in 0..40 {
                            let out = step(&state, &sensor, &p);
                            assert_bounded(&out.next_state, &p);
                            state = out.next_state;
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn empty_reservoir_never_pumps() {
        let p = test_profile();
        for w in [0.0, 0.05, 0.2, 0.29, 0.31, 0.5, 0.8] {
            let out = step(&state_with(w, 0.0), &ideal_sensor(), &p);
            assert!(!out.pump_on, "pump on at w={w} with empty reservoir");
            assert_eq!(out.next_state.reservoir, 0.0);
        }
    }

    #[test]
    fn saturated_soil_pumps_only_through_sensor_threshold() {
        let p = PlantProfile {
            sensor_threshold: 0.9,
            ..test_profile()
        };
        let out = step(&state_with(p.field_capacity, 5.0), &ideal_sensor(), &p);
        assert!(out.pump_on);
        assert!(out.reason.contains("field capacity"));
        // The reservoir pays for it even though moisture is capped.
        assert!(out.next_state.reservoir < 5.0);
        assert!(out.next_state.moisture <= p.field_capacity);

        let normal = test_profile();
        let out = step(&state_with(normal.field_capacity, 5.0), &ideal_sensor(), &normal);
        assert!(!out.pump_on);
    }

    #[test]
    fn stress_decays_monotonically_under_favourable_conditions() {
        let p = test_profile();
        let mut state = SimulationState {
            water_stress: 3.0,
            temperature_stress: 2.0,
            light_stress: 1.0,
            total_stress: 6.0,
            ..state_with(0.6, 5.0)
        };
        let sensor = ideal_sensor();

        for i in 0..10 {
            let out = step(&state, &sensor, &p);
            let next = out.next_state;
            assert!(next.water_stress < state.water_stress, "water stress step {i}");
            assert!(next.temperature_stress < state.temperature_stress, "temp stress step {i}");
            assert!(next.light_stress < state.light_stress, "light stress step {i}");
            assert!(next.total_stress < state.total_stress, "total stress step {i}");
            assert!(next.water_stress > 0.0);
            state = next;
        }
    }

    #[test]
    fn waterlogging_kicks_in_after_saturation_hours() {
        // No evapotranspiration, so moisture holds at field capacity.
        let p = PlantProfile {
            evap_max: 0.0,
            ..test_profile()
        };
        let sensor = ideal_sensor().with_dt_hours(2.0);
        let mut state = state_with(p.field_capacity, 5.0);

        // saturation_hours = 6 at 2 h per step: hours 2, 4, then 6.
        for expected_hours in [2.0, 4.0] {
            let out = step(&state, &sensor, &p);
            assert_eq!(out.next_state.waterlogged_hours, expected_hours);
            assert_eq!(out.next_state.water_stress, 0.0);
            state = out.next_state;
        }

        let out = step(&state, &sensor, &p);
        assert_eq!(out.next_state.waterlogged_hours, 6.0);
        // 0 + (saturation_gain - 0) * dt
        assert!((out.next_state.water_stress - 1.0).abs() < 1e-12);
        state = out.next_state;

        // Continues while still saturated: 1.0 + (0.5 - 0.1 * 1.0) * 2
        let out = step(&state, &sensor, &p);
        assert!((out.next_state.water_stress - 1.8).abs() < 1e-12);
        state = out.next_state;

        // Drying below field capacity resets the run immediately.
        let drying = PlantProfile {
            evap_max: 0.02,
            ..p
        };
        let out = step(&state, &sensor, &drying);
        assert!(out.next_state.moisture < drying.field_capacity);
        assert_eq!(out.next_state.waterlogged_hours, 0.0);
    }

    // -- Purity -------------------------------------------------------------

    #[test]
    fn step_is_deterministic() {
        let p = test_profile();
        let prev = state_with(0.27, 2.0);
        let sensor = SensorData::new(33.0, 25.0, 150.0).with_dt_hours(0.5);
        let a = step(&prev, &sensor, &p);
        let b = step(&prev, &sensor, &p);
        assert_eq!(a, b);
        assert_eq!(a.advice, b.advice);
    }

    #[test]
    fn stale_state_diverges_from_serialized_trajectory() {
        // Two steps both applied to the same stale state lose one step of
        // reservoir draw compared to applying them in sequence.
        let p = test_profile();
        let prev = state_with(0.1, 5.0);
        let sensor = ideal_sensor();

        let first = step(&prev, &sensor, &p);
        let sequential = step(&first.next_state, &sensor, &p);
        let stale = step(&prev, &sensor, &p);

        assert!(sequential.next_state.reservoir < stale.next_state.reservoir);
        assert_ne!(sequential.next_state, stale.next_state);
    }

    #[test]
    fn status_echoes_environment_and_next_state() {
        let p = test_profile();
        let sensor = SensorData::new(12.5, 45.0, 640.0);
        let out = step(&state_with(0.5, 3.0), &sensor, &p);

        assert_eq!(out.status.env.temperature_c, 12.5);
        assert_eq!(out.status.env.humidity_pct, 45.0);
        assert_eq!(out.status.env.light_lux, 640.0);
        assert_eq!(out.status.moisture, out.next_state.moisture);
        assert_eq!(out.status.reservoir, out.next_state.reservoir);
        assert_eq!(out.status.stress.total, out.next_state.total_stress);
        assert_eq!(out.status.stress.water, out.next_state.water_stress);
    }

    #[test]
    fn output_serializes_to_json() {
        let p = test_profile();
        let out = step(&state_with(0.5, 3.0), &ideal_sensor(), &p);
        let json = serde_json::to_value(&out).unwrap();

        assert_eq!(json["pump_on"], false);
        assert!(json["status"]["stress"]["total"].is_number());
        assert!(json["advice"]["overall"].is_string());
        assert!(json["next_state"]["waterlogged_hours"].is_number());
    }
}
