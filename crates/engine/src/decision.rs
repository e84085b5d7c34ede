//! Watering decision policy.
//!
//! Two controllers vote on the pump:
//!
//! - the *autonomous* controller walks the moisture ladder (wilting point,
//!   critical point, a three-hour look-ahead at `evap_max`) and is vetoed at
//!   field capacity;
//! - the *sensor-threshold* controller fires below `sensor_threshold`.
//!
//! The pump runs if either votes yes.  The field-capacity veto only applies to
//! the autonomous controller, so a profile whose `sensor_threshold` sits above
//! field capacity will still pump on saturated soil.

use crate::profile::PlantProfile;

/// Hours of look-ahead used by the forecast rule.
const FORECAST_HOURS: f64 = 3.0;

pub const REASON_RESERVOIR_EMPTY: &str = "Reservoir is empty – pump off.";
pub const REASON_EMERGENCY: &str = "Soil below wilting point (emergency watering).";
pub const REASON_CRITICAL: &str = "Soil moisture below critical threshold.";
pub const REASON_FORECAST: &str = "Forecasted moisture will fall below critical soon.";
pub const REASON_FIELD_CAPACITY: &str = "Soil near or above field capacity – skipping water.";
pub const REASON_SENSOR: &str = "Sensor detects low moisture (below sensor threshold).";
pub const REASON_ACCEPTABLE: &str = "Moisture is in acceptable range – no watering needed.";

#[derive(Debug, Clone, PartialEq)]
pub struct WateringDecision {
    pub pump_on: bool,
    /// Every matched rule's explanation, space-separated.
    pub reason: String,
    pub autonomous: bool,
    pub sensor_triggered: bool,
}

/// Decide whether to pump, using the moisture and reservoir from *before*
/// this step's update.
pub fn decide(moisture: f64, reservoir: f64, profile: &PlantProfile) -> WateringDecision {
    if reservoir <= 0.0 {
        return WateringDecision {
            pump_on: false,
            reason: REASON_RESERVOIR_EMPTY.to_string(),
            autonomous: false,
            sensor_triggered: false,
        };
    }

    let mut reasons: Vec<&str> = Vec::new();
    let mut autonomous = false;
    let mut sensor_triggered = false;

    if moisture < profile.wilting_point {
        autonomous = true;
        reasons.push(REASON_EMERGENCY);
    } else if moisture < profile.critical_point {
        autonomous = true;
        reasons.push(REASON_CRITICAL);
    } else if moisture - profile.critical_point < FORECAST_HOURS * profile.evap_max {
        autonomous = true;
        reasons.push(REASON_FORECAST);
    }

    if moisture >= profile.field_capacity {
        autonomous = false;
        reasons.push(REASON_FIELD_CAPACITY);
    }

    if moisture < profile.sensor_threshold {
        sensor_triggered = true;
        reasons.push(REASON_SENSOR);
    }

    let pump_on = autonomous || sensor_triggered;

    if !pump_on && reasons.is_empty() {
        reasons.push(REASON_ACCEPTABLE);
    }

    WateringDecision {
        pump_on,
        reason: reasons.join(" "),
        autonomous,
        sensor_triggered,
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::fixtures::test_profile;

    // test_profile: wp 0.15, crit 0.30, fc 0.80, sensor 0.25, evap_max 0.02

    #[test]
    fn empty_reservoir_short_circuits() {
        let p = test_profile();
        for w in [0.0, 0.1, 0.2, 0.5, 0.8] {
            let d = decide(w, 0.0, &p);
            assert!(!d.pump_on, "pump on at w={w} with empty reservoir");
            assert_eq!(d.reason, "Reservoir is empty – pump off.");
        }
        assert!(!decide(0.1, -1.0, &p).pump_on);
    }

    #[test]
    fn below_wilting_point_is_emergency() {
        let d = decide(0.10, 1.0, &test_profile());
        assert!(d.pump_on);
        assert!(d.autonomous);
        assert!(d.sensor_triggered);
        assert_eq!(d.reason, format!("{REASON_EMERGENCY} {REASON_SENSOR}"));
    }

    #[test]
    fn below_critical_only_one_ladder_reason() {
        let d = decide(0.28, 1.0, &test_profile());
        assert!(d.pump_on);
        assert!(d.autonomous);
        assert!(!d.sensor_triggered);
        assert_eq!(d.reason, REASON_CRITICAL);
    }

    #[test]
    fn forecast_rule_fires_within_lookahead() {
        // 0.35 - 0.30 = 0.05 < 3 * 0.02
        let d = decide(0.35, 1.0, &test_profile());
        assert!(d.pump_on);
        assert_eq!(d.reason, REASON_FORECAST);
    }

    #[test]
    fn acceptable_range_leaves_pump_off() {
        let d = decide(0.5, 1.0, &test_profile());
        assert!(!d.pump_on);
        assert_eq!(d.reason, REASON_ACCEPTABLE);
    }

    #[test]
    fn field_capacity_vetoes_autonomous() {
        // Large evap_max makes the forecast rule match even when saturated.
        let p = PlantProfile {
            evap_max: 0.5,
            ..test_profile()
        };
        let d = decide(0.8, 1.0, &p);
        assert!(!d.autonomous);
        assert!(!d.pump_on);
        assert_eq!(d.reason, format!("{REASON_FORECAST} {REASON_FIELD_CAPACITY}"));
    }

    #[test]
    fn field_capacity_does_not_veto_sensor_threshold() {
        let p = PlantProfile {
            sensor_threshold: 0.9,
            ..test_profile()
        };
        let d = decide(0.8, 1.0, &p);
        assert!(!d.autonomous);
        assert!(d.sensor_triggered);
        assert!(d.pump_on, "sensor controller should still pump at field capacity");
        assert_eq!(d.reason, format!("{REASON_FIELD_CAPACITY} {REASON_SENSOR}"));
    }

    #[test]
    fn at_field_capacity_no_acceptable_reason_appended() {
        let d = decide(0.8, 1.0, &test_profile());
        assert!(!d.pump_on);
        assert_eq!(d.reason, REASON_FIELD_CAPACITY);
    }
}
