//! JSON records written to stdout, one per step, plus the per-pot summary
//! logged at the end of a run.

use anyhow::{Context, Result};
use bloompot_engine::{SimulationState, StepOutput};
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Serialize)]
pub struct StepRecord<'a> {
    pub pot: &'a str,
    pub step: u32,
    /// Simulated time of the sample.
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
    pub output: &'a StepOutput,
}

/// Simulated timestamp `elapsed_hours` after `start`.  Fails once the
/// offset leaves the range `time` can represent.
pub fn simulated_time(start: OffsetDateTime, elapsed_hours: f64) -> Result<OffsetDateTime> {
    time::Duration::checked_seconds_f64(elapsed_hours * 3600.0)
        .and_then(|offset| start.checked_add(offset))
        .with_context(|| format!("simulated time {elapsed_hours} h after {start} is out of range"))
}

#[derive(Debug)]
pub struct PotSummary {
    pub pot: String,
    pub species: String,
    pub steps: u32,
    pub skipped: u32,
    pub pump_steps: u32,
    /// Reservoir water drawn over the run.
    pub water_used: f64,
    pub final_state: SimulationState,
    pub final_advice: Option<String>,
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bloompot_engine::{step, ProfileCatalog, SensorData};
    use time::macros::datetime;

    #[test]
    fn simulated_time_advances_by_hours() {
        let start = datetime!(2026-05-01 08:00 UTC);
        assert_eq!(simulated_time(start, 0.0).unwrap(), start);
        assert_eq!(
            simulated_time(start, 1.5).unwrap(),
            datetime!(2026-05-01 09:30 UTC)
        );
        assert_eq!(
            simulated_time(start, 24.0).unwrap(),
            datetime!(2026-05-02 08:00 UTC)
        );
    }

    #[test]
    fn simulated_time_out_of_range_is_an_error() {
        let start = datetime!(2026-05-01 08:00 UTC);
        for hours in [1e15, 1e300, f64::INFINITY, f64::NAN] {
            let err = simulated_time(start, hours).unwrap_err();
            assert!(
                format!("{err:#}").contains("out of range"),
                "unexpected error for {hours}: {err:#}"
            );
        }
    }

    #[test]
    fn step_record_serializes_with_rfc3339_time() {
        let catalog = ProfileCatalog::builtin().unwrap();
        let profile = catalog.find_by_common_name("pothos").unwrap();
        let state = SimulationState::initial(profile);
        let output = step(&state, &SensorData::new(22.0, 60.0, 1000.0), profile);

        let record = StepRecord {
            pot: "pot-1",
            step: 3,
            at: datetime!(2026-05-01 08:00 UTC),
            output: &output,
        };
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["pot"], "pot-1");
        assert_eq!(json["step"], 3);
        assert_eq!(json["at"], "2026-05-01T08:00:00Z");
        assert!(json["output"]["pump_on"].is_boolean());
        assert!(json["output"]["advice"]["water"].is_string());
        assert_eq!(json.as_object().unwrap().len(), 4);
    }
}
