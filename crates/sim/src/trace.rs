//! Replay of recorded sensor samples from a JSON-lines file, one
//! [`SensorData`] object per line.  Blank lines and `#` comments are skipped.

use anyhow::{Context, Result};
use bloompot_engine::SensorData;

/// Read and parse a trace file.
pub fn load(path: &str) -> Result<Vec<SensorData>> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("failed to read trace: {path}"))?;
    parse(&contents).with_context(|| format!("invalid trace: {path}"))
}

pub fn parse(contents: &str) -> Result<Vec<SensorData>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(i, line)| {
            serde_json::from_str::<SensorData>(line)
                .with_context(|| format!("line {}: bad sample", i + 1))
        })
        .collect()
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_samples_in_order() {
        let trace = r#"
# exported from the pot history screen
{"temperature_c": 21.0, "humidity_pct": 55.0, "light_lux": 900.0}
{"temperatureC": 23.5, "humidityPct": 50.0, "lightLux": 1200.0, "dtHours": 0.5}
"#;
        let samples = parse(trace).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0], SensorData::new(21.0, 55.0, 900.0));
        assert_eq!(samples[1].dt_hours(), 0.5);
        assert_eq!(samples[1].light_lux, 1200.0);
    }

    #[test]
    fn empty_trace_is_empty() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("\n  \n# nothing\n").unwrap().is_empty());
    }

    #[test]
    fn bad_line_reports_line_number() {
        let trace = "{\"temperature_c\": 21.0, \"humidity_pct\": 55.0, \"light_lux\": 900.0}\n{oops}\n";
        let err = parse(trace).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("line 2: bad sample"), "unexpected error: {msg}");
    }

    #[test]
    fn load_missing_file_reports_path() {
        let err = load("/nonexistent/trace.jsonl").unwrap_err();
        assert!(format!("{err:#}").contains("failed to read trace: /nonexistent/trace.jsonl"));
    }
}
