mod config;
mod environment;
mod report;
mod trace;

use anyhow::{Context, Result};
use bloompot_engine::{PlantSession, ProfileCatalog, SensorData};
use std::time::Duration;
use time::OffsetDateTime;
use tokio::time::sleep;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use config::SimConfig;
use environment::EnvironmentSim;
use report::{simulated_time, PotSummary, StepRecord};

// ---------------------------------------------------------------------------
// Sample sources
// ---------------------------------------------------------------------------

enum SensorSource {
    Synthetic { sim: EnvironmentSim, dt_hours: f64 },
    Replay(std::vec::IntoIter<SensorData>),
}

impl SensorSource {
    fn next_sample(&mut self) -> Option<SensorData> {
        match self {
            Self::Synthetic { sim, dt_hours } => Some(sim.sample(*dt_hours)),
            Self::Replay(samples) => samples.next(),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-pot loop
// ---------------------------------------------------------------------------

/// Drive one pot through up to `steps` samples.  Each pot owns its session,
/// so its steps are sequential while pots run side by side.
async fn run_pot(
    pot: String,
    mut session: PlantSession,
    mut source: SensorSource,
    steps: u32,
    pause: Duration,
    start: OffsetDateTime,
) -> Result<PotSummary> {
    let species = session.profile().common_name.clone();
    let initial_reservoir = session.state().reservoir;

    info!(pot = %pot, species = %species, steps, "pot started");

    let mut step: u32 = 0;
    let mut skipped: u32 = 0;
    let mut pump_steps: u32 = 0;
    let mut elapsed_hours = 0.0;
    let mut pump_was_on = false;
    let mut empty_reported = false;

    while step < steps {
        let Some(sample) = source.next_sample() else {
            info!(pot = %pot, step, "trace exhausted");
            break;
        };

        // The engine propagates NaN and out-of-range values; drop them here.
        if let Err(e) = sample.check() {
            warn!(pot = %pot, step, "skipping sample: {e}");
            skipped += 1;
            continue;
        }

        elapsed_hours += sample.dt_hours();
        let output = session.process(&sample);
        step += 1;

        if output.pump_on {
            pump_steps += 1;
        }
        if output.pump_on != pump_was_on {
            info!(
                pot = %pot,
                step,
                pump_on = output.pump_on,
                moisture = format!("{:.3}", output.status.moisture),
                reason = %output.reason,
                "pump state changed"
            );
            pump_was_on = output.pump_on;
        }
        if output.next_state.reservoir <= 0.0 && !empty_reported {
            warn!(pot = %pot, step, "reservoir empty: refill needed");
            empty_reported = true;
        }

        let record = StepRecord {
            pot: &pot,
            step,
            at: simulated_time(start, elapsed_hours)
                .with_context(|| format!("{pot}: step {step} timestamp"))?,
            output,
        };
        let line = serde_json::to_string(&record).context("failed to serialize step record")?;
        println!("{line}");

        if !pause.is_zero() {
            sleep(pause).await;
        }
    }

    let final_state = *session.state();
    Ok(PotSummary {
        pot,
        species,
        steps: step,
        skipped,
        pump_steps,
        water_used: (initial_reservoir - final_state.reservoir).max(0.0),
        final_state,
        final_advice: session.last_output().map(|o| o.advice.overall.clone()),
    })
}

/// Simulated time of the first sample, fixed by the config.
fn start_time(cfg: &SimConfig) -> Result<OffsetDateTime> {
    simulated_time(cfg.start_date.midnight().assume_utc(), cfg.start_hour)
}

/// Error text for a name that is not in the catalog, with suggestions.
fn unknown_species(catalog: &ProfileCatalog, name: &str) -> String {
    let close: Vec<&str> = catalog
        .search(name)
        .into_iter()
        .map(|p| p.common_name.as_str())
        .collect();
    let suggestions = if close.is_empty() {
        catalog.species_list()
    } else {
        close
    };
    format!(
        "unknown species '{name}' (known: {})",
        suggestions.join(", ")
    )
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // ── Config ──────────────────────────────────────────────────────
    let cfg = SimConfig::from_env()?;

    let catalog = match &cfg.catalog_path {
        Some(path) => ProfileCatalog::load(path)?,
        None => ProfileCatalog::builtin()?,
    };

    let replay = match &cfg.trace_path {
        Some(path) => {
            let samples = trace::load(path)?;
            info!(path = %path, samples = samples.len(), "replaying recorded trace");
            Some(samples)
        }
        None => None,
    };

    info!(
        plants = ?cfg.plants,
        scenario = %cfg.scenario,
        steps = cfg.steps,
        dt_hours = cfg.dt_hours,
        seed = cfg.seed,
        "simulation starting"
    );

    // ── Pots ────────────────────────────────────────────────────────
    let start = start_time(&cfg)?;
    let pause = Duration::from_millis(cfg.sample_every_ms);

    let mut handles = Vec::with_capacity(cfg.plants.len());
    for (i, name) in cfg.plants.iter().enumerate() {
        let profile = catalog
            .find_by_common_name(name)
            .cloned()
            .with_context(|| unknown_species(&catalog, name))?;

        let source = match &replay {
            Some(samples) => SensorSource::Replay(samples.clone().into_iter()),
            None => SensorSource::Synthetic {
                sim: EnvironmentSim::new(
                    cfg.scenario,
                    cfg.seed.wrapping_add(i as u64),
                    cfg.start_hour,
                ),
                dt_hours: cfg.dt_hours,
            },
        };

        let pot = format!("pot-{}", i + 1);
        let session = PlantSession::new(profile);
        handles.push(tokio::spawn(run_pot(
            pot, session, source, cfg.steps, pause, start,
        )));
    }

    // ── Results ─────────────────────────────────────────────────────
    let mut failures = 0;
    for handle in handles {
        match handle.await {
            Ok(Ok(summary)) => info!(
                pot = %summary.pot,
                species = %summary.species,
                steps = summary.steps,
                skipped = summary.skipped,
                pump_steps = summary.pump_steps,
                water_used = format!("{:.3}", summary.water_used),
                moisture = format!("{:.3}", summary.final_state.moisture),
                stress = format!("{:.3}", summary.final_state.total_stress),
                advice = summary.final_advice.as_deref().unwrap_or("-"),
                "pot finished"
            ),
            Ok(Err(e)) => {
                error!("pot failed: {e:#}");
                failures += 1;
            }
            Err(e) => {
                error!("pot task panicked: {e}");
                failures += 1;
            }
        }
    }

    anyhow::ensure!(failures == 0, "{failures} pot(s) failed");
    Ok(())
}

// ===========================================================================
// Tests
// ===========================================================================
