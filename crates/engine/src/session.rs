//! Caller-side helper that keeps one pot's profile, current state and most
//! recent output together, applying each step's `next_state` before the next
//! sample is processed.

use crate::profile::PlantProfile;
use crate::state::{SensorData, SimulationState};
use crate::step::{step, StepOutput};

#[derive(Debug, Clone)]
pub struct PlantSession {
    profile: PlantProfile,
    state: SimulationState,
    last_output: Option<StepOutput>,
    steps: u64,
}

impl PlantSession {
    /// Start a new pot from the profile's initial moisture and reservoir.
    pub fn new(profile: PlantProfile) -> Self {
        let state = SimulationState::initial(&profile);
        Self::resume(profile, state)
    }

    /// Continue from a previously persisted state.
    pub fn resume(profile: PlantProfile, state: SimulationState) -> Self {
        Self {
            profile,
            state,
            last_output: None,
            steps: 0,
        }
    }

    /// Run one step and adopt its `next_state`.  Taking `&mut self` keeps a
    /// pot's steps strictly sequential.
    pub fn process(&mut self, sensor: &SensorData) -> &StepOutput {
        let output = step(&self.state, sensor, &self.profile);
        self.state = output.next_state;
        self.steps += 1;
        self.last_output.insert(output)
    }

    /// Top the reservoir back up (e.g. after the user refills the pot).
    pub fn refill(&mut self, reservoir: f64) {
        self.state.reservoir = reservoir.max(0.0);
    }

    pub fn profile(&self) -> &PlantProfile {
        &self.profile
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn last_output(&self) -> Option<&StepOutput> {
        self.last_output.as_ref()
    }

    /// Number of samples processed since the session was created.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

// ===========================================================================
// Tests
// ===========================================================================
