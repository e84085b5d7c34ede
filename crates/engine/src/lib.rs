//! BloomPot plant vitals engine.
//!
//! A pure, discrete-time model of one potted plant: soil moisture and
//! evapotranspiration, three stress channels (water, temperature, light), an
//! irrigation decision policy and plain-language care advice.
//!
//! The engine holds no state of its own.  Callers keep a [`SimulationState`]
//! per pot, feed it to [`step`] together with a [`SensorData`] sample and the
//! pot's [`PlantProfile`], and persist the returned `next_state`.  Steps for a
//! single pot must be applied in order; different pots are independent.

pub mod advice;
pub mod catalog;
pub mod decision;
pub mod moisture;
pub mod profile;
pub mod session;
pub mod state;
pub mod step;
pub mod stress;

pub use advice::Advice;
pub use catalog::ProfileCatalog;
pub use decision::WateringDecision;
pub use profile::PlantProfile;
pub use session::PlantSession;
pub use state::{SensorData, SimulationState, DEFAULT_DT_HOURS};
pub use step::{step, Environment, Status, StepOutput, StressBreakdown};
