//! Application controller
//!
//! Startup sequencing, the per-instance event loop and the restart runner.
//! Each application instance owns its detector, recording manager and
//! pipeline; a reset tears the instance down and builds a fresh one.

mod collaborators;
mod controller;
mod runner;
mod startup;
mod status;

pub use collaborators::Collaborators;
pub use controller::{ControlEvent, Controller, RunOutcome};
pub use runner::run;
pub use startup::{start_app, StartupReport};
pub use status::{AppPhase, StatusSnapshot};
