//! Single-flight recording lifecycle
//!
//! ```text
//!           trigger              trigger             flushed
//! ┌──────┐ ────────► ┌───────────┐ ────────► ┌────────────┐ ──────► Idle
//! │ Idle │           │ Recording │           │ Finalizing │  (buffer handed
//! └──────┘ ◄──────── └───────────┘           └────────────┘   to the pipeline)
//!     ▲       reset                                  │
//!     └──────────────────────────────────────────────┘ reset (discarded)
//! ```

mod manager;
mod session;
mod state;

pub use manager::{RecordingManager, ToggleOutcome};
pub use session::{FinalizedRecording, RecordingSession};
pub use state::RecordingState;
