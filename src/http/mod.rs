//! HTTP control API
//!
//! Injects input into the running application and exposes its state:
//! - GET /health - Health check
//! - GET /status - Current status snapshot
//! - POST /input/tap - Pointer press
//! - POST /input/motion - Accelerometer sample
//! - POST /app/reload - Restart the application

mod handlers;
mod routes;
mod state;

pub use handlers::{MotionRequest, TapRequest};
pub use routes::create_router;
pub use state::AppState;
