use tokio::sync::{mpsc, watch};

use crate::app::{ControlEvent, StatusSnapshot};

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Input queue of the application controller
    pub events: mpsc::Sender<ControlEvent>,
    /// Latest published status
    pub status: watch::Receiver<StatusSnapshot>,
}

impl AppState {
    pub fn new(events: mpsc::Sender<ControlEvent>, status: watch::Receiver<StatusSnapshot>) -> Self {
        Self { events, status }
    }
}
