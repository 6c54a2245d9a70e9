use serde::{Deserialize, Serialize};

use crate::error::DeviceError;

/// Resolved device position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    /// `lat,lng` as used in map URIs
    pub fn as_query(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

#[async_trait::async_trait]
pub trait Geolocator: Send + Sync {
    /// Resolve the current position
    async fn current_position(&self) -> Result<Position, DeviceError>;
}
