use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

use crate::error::StartupError;

/// Capability the client needs from the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Camera,
    Microphone,
    Geolocation,
}

impl Capability {
    /// Capabilities checked at startup, in order
    pub const REQUIRED: [Capability; 3] = [
        Capability::Camera,
        Capability::Microphone,
        Capability::Geolocation,
    ];
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Camera => "camera",
            Capability::Microphone => "microphone",
            Capability::Geolocation => "geolocation",
        };
        f.write_str(name)
    }
}

/// Permission state as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionState {
    Granted,
    Prompt,
    Denied,
}

#[async_trait::async_trait]
pub trait PermissionProvider: Send + Sync {
    /// Query the permission state of a capability
    ///
    /// Returns `None` when the platform has no permission API, in which case
    /// the capability is assumed to be granted.
    async fn query(&self, capability: Capability) -> Option<PermissionState>;
}

/// Check every required capability, failing on the first explicit denial
pub async fn request_permissions(provider: &dyn PermissionProvider) -> Result<(), StartupError> {
    for capability in Capability::REQUIRED {
        info!("Requesting permission for {}", capability);

        match provider.query(capability).await {
            Some(PermissionState::Denied) => {
                warn!("Permission for {} was denied", capability);
                return Err(StartupError::PermissionDenied(capability));
            }
            Some(state) => info!("Permission status for {}: {:?}", capability, state),
            None => info!(
                "Permissions API not available, assuming {} permission is granted",
                capability
            ),
        }
    }

    Ok(())
}
