use tracing::{error, info};

use super::collaborators::Collaborators;
use crate::devices::{request_permissions, CameraView};
use crate::error::StartupError;

/// What startup found out about the device
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartupReport {
    pub camera_view: CameraView,
    pub motion_enabled: bool,
}

/// Run the startup sequence
///
/// Permission denials and a failing position fix abort startup. A camera that
/// cannot be opened only degrades the view.
pub async fn start_app(collaborators: &Collaborators) -> Result<StartupReport, StartupError> {
    info!("Starting app...");

    request_permissions(collaborators.permissions.as_ref()).await?;
    info!("Permissions requested successfully");

    let camera_view = match collaborators.camera.open().await {
        Ok(()) => {
            info!("Video stream set up successfully");
            CameraView::Live
        }
        Err(e) => {
            error!("Error setting up video stream: {}", e);
            CameraView::Fallback
        }
    };
    collaborators.ui.set_camera_view(camera_view);

    let position = match collaborators.geolocator.current_position().await {
        Ok(position) => position,
        Err(e) => {
            collaborators.camera.release().await;
            return Err(StartupError::Geolocation(e));
        }
    };
    info!(
        "Geolocation set up successfully ({:.4}, {:.4})",
        position.latitude, position.longitude
    );

    let motion_enabled = collaborators.motion.is_supported();
    if motion_enabled {
        info!("Motion detection set up successfully");
    } else {
        info!("Device motion not supported");
    }

    info!("App started successfully");

    Ok(StartupReport {
        camera_view,
        motion_enabled,
    })
}
