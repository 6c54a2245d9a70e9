use anyhow::Result;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info};

use super::collaborators::Collaborators;
use super::controller::{ControlEvent, Controller, RunOutcome};
use super::startup::start_app;
use super::status::{AppPhase, StatusSnapshot};
use crate::config::Config;

/// Run application instances until shutdown
///
/// Every reset or reload tears the current instance down and starts a fresh
/// one. A failed startup shows its error and waits for a reload.
pub async fn run(
    config: Config,
    collaborators: Collaborators,
    mut events: mpsc::Receiver<ControlEvent>,
    status: watch::Sender<StatusSnapshot>,
) -> Result<()> {
    let mut instance = 0u64;

    loop {
        instance += 1;
        status.send_replace(StatusSnapshot {
            instance,
            ..Default::default()
        });

        let outcome = match start_app(&collaborators).await {
            Ok(report) => {
                let controller =
                    Controller::new(instance, &config, &collaborators, report, status.clone())?;
                controller.run(&mut events).await
            }
            Err(e) => {
                error!("Error starting app: {}", e);
                let message = e.user_message();
                collaborators.ui.show_startup_error(&message);
                status.send_modify(|s| {
                    s.phase = AppPhase::StartupFailed;
                    s.startup_error = Some(message);
                });
                wait_for_reload(&mut events).await
            }
        };

        match outcome {
            RunOutcome::Shutdown => break,
            RunOutcome::Restart => {
                if discard_pending(&mut events) == RunOutcome::Shutdown {
                    break;
                }
                info!("Restarting application");
            }
        }
    }

    status.send_modify(|s| s.phase = AppPhase::Stopped);
    info!("Application shut down");
    Ok(())
}

/// Ignore gestures until the user reloads
async fn wait_for_reload(events: &mut mpsc::Receiver<ControlEvent>) -> RunOutcome {
    loop {
        match events.recv().await {
            Some(ControlEvent::Reload) => return RunOutcome::Restart,
            Some(ControlEvent::Shutdown) | None => return RunOutcome::Shutdown,
            Some(event) => debug!("Ignoring {:?} while startup failed", event),
        }
    }
}

/// Drop input queued for the instance that just ended
fn discard_pending(events: &mut mpsc::Receiver<ControlEvent>) -> RunOutcome {
    while let Ok(event) = events.try_recv() {
        if event == ControlEvent::Shutdown {
            return RunOutcome::Shutdown;
        }
    }
    RunOutcome::Restart
}
