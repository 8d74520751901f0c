//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = match &cmd {
        BackendCommand::Deploy { .. } => "deploy",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Deploy worker is not running; restart the editor".to_string();
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;
    use shared::domain::Project;

    use super::*;

    #[test]
    fn reports_full_and_disconnected_queues() {
        let (tx, rx) = bounded::<BackendCommand>(1);
        let mut status = String::new();

        assert!(dispatch_backend_command(
            &tx,
            BackendCommand::Deploy {
                project: Project::seed()
            },
            &mut status
        ));
        assert!(!dispatch_backend_command(
            &tx,
            BackendCommand::Deploy {
                project: Project::seed()
            },
            &mut status
        ));
        assert!(status.contains("queue is full"));

        drop(rx);
        assert!(!dispatch_backend_command(
            &tx,
            BackendCommand::Deploy {
                project: Project::seed()
            },
            &mut status
        ));
        assert!(status.contains("not running"));
    }
}
