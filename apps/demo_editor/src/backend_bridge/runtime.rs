//! Backend worker: owns the tokio runtime and the deploy controller, consumes UI
//! commands and reports state changes back as [`UiEvent`]s.

use std::{sync::Arc, thread};

use client_core::{
    config::DeploySettings, DeployController, DeployStatus, HttpDeployTransport, Navigator,
};
use crossbeam_channel::{Receiver, Sender};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

/// Hands finished deployments to the UI thread, which opens them.
struct UiNavigator {
    ui_tx: Sender<UiEvent>,
}

impl Navigator for UiNavigator {
    fn navigate(&self, url: &str) {
        if self.ui_tx.try_send(UiEvent::Navigate(url.to_string())).is_err() {
            tracing::error!(%url, "failed to forward deployment redirect to ui");
        }
    }
}

/// Relays every deploy status to the UI in order. Blocks when the UI queue is
/// full so the final `busy: false` status is never dropped.
fn forward_statuses(mut events: broadcast::Receiver<DeployStatus>, ui_tx: Sender<UiEvent>) {
    loop {
        match events.blocking_recv() {
            Ok(status) => {
                if ui_tx.send(UiEvent::DeployStatusChanged(status)).is_err() {
                    tracing::debug!("ui closed; stopping deploy status relay");
                    break;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "ui lagged behind deploy state events");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: DeploySettings) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(format!(
                    "deploy worker startup failure: failed to build runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let transport = match HttpDeployTransport::new(&settings) {
            Ok(transport) => transport,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(format!(
                    "deploy worker startup failure: {err:#}"
                )));
                tracing::error!("failed to build deploy transport: {err:#}");
                return;
            }
        };
        tracing::info!(endpoint = transport.endpoint(), "deploy worker ready");

        let controller = Arc::new(DeployController::new(
            Arc::new(transport),
            Arc::new(UiNavigator {
                ui_tx: ui_tx.clone(),
            }),
        ));

        runtime.block_on(async move {
            let events = controller.subscribe();
            let status_tx = ui_tx.clone();
            thread::spawn(move || forward_statuses(events, status_tx));

            let _ = ui_tx.try_send(UiEvent::Info("Deploy worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Deploy { project } => {
                        let controller = controller.clone();
                        tokio::spawn(async move {
                            controller.submit(&project).await;
                        });
                    }
                }
            }

            tracing::info!("ui command queue closed; deploy worker stopping");
        });
    });
}
