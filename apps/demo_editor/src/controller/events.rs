//! Events flowing from the backend worker to the UI thread.

use client_core::DeployStatus;

pub enum UiEvent {
    Info(String),
    Error(String),
    DeployStatusChanged(DeployStatus),
    /// Open the finished deployment. Sent once per successful deploy.
    Navigate(String),
}
