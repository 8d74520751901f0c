use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::{domain::Project, protocol::DeployRequest};
use tokio::sync::broadcast;
use tracing::{debug, error, info};
use url::Url;

use crate::{error::DeployFailure, transport::DeployTransport};

pub const REDIRECT_QUERY_KEY: &str = "redirect";
pub const REDIRECT_QUERY_VALUE: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeployOutcome {
    #[default]
    Idle,
    InFlight,
    Redirecting(String),
    Failed(String),
}

impl DeployOutcome {
    pub fn error_message(&self) -> Option<&str> {
        match self {
            DeployOutcome::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn redirect_url(&self) -> Option<&str> {
        match self {
            DeployOutcome::Redirecting(url) => Some(url),
            _ => None,
        }
    }
}

/// What subscribers observe after every transition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeployStatus {
    pub outcome: DeployOutcome,
    pub busy: bool,
}

/// Performs the navigation to a finished deployment.
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &str);
}

#[derive(Default)]
struct DeployState {
    outcome: DeployOutcome,
    in_flight: usize,
}

impl DeployState {
    fn status(&self) -> DeployStatus {
        DeployStatus {
            outcome: self.outcome.clone(),
            busy: self.in_flight > 0,
        }
    }
}

pub struct DeployController {
    transport: Arc<dyn DeployTransport>,
    navigator: Arc<dyn Navigator>,
    state: Mutex<DeployState>,
    events: broadcast::Sender<DeployStatus>,
}

impl DeployController {
    pub fn new(transport: Arc<dyn DeployTransport>, navigator: Arc<dyn Navigator>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            transport,
            navigator,
            state: Mutex::new(DeployState::default()),
            events,
        }
    }

    pub fn outcome(&self) -> DeployOutcome {
        self.lock_state().outcome.clone()
    }

    pub fn status(&self) -> DeployStatus {
        self.lock_state().status()
    }

    pub fn is_busy(&self) -> bool {
        self.lock_state().in_flight > 0
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DeployStatus> {
        self.events.subscribe()
    }

    /// Serializes `project` immediately and deploys that snapshot. Later edits to
    /// the caller's project are not part of this request.
    pub async fn submit(&self, project: &Project) -> DeployOutcome {
        let request = DeployRequest::from_project(project);
        let body = request.to_body();
        let _flight = self.begin_flight();

        info!(
            project = %request.name,
            files = request.files.len(),
            "submitting deployment"
        );

        match self.deploy_body(body).await {
            Ok(url) => {
                let outcome = DeployOutcome::Redirecting(url.clone());
                self.set_outcome(outcome.clone());
                info!(%url, "deployment created; redirecting");
                self.navigator.navigate(&url);
                outcome
            }
            Err(failure) => {
                match &failure {
                    DeployFailure::Status { status, detail } => error!(
                        kind = failure.kind(),
                        status,
                        detail = detail.as_deref().unwrap_or(""),
                        "failed to deploy"
                    ),
                    _ => error!(kind = failure.kind(), error = %failure, "failed to deploy"),
                }
                let outcome = DeployOutcome::Failed(failure.user_message().to_string());
                self.set_outcome(outcome.clone());
                outcome
            }
        }
    }

    async fn deploy_body(&self, body: String) -> Result<String, DeployFailure> {
        let response = self.transport.create_deployment(body).await?;
        if let Some(id) = &response.id {
            debug!(deployment_id = %id, "deployment accepted");
        }
        let target = redirect_target(&response.url)?;
        Ok(target.to_string())
    }

    fn begin_flight(&self) -> FlightGuard<'_> {
        let status = {
            let mut state = self.lock_state();
            state.in_flight += 1;
            state.outcome = DeployOutcome::InFlight;
            state.status()
        };
        self.publish(status);
        FlightGuard { controller: self }
    }

    fn end_flight(&self) {
        let status = {
            let mut state = self.lock_state();
            state.in_flight = state.in_flight.saturating_sub(1);
            if state.in_flight == 0 && state.outcome == DeployOutcome::InFlight {
                state.outcome = DeployOutcome::Idle;
            }
            state.status()
        };
        self.publish(status);
    }

    fn set_outcome(&self, outcome: DeployOutcome) {
        let status = {
            let mut state = self.lock_state();
            state.outcome = outcome;
            state.status()
        };
        self.publish(status);
    }

    fn publish(&self, status: DeployStatus) {
        debug!(outcome = ?status.outcome, busy = status.busy, "deploy state changed");
        let _ = self.events.send(status);
    }

    fn lock_state(&self) -> MutexGuard<'_, DeployState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the busy flag however `submit` exits, including when its future is dropped.
struct FlightGuard<'a> {
    controller: &'a DeployController,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.controller.end_flight();
    }
}

/// Turns the service's `url` field (usually a bare host) into the navigation
/// target, appending `redirect=1` when it is not already present.
pub fn redirect_target(raw: &str) -> Result<Url, DeployFailure> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DeployFailure::MalformedBody(
            "deployment url is empty".to_string(),
        ));
    }

    let candidate = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };
    let mut url = Url::parse(&candidate)
        .map_err(|err| DeployFailure::MalformedBody(format!("invalid deployment url '{raw}': {err}")))?;

    let has_marker = url
        .query_pairs()
        .any(|(key, value)| key == REDIRECT_QUERY_KEY && value == REDIRECT_QUERY_VALUE);
    if !has_marker {
        url.query_pairs_mut()
            .append_pair(REDIRECT_QUERY_KEY, REDIRECT_QUERY_VALUE);
    }
    Ok(url)
}
