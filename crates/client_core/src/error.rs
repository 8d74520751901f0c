use thiserror::Error;

/// The only failure text ever shown to the user, whatever went wrong.
pub const DEPLOY_FAILED_MESSAGE: &str = "Rate limit exceeded";

/// Internal failure kinds. These are logged; the UI only sees
/// [`DeployFailure::user_message`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeployFailure {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("deployment service returned status {status}")]
    Status { status: u16, detail: Option<String> },
    #[error("malformed deployment response: {0}")]
    MalformedBody(String),
}

impl DeployFailure {
    pub fn kind(&self) -> &'static str {
        match self {
            DeployFailure::Transport(_) => "transport",
            DeployFailure::Status { .. } => "status",
            DeployFailure::MalformedBody(_) => "malformed_body",
        }
    }

    pub fn user_message(&self) -> &'static str {
        DEPLOY_FAILED_MESSAGE
    }
}
