use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectError {
    #[error("project must contain at least one file")]
    Empty,
    #[error("duplicate file path '{0}'")]
    DuplicatePath(String),
    #[error("invalid file path '{0}': expected a relative POSIX path")]
    InvalidPath(String),
    #[error("unknown file path '{0}'")]
    UnknownPath(String),
}

/// Error body returned by the deployment service alongside a non-success status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    pub error: ServiceError,
}

impl ServiceErrorBody {
    pub fn describe(&self) -> String {
        match (&self.error.code, &self.error.message) {
            (Some(code), Some(message)) => format!("{code}: {message}"),
            (Some(code), None) => code.clone(),
            (None, Some(message)) => message.clone(),
            (None, None) => "unspecified service error".to_string(),
        }
    }
}
