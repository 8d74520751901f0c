//! Deployment client: the HTTP transport to the deployment service and the
//! submission state machine driven by the editor front ends.

pub mod config;
mod deploy;
pub mod error;
pub mod transport;

pub use deploy::{
    redirect_target, DeployController, DeployOutcome, DeployStatus, Navigator,
    REDIRECT_QUERY_KEY, REDIRECT_QUERY_VALUE,
};
pub use error::{DeployFailure, DEPLOY_FAILED_MESSAGE};
pub use transport::{DeployTransport, HttpDeployTransport};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
