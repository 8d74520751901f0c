use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use shared::{error::ServiceErrorBody, protocol::DeployResponse};

use crate::{config::DeploySettings, error::DeployFailure};

#[async_trait]
pub trait DeployTransport: Send + Sync {
    /// POSTs a serialized deploy request and returns the decoded success body.
    async fn create_deployment(&self, body: String) -> Result<DeployResponse, DeployFailure>;
}

pub struct HttpDeployTransport {
    http: Client,
    endpoint: String,
}

impl HttpDeployTransport {
    pub fn new(settings: &DeploySettings) -> anyhow::Result<Self> {
        let endpoint = settings.endpoint_url()?;
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .context("failed to build deployment http client")?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DeployTransport for HttpDeployTransport {
    async fn create_deployment(&self, body: String) -> Result<DeployResponse, DeployFailure> {
        let res = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| DeployFailure::Transport(err.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let detail = res
                .json::<ServiceErrorBody>()
                .await
                .ok()
                .map(|body| body.describe());
            return Err(DeployFailure::Status {
                status: status.as_u16(),
                detail,
            });
        }

        res.json::<DeployResponse>()
            .await
            .map_err(|err| DeployFailure::MalformedBody(err.to_string()))
    }
}
