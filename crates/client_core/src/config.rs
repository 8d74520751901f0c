use std::{fs, io::ErrorKind, path::Path};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_SETTINGS_FILE: &str = "deploy.toml";
pub const DEFAULT_DEPLOY_ENDPOINT: &str = "https://api.zeit.co/v6/now/deployments";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeploySettings {
    pub endpoint: String,
    pub request_timeout_secs: u64,
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_DEPLOY_ENDPOINT.into(),
            request_timeout_secs: 30,
        }
    }
}

impl DeploySettings {
    pub fn endpoint_url(&self) -> anyhow::Result<Url> {
        let url = Url::parse(self.endpoint.trim())
            .with_context(|| format!("invalid deploy endpoint '{}'", self.endpoint))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "deploy endpoint '{}' must use http or https",
                self.endpoint
            );
        }
        Ok(url)
    }
}

pub fn load_settings() -> anyhow::Result<DeploySettings> {
    load_settings_from(Path::new(DEFAULT_SETTINGS_FILE))
}

/// Defaults, then the TOML file at `path` (if present), then environment overrides.
pub fn load_settings_from(path: &Path) -> anyhow::Result<DeploySettings> {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str::<DeploySettings>(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?,
        Err(err) if err.kind() == ErrorKind::NotFound => DeploySettings::default(),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    };

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

pub fn apply_env_overrides(settings: &mut DeploySettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("DEPLOY_ENDPOINT") {
        settings.endpoint = v;
    }
    if let Some(v) = lookup("APP__DEPLOY_ENDPOINT") {
        settings.endpoint = v;
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(parsed) if parsed > 0 => settings.request_timeout_secs = parsed,
            _ => tracing::warn!(value = %v, "ignoring invalid APP__REQUEST_TIMEOUT_SECS"),
        }
    }
}
