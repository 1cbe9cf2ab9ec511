use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::debug;
use ureq::Agent;

use crate::source::Fetcher;
use crate::validation::{Method, ProbeError, Prober};

/// `[http]` table of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: format!("fedcheck/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Blocking client for metadata downloads and reachability probes.
#[derive(Clone)]
pub struct HttpClient {
    agent: Agent,
    user_agent: String,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            user_agent: config.user_agent.clone(),
        }
    }
}

impl Prober for HttpClient {
    fn request(&self, method: Method, url: &str) -> Result<u16, ProbeError> {
        let response = match method {
            Method::Get => self
                .agent
                .get(url)
                .header("User-Agent", self.user_agent.as_str())
                .call(),
        };
        let status = response
            .map_err(|e| ProbeError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            })?
            .status()
            .as_u16();
        debug!(url, status, "probed");
        Ok(status)
    }
}

impl Fetcher for HttpClient {
    fn fetch(&self, url: &str) -> Result<String> {
        debug!(url, "fetching");
        let response = self
            .agent
            .get(url)
            .header("User-Agent", self.user_agent.as_str())
            .call()
            .with_context(|| format!("Failed to fetch {}", url))?;

        let status = response.status().as_u16();
        if status != 200 {
            bail!("GET {} returned HTTP status {}", url, status);
        }

        response
            .into_body()
            .read_to_string()
            .with_context(|| format!("Failed to read response body from {}", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_keys() {
        let config: HttpConfig = toml::from_str("timeout_secs = 3").unwrap();
        assert_eq!(config.timeout_secs, 3);
        assert!(config.user_agent.starts_with("fedcheck/"));
    }
}
