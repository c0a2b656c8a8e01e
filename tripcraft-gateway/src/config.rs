use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

/// Where trip requests are delivered.
#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    pub endpoint_url: String,
    /// Upper bound on one webhook call, connect through response
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 { 60 }

#[derive(Debug, thiserror::Error)]
pub enum GatewayConfigError {
    #[error("invalid endpoint url {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

impl GatewayConfig {
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parse the endpoint, accepting only absolute http(s) URLs
    pub fn endpoint(&self) -> Result<Url, GatewayConfigError> {
        let invalid = |reason: String| GatewayConfigError::InvalidEndpoint {
            url: self.endpoint_url.clone(),
            reason,
        };

        let url = Url::parse(self.endpoint_url.trim()).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(invalid(format!("unsupported scheme '{}'", other))),
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host".to_string()));
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_https_webhook() {
        let config = GatewayConfig::new("https://hooks.example.com/webhook/ai-trip-advisor");
        let url = config.endpoint().unwrap();
        assert_eq!(url.host_str(), Some("hooks.example.com"));
        assert_eq!(url.path(), "/webhook/ai-trip-advisor");
    }

    #[test]
    fn test_timeout_defaults_to_a_minute() {
        let config = GatewayConfig::new("https://hooks.example.com/webhook");
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_rejects_bad_endpoints() {
        for bad in ["", "not a url", "ftp://files.example.com/drop", "mailto:ops@example.com"] {
            let result = GatewayConfig::new(bad).endpoint();
            assert!(
                matches!(result, Err(GatewayConfigError::InvalidEndpoint { .. })),
                "{:?} should be rejected",
                bad
            );
        }
    }
}
