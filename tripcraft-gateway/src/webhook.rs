use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{info, warn};
use tripcraft_core::TripRequest;

use crate::config::{GatewayConfig, GatewayConfigError};
use crate::payload::WebhookPayload;
use crate::{SubmissionFailed, TripGateway};

/// Posts trip requests to the planning webhook over HTTP.
#[derive(Debug, Clone)]
pub struct WebhookGateway {
    client: Client,
    endpoint: Url,
}

impl WebhookGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayConfigError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Self::with_client(client, config)
    }

    pub fn with_client(client: Client, config: &GatewayConfig) -> Result<Self, GatewayConfigError> {
        Ok(Self {
            client,
            endpoint: config.endpoint()?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl TripGateway for WebhookGateway {
    async fn submit(&self, request: &TripRequest) -> Result<(), SubmissionFailed> {
        let payload = WebhookPayload::from(request);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                warn!("Trip submission to {} failed in transport: {}", self.endpoint, e);
                SubmissionFailed::Transport {
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Planning service answered {} for trip submission", status);
            return Err(SubmissionFailed::Rejected {
                status: status.as_u16(),
            });
        }

        info!(
            "Trip to {} accepted ({} nights, {} travelers)",
            request.destination(),
            request.nights(),
            request.traveler_count()
        );
        Ok(())
    }
}
