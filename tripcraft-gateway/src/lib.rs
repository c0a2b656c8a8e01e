pub mod config;
pub mod payload;
pub mod webhook;
pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tripcraft_core::TripRequest;

pub use config::{GatewayConfig, GatewayConfigError};
pub use payload::WebhookPayload;
pub use webhook::WebhookGateway;
pub use mock::MockGateway;

/// Delivers a validated trip request to the remote planning service.
///
/// One call is one attempt. Implementations never retry and know nothing
/// about the dialog that triggered them.
#[async_trait]
pub trait TripGateway: Send + Sync {
    async fn submit(&self, request: &TripRequest) -> Result<(), SubmissionFailed>;
}

/// The planning service did not accept a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubmissionFailed {
    #[error("could not reach the planning service: {message}")]
    Transport { message: String },

    #[error("planning service rejected the request with status {status}")]
    Rejected { status: u16 },
}
