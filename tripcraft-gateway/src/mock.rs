use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tripcraft_core::TripRequest;

use crate::{SubmissionFailed, TripGateway};

/// Scripted gateway: waits `latency`, records the call, then answers with a fixed outcome.
pub struct MockGateway {
    latency: Duration,
    outcome: Result<(), SubmissionFailed>,
    calls: Mutex<Vec<TripRequest>>,
}

impl MockGateway {
    pub fn succeeding() -> Self {
        Self {
            latency: Duration::ZERO,
            outcome: Ok(()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: SubmissionFailed) -> Self {
        Self {
            outcome: Err(error),
            ..Self::succeeding()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> Vec<TripRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl TripGateway for MockGateway {
    async fn submit(&self, request: &TripRequest) -> Result<(), SubmissionFailed> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        tokio::time::sleep(self.latency).await;
        self.outcome.clone()
    }
}
