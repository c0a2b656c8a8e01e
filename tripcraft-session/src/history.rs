use tracing::debug;

/// Navigation-state manipulation failed. Never surfaced to the user.
#[derive(Debug, thiserror::Error)]
#[error("navigation cleanup failed: {0}")]
pub struct IncidentalCleanupError(pub String);

/// Browser-history hooks the dialog touches before submitting.
pub trait NavigationHistory: Send + Sync {
    /// Drop a stray `#fragment` from the current location
    fn discard_fragment(&self) -> Result<(), IncidentalCleanupError>;
}

/// For shells without navigation history.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl NavigationHistory for NoHistory {
    fn discard_fragment(&self) -> Result<(), IncidentalCleanupError> {
        Ok(())
    }
}

/// Run the cleanup, dropping any failure.
pub(crate) fn best_effort(history: &dyn NavigationHistory) {
    if let Err(e) = history.discard_fragment() {
        debug!("Ignoring {}", e);
    }
}
