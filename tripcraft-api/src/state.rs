use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tripcraft_gateway::TripGateway;
use tripcraft_session::{Notifier, TracingNotifier, TripDialog};
use uuid::Uuid;

use crate::error::AppError;

/// How long a closed dialog stays reopenable before it is dropped.
pub const CLOSED_DIALOG_TTL: Duration = Duration::from_secs(300);

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn TripGateway>,
    pub notifier: Arc<dyn Notifier>,
    pub dialogs: Arc<RwLock<HashMap<Uuid, TripDialog>>>,
}

impl AppState {
    pub fn new(gateway: Arc<dyn TripGateway>) -> Self {
        Self {
            gateway,
            notifier: Arc::new(TracingNotifier),
            dialogs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Register and open a new dialog sharing this state's gateway and notifier
    pub async fn create_dialog(&self) -> (Uuid, TripDialog) {
        let dialog = TripDialog::builder(self.gateway.clone())
            .notifier(self.notifier.clone())
            .build();
        dialog.open();

        let dialog_id = Uuid::new_v4();
        self.dialogs.write().await.insert(dialog_id, dialog.clone());
        self.evict_when_closed(dialog_id, &dialog);
        (dialog_id, dialog)
    }

    pub async fn dialog(&self, dialog_id: Uuid) -> Result<TripDialog, AppError> {
        self.dialogs
            .read()
            .await
            .get(&dialog_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Dialog {} not found", dialog_id)))
    }

    /// Drop the dialog once it has stayed closed for `CLOSED_DIALOG_TTL`.
    ///
    /// Covers both dismissal and the teardown after a successful submission.
    fn evict_when_closed(&self, dialog_id: Uuid, dialog: &TripDialog) {
        let dialogs = self.dialogs.clone();
        let mut views = dialog.watch();

        tokio::spawn(async move {
            loop {
                let closed = views.wait_for(|view| !view.open).await.map(|_| ());
                if closed.is_err() {
                    return;
                }

                let reopened = async { views.wait_for(|view| view.open).await.map(|_| ()) };
                tokio::select! {
                    _ = tokio::time::sleep(CLOSED_DIALOG_TTL) => {
                        dialogs.write().await.remove(&dialog_id);
                        tracing::debug!(dialog_id = %dialog_id, "Evicted closed trip dialog");
                        return;
                    }
                    result = reopened => {
                        if result.is_err() {
                            return;
                        }
                    }
                }
            }
        });
    }
}
