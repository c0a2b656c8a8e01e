use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use tripcraft_core::{validate, FieldErrors, FieldInput, TripDraft};
use tripcraft_gateway::{SubmissionFailed, TripGateway};
use uuid::Uuid;

use crate::guard::MinimumDurationGuard;
use crate::history::{self, NavigationHistory, NoHistory};
use crate::notice::{Notice, Notifier, TracingNotifier};
use crate::session::{Phase, SessionError, SubmissionSession, Transition};
use crate::view::DialogView;

/// How long the success state stays on screen before the dialog resets.
pub const SUCCESS_DWELL: Duration = Duration::from_millis(1200);

const EVENT_BUFFER: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialogError {
    #[error("Trip dialog is closed")]
    Closed,

    #[error("Trip dialog is busy ({phase})")]
    Busy { phase: Phase },

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// How a call to [`TripDialog::submit`] ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Gateway accepted the request; the dialog resets after the dwell
    Accepted,
    /// Schema rejected the draft; nothing was sent
    Invalid(FieldErrors),
    /// Gateway failed; the draft is kept for another try
    Failed(SubmissionFailed),
    /// Dialog was dismissed before the gateway answered; the answer was dropped
    Abandoned,
}

/// Published on every lifecycle step of a dialog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogEvent {
    Opened {
        session_id: Uuid,
    },
    PhaseChanged {
        session_id: Uuid,
        from: Phase,
        to: Phase,
        elapsed_ms: Option<u64>,
    },
    Notice {
        session_id: Uuid,
        notice: Notice,
    },
    Closed {
        session_id: Uuid,
    },
}

#[derive(Debug, Default)]
struct Form {
    draft: TripDraft,
    errors: FieldErrors,
}

#[derive(Debug, Default)]
struct DialogState {
    session: Option<SubmissionSession>,
    form: Form,
}

impl DialogState {
    fn view(&self) -> DialogView {
        DialogView::render(self.session.as_ref(), &self.form.draft, &self.form.errors)
    }
}

struct Inner {
    gateway: Arc<dyn TripGateway>,
    notifier: Arc<dyn Notifier>,
    history: Arc<dyn NavigationHistory>,
    guard: MinimumDurationGuard,
    dwell: Duration,
    state: Mutex<DialogState>,
    view_tx: watch::Sender<DialogView>,
    event_tx: broadcast::Sender<DialogEvent>,
}

/// The trip-request dialog: owns at most one submission session at a time.
///
/// Cloning yields another handle to the same dialog.
#[derive(Clone)]
pub struct TripDialog {
    inner: Arc<Inner>,
}

pub struct TripDialogBuilder {
    gateway: Arc<dyn TripGateway>,
    notifier: Arc<dyn Notifier>,
    history: Arc<dyn NavigationHistory>,
    guard: MinimumDurationGuard,
    dwell: Duration,
}

impl TripDialogBuilder {
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn history(mut self, history: Arc<dyn NavigationHistory>) -> Self {
        self.history = history;
        self
    }

    pub fn guard(mut self, guard: MinimumDurationGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn dwell(mut self, dwell: Duration) -> Self {
        self.dwell = dwell;
        self
    }

    pub fn build(self) -> TripDialog {
        let (view_tx, _) = watch::channel(DialogView::closed());
        let (event_tx, _) = broadcast::channel(EVENT_BUFFER);
        TripDialog {
            inner: Arc::new(Inner {
                gateway: self.gateway,
                notifier: self.notifier,
                history: self.history,
                guard: self.guard,
                dwell: self.dwell,
                state: Mutex::new(DialogState::default()),
                view_tx,
                event_tx,
            }),
        }
    }
}

impl TripDialog {
    pub fn builder(gateway: Arc<dyn TripGateway>) -> TripDialogBuilder {
        TripDialogBuilder {
            gateway,
            notifier: Arc::new(TracingNotifier),
            history: Arc::new(NoHistory),
            guard: MinimumDurationGuard::default(),
            dwell: SUCCESS_DWELL,
        }
    }

    pub fn new(gateway: Arc<dyn TripGateway>) -> Self {
        Self::builder(gateway).build()
    }

    /// Open the dialog, creating a fresh session if none is active
    pub fn open(&self) -> Uuid {
        let (session_id, created) = self.with_state(|state| match &state.session {
            Some(session) => (session.id(), false),
            None => {
                let session = SubmissionSession::new();
                let id = session.id();
                state.session = Some(session);
                (id, true)
            }
        });

        if created {
            info!(session_id = %session_id, "Trip dialog opened");
            self.emit(DialogEvent::Opened { session_id });
        }
        session_id
    }

    /// Close the dialog and tear the session down.
    ///
    /// An in-flight submission is not cancelled; its result is ignored.
    pub fn dismiss(&self) {
        let closed = self.with_state(|state| {
            let session = state.session.take()?;
            state.form = Form::default();
            Some((session.id(), session.phase()))
        });

        if let Some((session_id, phase)) = closed {
            if phase == Phase::Submitting {
                info!(session_id = %session_id, "Trip dialog dismissed mid-submission, result will be ignored");
            } else {
                debug!(session_id = %session_id, "Trip dialog dismissed");
            }
            self.emit(DialogEvent::Closed { session_id });
        }
    }

    /// Apply one field edit and clear that field's error
    pub fn set_field(&self, input: FieldInput) -> Result<(), DialogError> {
        self.with_state(|state| -> Result<(), DialogError> {
            let phase = state.session.as_ref().ok_or(DialogError::Closed)?.phase();
            if phase.form_locked() {
                return Err(DialogError::Busy { phase });
            }
            let field = state.form.draft.apply(input);
            state.form.errors.remove(field);
            Ok(())
        })
    }

    /// Validate and submit a draft.
    ///
    /// Resolves once the session reaches `Success` or `Error`, or straight
    /// back to `Idle` when the draft is invalid. A successful submission is
    /// never reported before the guard's floor has passed.
    pub async fn submit(&self, draft: TripDraft) -> Result<SubmitOutcome, DialogError> {
        let (session_id, transition) = self.with_state(|state| -> Result<_, DialogError> {
            let session = state.session.as_mut().ok_or(DialogError::Closed)?;
            let phase = session.phase();
            if !phase.accepts_submit() {
                return Err(DialogError::Busy { phase });
            }
            let transition = session.begin_validation()?;
            let session_id = session.id();
            state.form = Form {
                draft: draft.clone(),
                errors: FieldErrors::new(),
            };
            Ok((session_id, transition))
        })?;
        self.announce(session_id, transition);

        let request = match validate(&draft) {
            Ok(request) => request,
            Err(errors) => {
                debug!(session_id = %session_id, "Trip draft failed validation on {} field(s)", errors.len());
                let surfaced = errors.clone();
                self.advance(session_id, move |session, form| {
                    form.errors = surfaced;
                    session.reject()
                })?;
                return Ok(SubmitOutcome::Invalid(errors));
            }
        };

        if self
            .advance(session_id, |session, _| session.begin_submitting(Instant::now()))?
            .is_none()
        {
            return Ok(self.abandoned(session_id));
        }
        history::best_effort(self.inner.history.as_ref());

        info!(
            session_id = %session_id,
            "Submitting trip to {}, planning for at least {:?}",
            request.destination(),
            self.inner.guard.floor()
        );
        let result = self
            .inner
            .guard
            .enforce(self.inner.gateway.submit(&request))
            .await;

        match result {
            Ok(()) => {
                let settled = self.advance(session_id, |session, _| session.succeed(Instant::now()))?;
                if settled.is_none() {
                    return Ok(self.abandoned(session_id));
                }
                self.notify(session_id, Notice::planning_started());
                self.schedule_teardown(session_id);
                Ok(SubmitOutcome::Accepted)
            }
            Err(error) => {
                let failure = error.clone();
                let settled = self.advance(session_id, move |session, _| {
                    session.fail(failure, Instant::now())
                })?;
                if settled.is_none() {
                    return Ok(self.abandoned(session_id));
                }
                warn!(session_id = %session_id, "Trip submission failed: {}", error);
                self.notify(session_id, Notice::submission_failed());
                Ok(SubmitOutcome::Failed(error))
            }
        }
    }

    pub fn view(&self) -> DialogView {
        self.inner.view_tx.borrow().clone()
    }

    pub fn phase(&self) -> Phase {
        self.inner.view_tx.borrow().phase
    }

    /// Latest view, updated after every change
    pub fn watch(&self) -> watch::Receiver<DialogView> {
        self.inner.view_tx.subscribe()
    }

    /// Every lifecycle event from now on, in order
    pub fn events(&self) -> broadcast::Receiver<DialogEvent> {
        self.inner.event_tx.subscribe()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut DialogState) -> R) -> R {
        let mut state = self
            .inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let result = f(&mut state);
        self.inner.view_tx.send_replace(state.view());
        result
    }

    /// Step the session, but only while it is still the dialog's live session
    fn advance<F>(&self, session_id: Uuid, step: F) -> Result<Option<Transition>, SessionError>
    where
        F: FnOnce(&mut SubmissionSession, &mut Form) -> Result<Transition, SessionError>,
    {
        let transition = self.with_state(|state| match state.session.as_mut() {
            Some(session) if session.id() == session_id => step(session, &mut state.form).map(Some),
            _ => Ok(None),
        })?;

        if let Some(transition) = transition {
            self.announce(session_id, transition);
        }
        Ok(transition)
    }

    fn schedule_teardown(&self, session_id: Uuid) {
        let dialog = self.clone();
        let dwell = self.inner.dwell;
        tokio::spawn(async move {
            tokio::time::sleep(dwell).await;
            dialog.finish(session_id);
        });
    }

    /// Success → Idle: close the dialog and clear the form
    fn finish(&self, session_id: Uuid) {
        let transition = self.with_state(|state| {
            let session = state
                .session
                .as_mut()
                .filter(|session| session.id() == session_id)?;
            let transition = session.complete().ok()?;
            state.session = None;
            state.form = Form::default();
            Some(transition)
        });

        match transition {
            Some(transition) => {
                self.announce(session_id, transition);
                info!(session_id = %session_id, "Trip dialog closed after success");
                self.emit(DialogEvent::Closed { session_id });
            }
            None => debug!(session_id = %session_id, "Skipping teardown for a session that already ended"),
        }
    }

    fn abandoned(&self, session_id: Uuid) -> SubmitOutcome {
        info!(session_id = %session_id, "Dropping result for a dismissed trip dialog");
        SubmitOutcome::Abandoned
    }

    fn notify(&self, session_id: Uuid, notice: Notice) {
        self.inner.notifier.notify(&notice);
        self.emit(DialogEvent::Notice { session_id, notice });
    }

    fn announce(&self, session_id: Uuid, transition: Transition) {
        let elapsed_ms = transition.elapsed.map(|d| d.as_millis() as u64);
        debug!(
            session_id = %session_id,
            "Trip dialog {} -> {}{}",
            transition.from,
            transition.to,
            elapsed_ms.map(|ms| format!(" after {}ms", ms)).unwrap_or_default()
        );
        self.emit(DialogEvent::PhaseChanged {
            session_id,
            from: transition.from,
            to: transition.to,
            elapsed_ms,
        });
    }

    fn emit(&self, event: DialogEvent) {
        // No subscribers is fine
        let _ = self.inner.event_tx.send(event);
    }
}
