use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post, put},
    Json, Router,
};
use futures_util::{Stream, StreamExt};
use serde::Serialize;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tripcraft_core::{calendar, CalendarBounds, FieldErrors, FieldInput, TripDraft};
use tripcraft_session::{DialogEvent, DialogView, SubmitOutcome};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct DialogResponse {
    pub dialog_id: Uuid,
    pub view: DialogView,
}

#[derive(Debug, Serialize)]
pub struct DialogDetails {
    pub dialog_id: Uuid,
    pub view: DialogView,
    pub calendar: CalendarBounds,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/dialogs", post(create_dialog))
        .route("/v1/dialogs/{id}", get(get_dialog))
        .route("/v1/dialogs/{id}/open", post(open_dialog))
        .route("/v1/dialogs/{id}/fields", put(set_field))
        .route("/v1/dialogs/{id}/submit", post(submit_trip))
        .route("/v1/dialogs/{id}/dismiss", post(dismiss_dialog))
        .route("/v1/dialogs/{id}/events", get(stream_events))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/dialogs
/// Create a dialog and open its first session
pub async fn create_dialog(State(state): State<AppState>) -> (StatusCode, Json<DialogResponse>) {
    let (dialog_id, dialog) = state.create_dialog().await;
    let view = dialog.view();
    tracing::info!(dialog_id = %dialog_id, session_id = ?view.session_id, "Created trip dialog");

    (
        StatusCode::CREATED,
        Json(DialogResponse { dialog_id, view }),
    )
}

/// GET /v1/dialogs/{id}
pub async fn get_dialog(
    State(state): State<AppState>,
    Path(dialog_id): Path<Uuid>,
) -> Result<Json<DialogDetails>, AppError> {
    let view = state.dialog(dialog_id).await?.view();
    let today = chrono::Local::now().date_naive();

    Ok(Json(DialogDetails {
        dialog_id,
        calendar: CalendarBounds::new(today, view.draft.departure_date),
        view,
    }))
}

/// POST /v1/dialogs/{id}/open
/// Reopen a dismissed dialog; a no-op when already open
pub async fn open_dialog(
    State(state): State<AppState>,
    Path(dialog_id): Path<Uuid>,
) -> Result<Json<DialogResponse>, AppError> {
    let dialog = state.dialog(dialog_id).await?;
    dialog.open();
    Ok(Json(DialogResponse {
        dialog_id,
        view: dialog.view(),
    }))
}

/// PUT /v1/dialogs/{id}/fields
/// Apply one field edit; date edits must pick a day the calendar offers
pub async fn set_field(
    State(state): State<AppState>,
    Path(dialog_id): Path<Uuid>,
    Json(input): Json<FieldInput>,
) -> Result<Json<DialogResponse>, AppError> {
    let dialog = state.dialog(dialog_id).await?;

    let today = chrono::Local::now().date_naive();
    if !calendar::offers(&input, dialog.view().draft.departure_date, today) {
        let mut errors = FieldErrors::new();
        errors.insert(input.field(), "That date is not available.");
        return Err(AppError::Validation(errors));
    }

    dialog.set_field(input)?;
    Ok(Json(DialogResponse {
        dialog_id,
        view: dialog.view(),
    }))
}

/// POST /v1/dialogs/{id}/submit
/// Validate and submit a trip; answers once the submission settles
pub async fn submit_trip(
    State(state): State<AppState>,
    Path(dialog_id): Path<Uuid>,
    Json(draft): Json<TripDraft>,
) -> Result<Json<DialogResponse>, AppError> {
    let dialog = state.dialog(dialog_id).await?;

    // Run detached so a dropped connection cannot strand the session mid-submit
    let outcome = tokio::spawn({
        let dialog = dialog.clone();
        async move { dialog.submit(draft).await }
    })
    .await
    .map_err(|e| AppError::Internal(format!("Submission task failed: {}", e)))??;

    match outcome {
        SubmitOutcome::Accepted => Ok(Json(DialogResponse {
            dialog_id,
            view: dialog.view(),
        })),
        SubmitOutcome::Invalid(errors) => Err(AppError::Validation(errors)),
        SubmitOutcome::Failed(failure) => Err(AppError::Submission(failure)),
        SubmitOutcome::Abandoned => Err(AppError::Gone(format!(
            "Dialog {} was dismissed before the submission settled",
            dialog_id
        ))),
    }
}

/// POST /v1/dialogs/{id}/dismiss
pub async fn dismiss_dialog(
    State(state): State<AppState>,
    Path(dialog_id): Path<Uuid>,
) -> Result<Json<DialogResponse>, AppError> {
    let dialog = state.dialog(dialog_id).await?;
    dialog.dismiss();
    Ok(Json(DialogResponse {
        dialog_id,
        view: dialog.view(),
    }))
}

/// GET /v1/dialogs/{id}/events
/// Server-sent stream of dialog lifecycle events
pub async fn stream_events(
    State(state): State<AppState>,
    Path(dialog_id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, AppError> {
    let dialog = state.dialog(dialog_id).await?;

    let stream = BroadcastStream::new(dialog.events()).filter_map(move |result| async move {
        match result {
            Ok(event) => Some(Event::default().event(event_name(&event)).json_data(&event)),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(dialog_id = %dialog_id, "Event stream lagged, skipped {} events", skipped);
                None
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

fn event_name(event: &DialogEvent) -> &'static str {
    match event {
        DialogEvent::Opened { .. } => "opened",
        DialogEvent::PhaseChanged { .. } => "phase_changed",
        DialogEvent::Notice { .. } => "notice",
        DialogEvent::Closed { .. } => "closed",
    }
}
