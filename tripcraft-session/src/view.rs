use serde::Serialize;
use tripcraft_core::{FieldErrors, TripDraft};
use tripcraft_gateway::SubmissionFailed;
use uuid::Uuid;

use crate::session::{Phase, SubmissionSession};

/// Full-screen overlay shown over the page while a trip is being planned
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Overlay {
    Hidden,
    Planning,
    Success,
}

impl Overlay {
    pub fn for_phase(phase: Phase) -> Self {
        match phase {
            Phase::Submitting => Overlay::Planning,
            Phase::Success => Overlay::Success,
            Phase::Idle | Phase::Validating | Phase::Error => Overlay::Hidden,
        }
    }

    pub fn headline(self) -> Option<&'static str> {
        match self {
            Overlay::Hidden => None,
            Overlay::Planning => Some("Planning your dream trip..."),
            Overlay::Success => Some("Success! Finalizing your itinerary..."),
        }
    }

    pub fn detail(self) -> Option<&'static str> {
        match self {
            Overlay::Planning => {
                Some("This takes ~10 seconds as we analyze flights, hotels, and activities.")
            }
            Overlay::Hidden | Overlay::Success => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OverlayView {
    pub kind: Overlay,
    pub visible: bool,
    pub headline: Option<&'static str>,
    pub detail: Option<&'static str>,
}

impl From<Overlay> for OverlayView {
    fn from(kind: Overlay) -> Self {
        Self {
            kind,
            visible: kind != Overlay::Hidden,
            headline: kind.headline(),
            detail: kind.detail(),
        }
    }
}

/// The dialog's submit button
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PrimaryAction {
    pub label: &'static str,
    pub disabled: bool,
    pub spinner: bool,
    pub confirmed: bool,
}

impl PrimaryAction {
    pub fn for_phase(phase: Phase) -> Self {
        match phase {
            Phase::Validating | Phase::Submitting => Self {
                label: "Planning...",
                disabled: true,
                spinner: true,
                confirmed: false,
            },
            Phase::Success => Self {
                label: "Success",
                disabled: true,
                spinner: false,
                confirmed: true,
            },
            Phase::Idle | Phase::Error => Self {
                label: "Craft My Itinerary",
                disabled: false,
                spinner: false,
                confirmed: false,
            },
        }
    }
}

/// Everything a presentation shell needs to render the trip dialog.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DialogView {
    pub open: bool,
    pub session_id: Option<Uuid>,
    pub phase: Phase,
    pub is_submitting: bool,
    pub overlay: OverlayView,
    pub primary_action: PrimaryAction,
    pub field_errors: FieldErrors,
    pub draft: TripDraft,
    pub last_error: Option<SubmissionFailed>,
}

impl DialogView {
    pub fn render(
        session: Option<&SubmissionSession>,
        draft: &TripDraft,
        field_errors: &FieldErrors,
    ) -> Self {
        let phase = session.map(SubmissionSession::phase).unwrap_or_default();
        Self {
            open: session.is_some(),
            session_id: session.map(SubmissionSession::id),
            phase,
            is_submitting: phase.is_submitting(),
            overlay: Overlay::for_phase(phase).into(),
            primary_action: PrimaryAction::for_phase(phase),
            field_errors: field_errors.clone(),
            draft: draft.clone(),
            last_error: session.and_then(|s| s.last_error().cloned()),
        }
    }

    pub fn closed() -> Self {
        Self::render(None, &TripDraft::default(), &FieldErrors::new())
    }
}
