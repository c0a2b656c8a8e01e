use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tripcraft_gateway::SubmissionFailed;
use uuid::Uuid;

/// Where a submission session is in its lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    #[default]
    Idle,
    Validating,
    Submitting,
    Success,
    Error,
}

impl Phase {
    /// Primary action shows a spinner and is disabled
    pub fn is_submitting(self) -> bool {
        matches!(self, Phase::Validating | Phase::Submitting)
    }

    /// A new submit may start from here
    pub fn accepts_submit(self) -> bool {
        matches!(self, Phase::Idle | Phase::Error)
    }

    /// Form inputs are read-only
    pub fn form_locked(self) -> bool {
        matches!(self, Phase::Validating | Phase::Submitting | Phase::Success)
    }

    fn can_transition_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Idle | Phase::Error, Phase::Validating)
                | (Phase::Validating, Phase::Idle)
                | (Phase::Validating, Phase::Submitting)
                | (Phase::Submitting, Phase::Success)
                | (Phase::Submitting, Phase::Error)
                | (Phase::Success, Phase::Idle)
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Idle => "IDLE",
            Phase::Validating => "VALIDATING",
            Phase::Submitting => "SUBMITTING",
            Phase::Success => "SUCCESS",
            Phase::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// A completed phase change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
    /// Time spent submitting, set when leaving `Submitting`
    pub elapsed: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid session transition from {from} to {to}")]
    InvalidTransition { from: Phase, to: Phase },
}

/// One attempt cycle, from dialog open to reset.
#[derive(Debug, Clone)]
pub struct SubmissionSession {
    id: Uuid,
    phase: Phase,
    opened_at: Option<Instant>,
    last_error: Option<SubmissionFailed>,
}

impl SubmissionSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: Phase::Idle,
            opened_at: None,
            last_error: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// When the current submission started, if one has
    pub fn opened_at(&self) -> Option<Instant> {
        self.opened_at
    }

    pub fn last_error(&self) -> Option<&SubmissionFailed> {
        self.last_error.as_ref()
    }

    /// Idle | Error → Validating
    pub fn begin_validation(&mut self) -> Result<Transition, SessionError> {
        let transition = self.transition(Phase::Validating)?;
        self.last_error = None;
        Ok(transition)
    }

    /// Validating → Idle
    pub fn reject(&mut self) -> Result<Transition, SessionError> {
        self.transition(Phase::Idle)
    }

    /// Validating → Submitting
    pub fn begin_submitting(&mut self, now: Instant) -> Result<Transition, SessionError> {
        let transition = self.transition(Phase::Submitting)?;
        self.opened_at = Some(now);
        Ok(transition)
    }

    /// Submitting → Success
    pub fn succeed(&mut self, now: Instant) -> Result<Transition, SessionError> {
        let mut transition = self.transition(Phase::Success)?;
        transition.elapsed = self.opened_at.map(|start| now.saturating_duration_since(start));
        Ok(transition)
    }

    /// Submitting → Error
    pub fn fail(&mut self, error: SubmissionFailed, now: Instant) -> Result<Transition, SessionError> {
        let mut transition = self.transition(Phase::Error)?;
        transition.elapsed = self.opened_at.map(|start| now.saturating_duration_since(start));
        self.last_error = Some(error);
        Ok(transition)
    }

    /// Success → Idle, once the dwell is over
    pub fn complete(&mut self) -> Result<Transition, SessionError> {
        self.transition(Phase::Idle)
    }

    fn transition(&mut self, next: Phase) -> Result<Transition, SessionError> {
        if !self.phase.can_transition_to(next) {
            return Err(SessionError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        let from = self.phase;
        self.phase = next;
        Ok(Transition {
            from,
            to: next,
            elapsed: None,
        })
    }
}

impl Default for SubmissionSession {
    fn default() -> Self {
        Self::new()
    }
}
