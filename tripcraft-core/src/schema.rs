use crate::trip::{TripDraft, TripField, TripRequest};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::num::IntErrorKind;
use validator::ValidateEmail;

pub const MIN_PLACE_CHARS: usize = 2;
pub const MIN_ACTIVITIES_CHARS: usize = 3;
pub const MIN_TRAVELERS: i64 = 1;

const WHOLE_TRAVELERS: &str = "Number of travelers must be a whole number.";
const TOO_FEW_TRAVELERS: &str = "Must have at least 1 traveler.";
const TOO_MANY_TRAVELERS: &str = "Number of travelers is too large.";

/// Per-field validation failures, keyed by field in display order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, thiserror::Error)]
#[serde(transparent)]
#[error("{} field(s) failed validation", .0.len())]
pub struct FieldErrors(BTreeMap<TripField, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: TripField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: TripField) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn get(&self, field: TripField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: TripField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = TripField> + '_ {
        self.0.keys().copied()
    }
}

/// Validate a draft against the trip-request rules.
///
/// Every field is checked independently and all failures are reported
/// together. The return-date ordering rule runs whenever both dates are
/// present and reports on the return date.
pub fn validate(draft: &TripDraft) -> Result<TripRequest, FieldErrors> {
    let mut errors = FieldErrors::new();

    let origin = draft.origin.trim();
    if origin.chars().count() < MIN_PLACE_CHARS {
        errors.insert(TripField::Origin, "Origin must be at least 2 characters.");
    }

    let destination = draft.destination.trim();
    if destination.chars().count() < MIN_PLACE_CHARS {
        errors.insert(
            TripField::Destination,
            "Destination must be at least 2 characters.",
        );
    }

    if draft.departure_date.is_none() {
        errors.insert(TripField::DepartureDate, "Departure date is required.");
    }
    if draft.return_date.is_none() {
        errors.insert(TripField::ReturnDate, "Return date is required.");
    }
    if let (Some(departure), Some(ret)) = (draft.departure_date, draft.return_date) {
        if ret < departure {
            errors.insert(
                TripField::ReturnDate,
                "Return date cannot be before departure date.",
            );
        }
    }

    let activities = draft.activities.trim();
    if activities.chars().count() < MIN_ACTIVITIES_CHARS {
        errors.insert(TripField::Activities, "Describe desired activities.");
    }

    let traveler_count = match coerce_traveler_count(&draft.traveler_count) {
        Ok(count) => Some(count),
        Err(message) => {
            errors.insert(TripField::TravelerCount, message);
            None
        }
    };

    let email = draft.email.trim().to_string();
    if !email.validate_email() || !has_dotted_domain(&email) {
        errors.insert(TripField::Email, "Please enter a valid email address.");
    }

    match (draft.departure_date, draft.return_date, traveler_count) {
        (Some(departure_date), Some(return_date), Some(traveler_count)) if errors.is_empty() => {
            Ok(TripRequest {
                origin: origin.to_string(),
                destination: destination.to_string(),
                departure_date,
                return_date,
                activities: activities.to_string(),
                traveler_count,
                email,
            })
        }
        _ => Err(errors),
    }
}

/// Empty input counts as zero travelers.
fn coerce_traveler_count(raw: &str) -> Result<u32, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(TOO_FEW_TRAVELERS);
    }
    let count: i64 = raw.parse().map_err(|e: std::num::ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow => TOO_MANY_TRAVELERS,
        IntErrorKind::NegOverflow => TOO_FEW_TRAVELERS,
        _ => WHOLE_TRAVELERS,
    })?;
    if count < MIN_TRAVELERS {
        return Err(TOO_FEW_TRAVELERS);
    }
    u32::try_from(count).map_err(|_| TOO_MANY_TRAVELERS)
}

/// The domain needs at least one dot with a label on both sides.
fn has_dotted_domain(email: &str) -> bool {
    let Some((_, domain)) = email.rsplit_once('@') else {
        return false;
    };
    matches!(domain.rsplit_once('.'), Some((head, tld)) if !head.is_empty() && !tld.is_empty())
}
