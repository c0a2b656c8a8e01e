//! Date-picker pre-filter.
//!
//! These checks only decide which days a calendar offers. The schema stays
//! authoritative for what gets submitted.

use chrono::NaiveDate;
use serde::Serialize;

use crate::trip::FieldInput;

/// Departure can be any day from today on.
pub fn departure_selectable(date: NaiveDate, today: NaiveDate) -> bool {
    date >= today
}

/// Return must not precede the chosen departure, or today when none is chosen yet.
pub fn return_selectable(date: NaiveDate, departure: Option<NaiveDate>, today: NaiveDate) -> bool {
    date >= departure.unwrap_or(today)
}

/// Whether a calendar would offer the day picked by a date edit.
///
/// Clearing a date and non-date edits always pass.
pub fn offers(input: &FieldInput, departure: Option<NaiveDate>, today: NaiveDate) -> bool {
    match input {
        FieldInput::DepartureDate(Some(date)) => departure_selectable(*date, today),
        FieldInput::ReturnDate(Some(date)) => return_selectable(*date, departure, today),
        _ => true,
    }
}

/// Earliest selectable day for each date picker.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CalendarBounds {
    pub departure_from: NaiveDate,
    pub return_from: NaiveDate,
}

impl CalendarBounds {
    pub fn new(today: NaiveDate, departure: Option<NaiveDate>) -> Self {
        Self {
            departure_from: today,
            return_from: departure.unwrap_or(today),
        }
    }
}
