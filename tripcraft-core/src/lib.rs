pub mod trip;
pub mod schema;
pub mod calendar;

pub use trip::{FieldInput, TripDraft, TripField, TripRequest};
pub use schema::{validate, FieldErrors};
pub use calendar::CalendarBounds;
