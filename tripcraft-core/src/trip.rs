use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Form fields of a trip request, in display order.
///
/// Serialized under the labels the planning webhook expects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TripField {
    #[serde(rename = "Origin")]
    Origin,
    #[serde(rename = "Destination")]
    Destination,
    #[serde(rename = "Departure Date")]
    DepartureDate,
    #[serde(rename = "Return Date")]
    ReturnDate,
    #[serde(rename = "Activities")]
    Activities,
    #[serde(rename = "Number of Travelers")]
    TravelerCount,
    #[serde(rename = "Email")]
    Email,
}

impl TripField {
    pub const ALL: [TripField; 7] = [
        TripField::Origin,
        TripField::Destination,
        TripField::DepartureDate,
        TripField::ReturnDate,
        TripField::Activities,
        TripField::TravelerCount,
        TripField::Email,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TripField::Origin => "Origin",
            TripField::Destination => "Destination",
            TripField::DepartureDate => "Departure Date",
            TripField::ReturnDate => "Return Date",
            TripField::Activities => "Activities",
            TripField::TravelerCount => "Number of Travelers",
            TripField::Email => "Email",
        }
    }
}

impl fmt::Display for TripField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw form state, possibly incomplete. Nothing here has been validated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TripDraft {
    #[serde(rename = "Origin", default)]
    pub origin: String,
    #[serde(rename = "Destination", default)]
    pub destination: String,
    #[serde(rename = "Departure Date", default)]
    pub departure_date: Option<NaiveDate>,
    #[serde(rename = "Return Date", default)]
    pub return_date: Option<NaiveDate>,
    #[serde(rename = "Activities", default)]
    pub activities: String,
    /// Kept as text: number inputs hand over whatever the user typed.
    #[serde(
        rename = "Number of Travelers",
        default = "default_traveler_count",
        deserialize_with = "text_or_number"
    )]
    pub traveler_count: String,
    #[serde(rename = "Email", default)]
    pub email: String,
}

fn default_traveler_count() -> String {
    "1".to_string()
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(s) => s,
        TextOrNumber::Integer(n) => n.to_string(),
        TextOrNumber::Float(n) => n.to_string(),
    })
}

impl Default for TripDraft {
    fn default() -> Self {
        Self {
            origin: String::new(),
            destination: String::new(),
            departure_date: None,
            return_date: None,
            activities: String::new(),
            traveler_count: default_traveler_count(),
            email: String::new(),
        }
    }
}

impl TripDraft {
    /// Apply a single field-level input event
    pub fn apply(&mut self, input: FieldInput) -> TripField {
        let field = input.field();
        match input {
            FieldInput::Origin(v) => self.origin = v,
            FieldInput::Destination(v) => self.destination = v,
            FieldInput::DepartureDate(v) => self.departure_date = v,
            FieldInput::ReturnDate(v) => self.return_date = v,
            FieldInput::Activities(v) => self.activities = v,
            FieldInput::TravelerCount(v) => self.traveler_count = v,
            FieldInput::Email(v) => self.email = v,
        }
        field
    }
}

/// A single edit coming from the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "field", content = "value")]
pub enum FieldInput {
    #[serde(rename = "Origin")]
    Origin(String),
    #[serde(rename = "Destination")]
    Destination(String),
    #[serde(rename = "Departure Date")]
    DepartureDate(Option<NaiveDate>),
    #[serde(rename = "Return Date")]
    ReturnDate(Option<NaiveDate>),
    #[serde(rename = "Activities")]
    Activities(String),
    #[serde(rename = "Number of Travelers", deserialize_with = "text_or_number")]
    TravelerCount(String),
    #[serde(rename = "Email")]
    Email(String),
}

impl FieldInput {
    pub fn field(&self) -> TripField {
        match self {
            FieldInput::Origin(_) => TripField::Origin,
            FieldInput::Destination(_) => TripField::Destination,
            FieldInput::DepartureDate(_) => TripField::DepartureDate,
            FieldInput::ReturnDate(_) => TripField::ReturnDate,
            FieldInput::Activities(_) => TripField::Activities,
            FieldInput::TravelerCount(_) => TripField::TravelerCount,
            FieldInput::Email(_) => TripField::Email,
        }
    }
}

/// A trip request that passed the schema. Only `schema::validate` builds one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripRequest {
    pub(crate) origin: String,
    pub(crate) destination: String,
    pub(crate) departure_date: NaiveDate,
    pub(crate) return_date: NaiveDate,
    pub(crate) activities: String,
    pub(crate) traveler_count: u32,
    pub(crate) email: String,
}

impl TripRequest {
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn departure_date(&self) -> NaiveDate {
        self.departure_date
    }

    pub fn return_date(&self) -> NaiveDate {
        self.return_date
    }

    pub fn activities(&self) -> &str {
        &self.activities
    }

    pub fn traveler_count(&self) -> u32 {
        self.traveler_count
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn nights(&self) -> i64 {
        (self.return_date - self.departure_date).num_days()
    }
}
