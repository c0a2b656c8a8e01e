use chrono::NaiveDate;
use serde::Serialize;
use tripcraft_core::TripRequest;

/// JSON body posted to the planning webhook.
///
/// Keys are the form labels; dates are plain `YYYY-MM-DD` with no time or zone.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WebhookPayload {
    #[serde(rename = "Origin")]
    pub origin: String,
    #[serde(rename = "Destination")]
    pub destination: String,
    #[serde(rename = "Departure Date", serialize_with = "iso_date")]
    pub departure_date: NaiveDate,
    #[serde(rename = "Return Date", serialize_with = "iso_date")]
    pub return_date: NaiveDate,
    #[serde(rename = "Activities")]
    pub activities: String,
    #[serde(rename = "Number of Travelers")]
    pub traveler_count: u32,
    #[serde(rename = "Email")]
    pub email: String,
}

fn iso_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&date.format("%Y-%m-%d"))
}

impl From<&TripRequest> for WebhookPayload {
    fn from(request: &TripRequest) -> Self {
        Self {
            origin: request.origin().to_string(),
            destination: request.destination().to_string(),
            departure_date: request.departure_date(),
            return_date: request.return_date(),
            activities: request.activities().to_string(),
            traveler_count: request.traveler_count(),
            email: request.email().to_string(),
        }
    }
}
