// --- File: crates/carebook_booking/src/models.rs ---
use carebook_slots::TimeSlot;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Shown once the booking API accepted the record.
pub const BOOKING_CONFIRMED_MESSAGE: &str = "Booking Confirmation will be sent to your email";
/// Shown when the acting identity lacks a name or an email.
pub const MISSING_IDENTITY_MESSAGE: &str = "User information is not available. Please log in.";
/// Shown when the booking API rejected or never answered the request.
pub const BOOKING_FAILED_MESSAGE: &str = "Booking failed. Please try again.";

const FALLBACK_GIVEN_NAME: &str = "Guest";
const FALLBACK_FAMILY_NAME: &str = "User";

/// The signed-in user as handed over by the identity provider.
///
/// Every field is optional; blank strings count as missing.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Identity {
    pub fn new(
        given_name: impl Into<String>,
        family_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            given_name: Some(given_name.into()),
            family_name: Some(family_name.into()),
            email: Some(email.into()),
        }
    }

    /// `true` if given name, family name and email are all present.
    pub fn is_complete(&self) -> bool {
        present(&self.given_name).is_some()
            && present(&self.family_name).is_some()
            && present(&self.email).is_some()
    }

    /// `"<given> <family>"`, with `Guest` / `User` standing in for missing parts.
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            present(&self.given_name).unwrap_or(FALLBACK_GIVEN_NAME),
            present(&self.family_name).unwrap_or(FALLBACK_FAMILY_NAME)
        )
    }

    pub fn email(&self) -> Option<&str> {
        present(&self.email)
    }
}

/// Everything the flow needs to book one slot, minus the identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub provider_id: String,
    /// Used for the confirmation mail when the API response lacks it.
    pub provider_name: Option<String>,
    pub date: NaiveDate,
    pub slot: TimeSlot,
    pub note: Option<String>,
}

/// Body of the create-booking call: `{ "data": { ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPayload {
    pub data: BookingData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingData {
    #[serde(rename = "Username")]
    pub username: String,
    pub email: String,
    /// Slot label, e.g. `1:30 PM`.
    #[serde(rename = "Time")]
    pub time: String,
    /// `YYYY-MM-DD`.
    #[serde(rename = "Date")]
    pub date: String,
    pub doctor: String,
    #[serde(rename = "Note")]
    pub note: String,
}

/// The record the booking API created, with the provider name denormalised.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedBooking {
    pub id: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub note: Option<String>,
    pub provider_name: Option<String>,
}

/// Request body for the mail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationMail {
    pub name: String,
    pub email: String,
    pub provider_name: String,
    pub date: String,
    pub time: String,
    pub is_appointment: bool,
}
