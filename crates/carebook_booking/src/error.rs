// --- File: crates/carebook_booking/src/error.rs ---
use carebook_common::{external_service_error, validation_error, CarebookError};
use carebook_slots::TimeSlot;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{BOOKING_FAILED_MESSAGE, MISSING_IDENTITY_MESSAGE};

/// Errors raised by the booking API and mail adapters.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The request never produced a response
    #[error("Request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// The remote API answered with a non-success status
    #[error("API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// The response body did not have the expected shape
    #[error("Failed to parse API response: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Why a booking could not be made.
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("{}", MISSING_IDENTITY_MESSAGE)]
    MissingIdentity,

    #[error("Select a date and a time slot before booking")]
    SubmitDisabled,

    #[error("{0} is in the past")]
    PastDate(NaiveDate),

    #[error("{0} is not available")]
    SlotUnavailable(TimeSlot),

    #[error("Booking failed: {0}")]
    SubmissionFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Provider lookup failed: {0}")]
    ProviderLookup(#[from] ServiceError),
}

impl BookingError {
    /// The message shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            BookingError::SubmissionFailed(_) => BOOKING_FAILED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<ServiceError> for CarebookError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(what) => CarebookError::NotFoundError(what),
            other => external_service_error("booking-api", other),
        }
    }
}

impl From<BookingError> for CarebookError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::MissingIdentity => CarebookError::AuthError(err.user_message()),
            BookingError::SubmitDisabled
            | BookingError::PastDate(_)
            | BookingError::SlotUnavailable(_)
            | BookingError::InvalidInput(_) => validation_error(err.user_message()),
            BookingError::SubmissionFailed(_) => CarebookError::ExternalServiceError {
                service_name: "booking-api".to_string(),
                message: err.user_message(),
            },
            BookingError::ProviderLookup(inner) => inner.into(),
        }
    }
}
