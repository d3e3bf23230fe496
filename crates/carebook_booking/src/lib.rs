// --- File: crates/carebook_booking/src/lib.rs ---
pub mod dialog;
#[cfg(test)]
mod dialog_test;
pub mod doc;
pub mod error;
pub mod flow;
pub mod handlers;
pub mod models;
pub mod provider;
pub mod routes;
pub mod service;

pub use dialog::{BookingDialog, BookingDraft, PendingSubmission, SubmissionPhase};
pub use error::{BookingError, ServiceError};
pub use flow::{build_payload, confirmation_mail, validate_identity, BookingFlow, BookingReceipt};
pub use models::{
    BookingPayload, BookingRequest, ConfirmationMail, CreatedBooking, Identity,
    BOOKING_CONFIRMED_MESSAGE, BOOKING_FAILED_MESSAGE, MISSING_IDENTITY_MESSAGE,
};
pub use provider::{render_about, AboutContent, PaymentStub, ProviderDetail, ProviderView};
pub use routes::{booking_state, router, routes};
pub use service::{BookingStore, HttpBookingStore, HttpNotificationService, NotificationService};
