// --- File: crates/carebook_booking/src/flow.rs ---
//! Booking submission: identity check, payload, create call, confirmation.

use std::sync::Arc;

use carebook_common::log_error;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::BookingError;
use crate::models::{
    BookingData, BookingPayload, BookingRequest, ConfirmationMail, CreatedBooking, Identity,
    BOOKING_CONFIRMED_MESSAGE,
};
use crate::service::{BookingStore, NotificationService};

/// Wire format of the booking date.
pub const PAYLOAD_DATE_FORMAT: &str = "%Y-%m-%d";

/// Fails with [`BookingError::MissingIdentity`] unless given name, family
/// name and email are all present.
pub fn validate_identity(identity: Option<&Identity>) -> Result<&Identity, BookingError> {
    match identity {
        Some(identity) if identity.is_complete() => Ok(identity),
        _ => Err(BookingError::MissingIdentity),
    }
}

/// Builds the create-booking body. A missing note is sent as an empty string.
pub fn build_payload(identity: &Identity, request: &BookingRequest) -> BookingPayload {
    BookingPayload {
        data: BookingData {
            username: identity.display_name(),
            email: identity.email().unwrap_or_default().to_string(),
            time: request.slot.label(),
            date: request.date.format(PAYLOAD_DATE_FORMAT).to_string(),
            doctor: request.provider_id.clone(),
            note: request.note.clone().unwrap_or_default(),
        },
    }
}

/// Builds the confirmation mail from the stored record, falling back to
/// what was sent when the API left a field out.
pub fn confirmation_mail(
    created: &CreatedBooking,
    sent: &BookingPayload,
    provider_name: Option<&str>,
) -> ConfirmationMail {
    let data = &sent.data;
    ConfirmationMail {
        name: created.username.clone().unwrap_or_else(|| data.username.clone()),
        email: created.email.clone().unwrap_or_else(|| data.email.clone()),
        provider_name: created
            .provider_name
            .clone()
            .or_else(|| provider_name.map(str::to_string))
            .unwrap_or_default(),
        date: created.date.clone().unwrap_or_else(|| data.date.clone()),
        time: created.time.clone().unwrap_or_else(|| data.time.clone()),
        is_appointment: true,
    }
}

/// Result of an accepted booking.
#[derive(Debug)]
pub struct BookingReceipt {
    pub booking: CreatedBooking,
    pub message: &'static str,
    /// The confirmation send, if notifications are configured. Awaiting it
    /// is optional; a failed send is logged and never surfaces here.
    pub notification: Option<JoinHandle<()>>,
}

/// Submits bookings against a [`BookingStore`] and sends confirmations.
#[derive(Clone)]
pub struct BookingFlow {
    store: Arc<dyn BookingStore>,
    notifier: Option<Arc<dyn NotificationService>>,
}

impl BookingFlow {
    pub fn new(
        store: Arc<dyn BookingStore>,
        notifier: Option<Arc<dyn NotificationService>>,
    ) -> Self {
        Self { store, notifier }
    }

    pub fn store(&self) -> &Arc<dyn BookingStore> {
        &self.store
    }

    /// Books `request` for `identity`.
    ///
    /// Nothing is sent when the identity is incomplete. When the create call
    /// fails no confirmation is sent and the error comes back as
    /// [`BookingError::SubmissionFailed`].
    pub async fn submit(
        &self,
        identity: Option<&Identity>,
        request: &BookingRequest,
    ) -> Result<BookingReceipt, BookingError> {
        let identity = validate_identity(identity)?;
        let payload = build_payload(identity, request);

        let created = match self.store.create_booking(payload.clone()).await {
            Ok(created) => created,
            Err(err) => {
                log_error(&err, "Error booking appointment");
                return Err(BookingError::SubmissionFailed(err.to_string()));
            }
        };
        info!(
            "Booked {} {} with provider {}",
            payload.data.date, payload.data.time, request.provider_id
        );

        let notification = self.notifier.as_ref().map(|notifier| {
            let mail = confirmation_mail(&created, &payload, request.provider_name.as_deref());
            spawn_confirmation(Arc::clone(notifier), mail)
        });

        Ok(BookingReceipt {
            booking: created,
            message: BOOKING_CONFIRMED_MESSAGE,
            notification,
        })
    }
}

fn spawn_confirmation(
    notifier: Arc<dyn NotificationService>,
    mail: ConfirmationMail,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let recipient = mail.email.clone();
        if let Err(err) = notifier.send_confirmation(mail).await {
            warn!("Confirmation mail to {} failed: {}", recipient, err);
        }
    })
}
