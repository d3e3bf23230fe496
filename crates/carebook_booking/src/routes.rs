// --- File: crates/carebook_booking/src/routes.rs ---

use axum::{
    routing::{get, post},
    Router,
};
use carebook_common::{config_error, is_notifications_enabled, CarebookError};
use carebook_config::AppConfig;
use carebook_slots::parse_time_zone;
use chrono::Utc;
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::info;

use crate::flow::BookingFlow;
use crate::handlers::{book_handler, get_provider_handler, get_slots_handler, BookingState};
use crate::service::{BookingStore, HttpBookingStore, HttpNotificationService, NotificationService};

/// Builds the booking state from the runtime configuration, wiring the HTTP
/// store and, when enabled, the mail notifier.
pub fn booking_state(config: Arc<AppConfig>) -> Result<BookingState, CarebookError> {
    let booking_config = config
        .booking
        .as_ref()
        .ok_or_else(|| config_error("booking section missing"))?;

    let time_zone = match booking_config.time_zone.as_deref() {
        Some(name) => parse_time_zone(name).map_err(config_error)?,
        None => Tz::UTC,
    };

    let store: Arc<dyn BookingStore> = Arc::new(HttpBookingStore::from_config(booking_config)?);
    let notifier: Option<Arc<dyn NotificationService>> = if is_notifications_enabled(&config) {
        Some(Arc::new(HttpNotificationService::from_config(booking_config)))
    } else {
        info!("Confirmation mails are disabled.");
        None
    };

    Ok(BookingState {
        flow: BookingFlow::new(store, notifier),
        config,
        time_zone,
        clock: Utc::now,
    })
}

/// Router for the booking endpoints, to be nested under `/api`.
pub fn router(state: BookingState) -> Router {
    Router::new()
        .route("/providers/{provider_id}", get(get_provider_handler))
        .route("/providers/{provider_id}/slots", get(get_slots_handler))
        .route("/providers/{provider_id}/book", post(book_handler))
        .with_state(Arc::new(state))
}

/// Creates a router containing all booking routes.
pub fn routes(config: Arc<AppConfig>) -> Result<Router, CarebookError> {
    Ok(router(booking_state(config)?))
}
