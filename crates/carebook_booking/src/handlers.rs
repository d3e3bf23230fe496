// --- File: crates/carebook_booking/src/handlers.rs ---
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use carebook_common::{is_booking_enabled, CarebookError};
use carebook_config::AppConfig;
use carebook_slots::{
    compute_available_slots, is_past_date, parse_calendar_date, slot_statuses, today_in,
    TimeSlot,
};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::error::BookingError;
use crate::flow::{validate_identity, BookingFlow, PAYLOAD_DATE_FORMAT};
use crate::models::{BookingRequest, CreatedBooking, Identity};
use crate::provider::ProviderView;

// Shared state of the booking endpoints
#[derive(Clone)]
pub struct BookingState {
    pub config: Arc<AppConfig>,
    pub flow: BookingFlow,
    /// Zone that decides what "today" is.
    pub time_zone: Tz,
    pub clock: fn() -> DateTime<Utc>,
}

impl BookingState {
    fn today(&self) -> NaiveDate {
        today_in(&self.time_zone, (self.clock)())
    }

    fn is_past(&self, day: NaiveDate) -> bool {
        is_past_date(day, &(self.clock)().with_timezone(&self.time_zone))
    }

    fn ensure_enabled(&self) -> Result<(), CarebookError> {
        if is_booking_enabled(&self.config) {
            Ok(())
        } else {
            Err(CarebookError::UnavailableError(
                "Booking service is disabled.".to_string(),
            ))
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[derive(Debug, Default, Deserialize)]
pub struct SlotsQuery {
    /// Day to list, `YYYY-MM-DD`. Defaults to today.
    pub date: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotView {
    pub time: String,
    pub available: bool,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotsResponse {
    pub provider_id: String,
    pub date: String,
    /// Past days are listed with every slot unavailable.
    pub past: bool,
    pub slots: Vec<SlotView>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRequest {
    #[serde(default)]
    pub identity: Option<Identity>,
    /// `YYYY-MM-DD`
    pub date: String,
    /// Slot label, e.g. `10:30 AM`
    pub time: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookResponse {
    pub success: bool,
    pub message: String,
    pub booking: CreatedBooking,
}

/// Provider detail page: header fields, about paragraphs and the payment stub.
#[axum::debug_handler]
pub async fn get_provider_handler(
    State(state): State<Arc<BookingState>>,
    Path(provider_id): Path<String>,
) -> Result<Json<ProviderView>, CarebookError> {
    state.ensure_enabled()?;
    let provider = state.flow.store().fetch_provider(&provider_id).await?;
    Ok(Json(ProviderView::from(&provider)))
}

/// Slot grid for one provider and day.
#[axum::debug_handler]
pub async fn get_slots_handler(
    State(state): State<Arc<BookingState>>,
    Path(provider_id): Path<String>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, CarebookError> {
    state.ensure_enabled()?;

    let date = match query.date.as_deref() {
        Some(raw) => parse_calendar_date(raw)
            .map_err(|e| BookingError::InvalidInput(e.to_string()))?,
        None => state.today(),
    };
    let provider = state.flow.store().fetch_provider(&provider_id).await?;
    let past = state.is_past(date);

    let slots = slot_statuses(date, &provider.appointments)
        .into_iter()
        .map(|status| SlotView {
            time: status.slot.label(),
            available: status.available && !past,
        })
        .collect();

    Ok(Json(SlotsResponse {
        provider_id: provider.id,
        date: date.format(PAYLOAD_DATE_FORMAT).to_string(),
        past,
        slots,
    }))
}

/// Books a slot for the identity in the request body.
///
/// The identity is checked before anything else, the slot against the
/// provider's current appointments.
#[axum::debug_handler]
pub async fn book_handler(
    State(state): State<Arc<BookingState>>,
    Path(provider_id): Path<String>,
    Json(payload): Json<BookRequest>,
) -> Result<Json<BookResponse>, CarebookError> {
    state.ensure_enabled()?;
    let identity = validate_identity(payload.identity.as_ref())?;

    let date = parse_calendar_date(&payload.date)
        .map_err(|e| BookingError::InvalidInput(e.to_string()))?;
    let slot = TimeSlot::parse(&payload.time)
        .map_err(|e| BookingError::InvalidInput(e.to_string()))?;
    if state.is_past(date) {
        return Err(BookingError::PastDate(date).into());
    }

    let provider = state
        .flow
        .store()
        .fetch_provider(&provider_id)
        .await
        .map_err(BookingError::from)?;
    let available = compute_available_slots(date, &provider.appointments);
    if !available.contains(&slot) {
        info!("Rejected booking of taken slot {} on {}", slot, date);
        return Err(BookingError::SlotUnavailable(slot).into());
    }

    let request = BookingRequest {
        provider_id: provider.id.clone(),
        provider_name: Some(provider.name.clone()),
        date,
        slot,
        note: payload.note.clone(),
    };
    let receipt = state.flow.submit(Some(identity), &request).await?;

    Ok(Json(BookResponse {
        success: true,
        message: receipt.message.to_string(),
        booking: receipt.booking,
    }))
}
