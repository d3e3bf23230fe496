// File: crates/carebook_booking/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::{BookRequest, BookResponse, SlotView, SlotsQuery, SlotsResponse};
use crate::models::{CreatedBooking, Identity};
use crate::provider::{PaymentStub, ProviderView};

#[utoipa::path(
    get,
    path = "/providers/{provider_id}",
    params(
        ("provider_id" = String, Path, description = "Provider to show", example = "3")
    ),
    responses(
        (status = 200, description = "Provider detail with rendered about text and payment stub", body = ProviderView,
         example = json!({
             "id": "3",
             "name": "Dr. Anil Kumar",
             "open_time": "10:00 AM",
             "address": "12 MG Road",
             "category": "Cardiologist",
             "image_url": null,
             "about": ["Kind and calm."],
             "payment": { "label": "Proceed to Pay ₹650", "amount": 650.0, "enabled": false }
         })
        ),
        (status = 404, description = "Provider not found"),
        (status = 503, description = "Booking service disabled")
    ),
    tag = "Booking"
)]
fn doc_get_provider_handler() {}

#[utoipa::path(
    get,
    path = "/providers/{provider_id}/slots",
    params(
        ("provider_id" = String, Path, description = "Provider to list slots for", example = "3"),
        SlotsQuery
    ),
    responses(
        (status = 200, description = "Slot grid for the day", body = SlotsResponse,
         example = json!({
             "provider_id": "3",
             "date": "2025-05-15",
             "past": false,
             "slots": [
                 { "time": "10:00 AM", "available": false },
                 { "time": "10:30 AM", "available": true }
             ]
         })
        ),
        (status = 400, description = "Invalid date"),
        (status = 404, description = "Provider not found")
    ),
    tag = "Booking"
)]
fn doc_get_slots_handler() {}

#[utoipa::path(
    post,
    path = "/providers/{provider_id}/book",
    params(
        ("provider_id" = String, Path, description = "Provider to book", example = "3")
    ),
    request_body(content = BookRequest, example = json!({
        "identity": { "given_name": "Asha", "family_name": "Rao", "email": "asha@example.com" },
        "date": "2025-05-15",
        "time": "1:30 PM",
        "note": "First visit"
    })),
    responses(
        (status = 200, description = "Booking created", body = BookResponse,
         example = json!({
             "success": true,
             "message": "Booking Confirmation will be sent to your email",
             "booking": { "id": "41", "username": "Asha Rao", "date": "2025-05-15", "time": "1:30 PM" }
         })
        ),
        (status = 400, description = "Past date, taken slot or malformed input"),
        (status = 401, description = "User information is not available. Please log in."),
        (status = 502, description = "Booking failed. Please try again.")
    ),
    tag = "Booking"
)]
fn doc_book_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_get_provider_handler, doc_get_slots_handler, doc_book_handler),
    components(
        schemas(
            ProviderView,
            PaymentStub,
            SlotsResponse,
            SlotView,
            BookRequest,
            BookResponse,
            CreatedBooking,
            Identity
        )
    ),
    tags(
        (name = "Booking", description = "Provider detail, slot availability and booking")
    ),
    servers(
        (url = "/api", description = "Carebook API server")
    )
)]
pub struct BookingApiDoc;
