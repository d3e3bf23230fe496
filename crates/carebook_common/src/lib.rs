// --- File: crates/carebook_common/src/lib.rs ---

// Declare modules within this crate
pub mod error;     // Error handling
pub mod features;  // Runtime feature flags
pub mod http;      // HTTP utilities
pub mod logging;   // Logging utilities
pub mod services;  // Service abstractions

// Re-export error types and utilities for easier access
pub use error::{
    CarebookError,
    HttpStatusCode,
    Context,
    config_error,
    validation_error,
    external_service_error,
};

// Re-export HTTP utilities for easier access
pub use http::{
    IntoHttpResponse,
    client::{
        HTTP_CLIENT,
        create_client,
        post,
    },
};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level, log_error, log_result};

pub use features::{is_booking_enabled, is_notifications_enabled};

// This crate provides common functionality used by the Carebook crates:
// error handling, logging, HTTP helpers and the boxed-future service plumbing.
