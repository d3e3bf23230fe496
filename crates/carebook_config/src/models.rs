// --- File: crates/carebook_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Booking Config ---
// Holds the collaborator endpoints. The API token is a secret and is usually
// injected via CAREBOOK__BOOKING__API_TOKEN or the "secret_from_env" marker.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BookingConfig {
    /// Base URL of the content API holding providers and appointments.
    pub api_base_url: String, // Mandatory
    #[serde(default)]
    pub api_token: Option<String>,
    /// Endpoint receiving the confirmation mail request.
    pub mail_endpoint: String, // Mandatory
    /// IANA zone the clinic operates in, used to decide what "today" is.
    #[serde(default)]
    pub time_zone: Option<String>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_booking: bool,
    #[serde(default)]
    pub use_notifications: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub booking: Option<BookingConfig>,
}
