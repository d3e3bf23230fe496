//! Runtime feature flags for the Carebook application.
//!
//! A feature is enabled when its `use_*` flag is set in the configuration
//! and its configuration section is present.
//!
//! - `use_booking` + `booking`: availability and booking endpoints
//! - `use_notifications` + `booking`: confirmation mails after a booking

use carebook_config::AppConfig;

/// Check if a feature is enabled at runtime based on configuration.
pub fn is_feature_enabled<T>(use_feature: bool, feature_config: Option<&T>) -> bool {
    use_feature && feature_config.is_some()
}

/// `true` if the booking endpoints should be served.
pub fn is_booking_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_booking, config.booking.as_ref())
}

/// `true` if confirmation mails should be sent after a successful booking.
pub fn is_notifications_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_notifications, config.booking.as_ref())
}
