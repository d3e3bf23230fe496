// --- File: crates/carebook_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type shared by all Carebook crates.
///
/// Each crate keeps its own error enum and implements
/// `From<SpecificError> for CarebookError` at the HTTP boundary.
#[derive(Error, Debug)]
pub enum CarebookError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The acting identity is missing or incomplete
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// A feature is switched off in the runtime configuration
    #[error("Service unavailable: {0}")]
    UnavailableError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for CarebookError {
    fn status_code(&self) -> u16 {
        match self {
            CarebookError::HttpError(_) => 500,
            CarebookError::ParseError(_) => 400,
            CarebookError::ConfigError(_) => 500,
            CarebookError::AuthError(_) => 401,
            CarebookError::ValidationError(_) => 400,
            CarebookError::ExternalServiceError { .. } => 502,
            CarebookError::NotFoundError(_) => 404,
            CarebookError::UnavailableError(_) => 503,
            CarebookError::InternalError(_) => 500,
        }
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, CarebookError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error with a lazy context provider.
    fn with_context<C, F>(self, f: F) -> Result<T, CarebookError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, CarebookError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| CarebookError::InternalError(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, CarebookError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| CarebookError::InternalError(format!("{}: {}", f(), error)))
    }
}

// Common error conversions
impl From<reqwest::Error> for CarebookError {
    fn from(err: reqwest::Error) -> Self {
        CarebookError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for CarebookError {
    fn from(err: serde_json::Error) -> Self {
        CarebookError::ParseError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> CarebookError {
    CarebookError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> CarebookError {
    CarebookError::ValidationError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> CarebookError {
    CarebookError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}
