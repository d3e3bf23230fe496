// --- File: crates/carebook_common/src/services.rs ---
//! Plumbing shared by the service abstractions of the Carebook crates.
//!
//! Collaborator traits return [`BoxFuture`]s so they stay object safe and can
//! be held as `Arc<dyn Trait>` inside axum state.

use std::future::Future;
use std::pin::Pin;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;
