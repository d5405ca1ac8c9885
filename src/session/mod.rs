//! Session lifecycle for the portal client
//!
//! This module owns the bearer credential: the [`TokenManager`] acquires it
//! through the handshake/activation sequence, refreshes it with keep-alive
//! calls, and persists it through the [`SessionStore`]. A [`Notifier`]
//! carries the single user-facing message a fatal handshake failure is
//! allowed to surface.

pub mod manager;
pub mod store;

pub use manager::{TokenManager, TokenManagerGeneric};
pub use store::SessionStore;

/// Sink for user-facing notifications.
///
/// The library never talks to a UI directly; embedders provide their own
/// implementation when log output is not enough.
pub trait Notifier {
    /// Surface one message to the user
    fn notify(&self, heading: &str, message: &str);
}

/// Default notifier that routes messages to the error log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, heading: &str, message: &str) {
        tracing::error!("{}: {}", heading, message);
    }
}
