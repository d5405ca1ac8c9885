//! Configuration management for the portal client
//!
//! Handles portal connection parameters, device identity, and client
//! behaviour (timeouts, retry bounds, listing window size).

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::{ClientSettings, LoggingSettings, PortalSettings, Settings};
