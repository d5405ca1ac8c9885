//! Error handling for the portal client
//!
//! Provides the crate-wide [`Error`] enum and [`Result`] alias.

pub mod types;

pub use types::{Error, Result};
