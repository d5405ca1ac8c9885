//! Type definitions for the portal client
//!
//! This module contains the main data structures used for requests and
//! responses, plus protocol-level constants.

pub mod request;
pub mod response;
pub mod serde_helpers;

pub use request::{ContentKind, PortalAction, RequestSpec};
pub use response::{AggregatedListing, Category, Page, Record};

/// Literal plain-text body the portal returns when a session is rejected.
///
/// This is the only non-JSON response shape the protocol produces.
pub const AUTH_FAILURE_SENTINEL: &str = "Authorization failed";

/// Top-level wrapper field holding every JSON payload.
pub const RESULT_WRAPPER: &str = "js";
