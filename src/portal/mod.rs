//! Portal operations
//!
//! This module hosts the request executor and the operations layered on
//! it: listing aggregation, stream link resolution, and favorites
//! toggling. The executor ensures a valid session through the token
//! manager and recovers from authorization failures with a bounded retry.

pub mod executor;
pub mod favorites;
pub mod listing;
pub mod pagination;
pub mod streams;

pub use executor::{Outcome, PortalClient, PortalClientGeneric};
pub use listing::ListingRequest;
pub use streams::StreamRequest;
