//! STB Portal Client
//!
//! A session-managed client for STB portal middleware: it owns the bearer
//! token lifecycle (handshake, activation, keep-alive, invalidation),
//! executes authenticated portal requests with bounded retry on
//! authorization failure, merges paginated listings into logical pages,
//! resolves playable stream URLs, and toggles favorites.
//!
//! # Architecture
//!
//! - [`session`]: credential ownership, [`TokenManager`] plus the
//!   file-backed [`session::SessionStore`]
//! - [`portal`]: the [`PortalClient`] request executor and the listing,
//!   stream and favorites operations layered on it
//! - [`config`]: portal address, device identity and client behaviour
//! - [`types`]: request specs and typed response payloads
//!
//! The client is deliberately synchronous: each logical operation is one
//! blocking call chain, matching the portal's process-per-invocation usage
//! style.
//!
//! # Examples
//!
//! ```rust,no_run
//! use stb_portal_client::{PortalClient, Settings};
//! use stb_portal_client::portal::ListingRequest;
//! use stb_portal_client::types::ContentKind;
//!
//! # fn main() -> stb_portal_client::Result<()> {
//! let mut settings = Settings::default();
//! settings.portal.base_url = "http://portal.example.com/portal".to_string();
//! settings.portal.mac_address = "00:1A:79:12:34:56".to_string();
//!
//! let mut client = PortalClient::new(settings)?;
//! let request = ListingRequest::new(ContentKind::Catalog).with_category("12");
//! let listing = client.get_listing(&request, 1)?;
//! println!("{} of {} records", listing.len(), listing.total_items);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod portal;
pub mod session;
pub mod types;
pub mod utils;

pub use config::Settings;
pub use error::{Error, Result};
pub use portal::{Outcome, PortalClient, PortalClientGeneric};
pub use session::{SessionStore, TokenManager};
pub use types::{AggregatedListing, Category, Record};
