//! Utility functions and helpers
//!
//! This module contains utility functions used throughout the client.

pub mod headers;
pub mod stream;
pub mod version;

pub use headers::portal_headers;
pub use stream::strip_player_token;
pub use version::{VERSION, get_version};
