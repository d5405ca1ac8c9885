//! Request type definitions
//!
//! Every portal call is a GET against a single endpoint, parameterized by a
//! `type`/`action` pair plus action-specific query fields. [`RequestSpec`]
//! models one such call.

use std::collections::BTreeMap;

/// Fixed query field appended to every portal request.
const JS_HTTP_REQUEST: &str = "1-xml";

/// Content domain a request is scoped to (the wire `type` field)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Session lifecycle calls (handshake, activation, playback log)
    Session,
    /// On-demand catalog content
    Catalog,
    /// Live channels
    Channel,
    /// Series content
    Series,
    /// Keep-alive / watchdog calls
    Diagnostics,
}

impl ContentKind {
    /// Wire value for the `type` query field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Catalog => "catalog",
            Self::Channel => "channel",
            Self::Series => "series",
            Self::Diagnostics => "diagnostics",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Portal operation (the wire `action` field)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalAction {
    /// Issue a fresh bearer token for a device identity
    Handshake,
    /// Activate a session / keep it alive
    GetProfile,
    /// Watchdog keep-alive
    GetEvents,
    /// Catalog/series category list
    GetCategories,
    /// Channel genre list
    GetGenres,
    /// One page of an ordered content listing
    GetOrderedList,
    /// Resolve a playable link
    CreateLink,
    /// Mark content as favorite
    SetFavorite,
    /// Unmark content as favorite
    RemoveFavorite,
    /// Playback analytics log
    Log,
}

impl PortalAction {
    /// Wire value for the `action` query field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Handshake => "handshake",
            Self::GetProfile => "get_profile",
            Self::GetEvents => "get_events",
            Self::GetCategories => "get_categories",
            Self::GetGenres => "get_genres",
            Self::GetOrderedList => "get_ordered_list",
            Self::CreateLink => "create_link",
            Self::SetFavorite => "set_favorite",
            Self::RemoveFavorite => "remove_favorite",
            Self::Log => "log",
        }
    }
}

impl std::fmt::Display for PortalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parameterized portal request.
///
/// A spec always carries its `type` and `action`; extra fields are stored
/// sorted so query serialization is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    kind: ContentKind,
    action: PortalAction,
    params: BTreeMap<String, String>,
}

impl RequestSpec {
    /// Create a new request spec for the given domain and operation
    pub fn new(kind: ContentKind, action: PortalAction) -> Self {
        Self {
            kind,
            action,
            params: BTreeMap::new(),
        }
    }

    /// Add an action-specific query field
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// The content domain this request is scoped to
    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// The portal operation this request performs
    pub fn action(&self) -> PortalAction {
        self.action
    }

    /// Look up an action-specific field
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Full query pairs for the wire request, including the fixed
    /// `JsHttpRequest` marker the portal expects on every call
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.params.len() + 3);
        pairs.push(("type".to_string(), self.kind.as_str().to_string()));
        pairs.push(("action".to_string(), self.action.as_str().to_string()));
        for (key, value) in &self.params {
            pairs.push((key.clone(), value.clone()));
        }
        pairs.push(("JsHttpRequest".to_string(), JS_HTTP_REQUEST.to_string()));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_spec_always_carries_type_and_action() {
        let spec = RequestSpec::new(ContentKind::Catalog, PortalAction::GetOrderedList);
        let pairs = spec.query_pairs();
        assert_eq!(pairs[0], ("type".to_string(), "catalog".to_string()));
        assert_eq!(pairs[1], ("action".to_string(), "get_ordered_list".to_string()));
        assert_eq!(
            pairs.last().unwrap(),
            &("JsHttpRequest".to_string(), "1-xml".to_string())
        );
    }

    #[test]
    fn test_params_are_sorted() {
        let spec = RequestSpec::new(ContentKind::Channel, PortalAction::CreateLink)
            .with_param("series", "3")
            .with_param("cmd", "/media/9.mpg");
        let pairs = spec.query_pairs();
        // type, action, cmd, series, JsHttpRequest
        assert_eq!(pairs[2].0, "cmd");
        assert_eq!(pairs[3].0, "series");
    }

    #[test]
    fn test_param_lookup() {
        let spec = RequestSpec::new(ContentKind::Catalog, PortalAction::SetFavorite)
            .with_param("video_id", "122");
        assert_eq!(spec.param("video_id"), Some("122"));
        assert_eq!(spec.param("missing"), None);
    }

    #[test]
    fn test_wire_values() {
        assert_eq!(ContentKind::Diagnostics.as_str(), "diagnostics");
        assert_eq!(PortalAction::RemoveFavorite.as_str(), "remove_favorite");
        assert_eq!(PortalAction::Handshake.to_string(), "handshake");
    }
}
