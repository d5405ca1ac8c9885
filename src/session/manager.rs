//! Bearer token lifecycle management
//!
//! The token manager owns the session credential: it performs the
//! handshake/activation pair, keeps the session alive, persists the token
//! through the [`SessionStore`], and clears it on invalidation. No other
//! component mutates the credential directly.
//!
//! State machine: `EMPTY → ACTIVE` only via a successful handshake plus
//! activation (atomic from the caller's point of view: a failure in either
//! leaves the manager `EMPTY`); `ACTIVE → EMPTY` via [`invalidate`];
//! `ACTIVE → ACTIVE` via keep-alive refresh.
//!
//! [`invalidate`]: TokenManagerGeneric::invalidate

use crate::{
    Error, Result,
    config::Settings,
    session::{LogNotifier, Notifier, SessionStore},
    types::{AUTH_FAILURE_SENTINEL, ContentKind, PortalAction, RESULT_WRAPPER, RequestSpec},
    utils::portal_headers,
};
use reqwest::blocking::Client;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Convenience alias for the default notifier
pub type TokenManager = TokenManagerGeneric<LogNotifier>;

/// Owns the bearer credential and its lifecycle
#[derive(Debug)]
pub struct TokenManagerGeneric<N: Notifier = LogNotifier> {
    /// Connection parameters and device identity
    settings: Arc<Settings>,
    /// HTTP client shared with the request executor
    http: Client,
    /// Persistence surface for the credential
    store: SessionStore,
    /// In-memory credential, exclusively owned by this manager
    token: Option<String>,
    /// Sink for the single user-facing handshake-failure notification
    notifier: N,
}

impl TokenManagerGeneric<LogNotifier> {
    /// Create a token manager with the default log-backed notifier
    pub fn new(settings: Arc<Settings>, http: Client) -> Self {
        Self::with_notifier(settings, http, LogNotifier)
    }
}

impl<N: Notifier> TokenManagerGeneric<N> {
    /// Create a token manager with a custom notification sink
    pub fn with_notifier(settings: Arc<Settings>, http: Client, notifier: N) -> Self {
        let store = SessionStore::new(settings.token_store_path());
        let token = store.load();
        if token.is_some() {
            debug!("Loaded cached session token from {:?}", store.path());
        }
        Self {
            settings,
            http,
            store,
            token,
            notifier,
        }
    }

    /// Obtain a valid bearer token.
    ///
    /// With a cached credential and no refresh requested this is a pure
    /// in-memory read. `force_refresh` performs the keep-alive pair
    /// (`get_profile`, `get_events`) against the existing token without
    /// re-handshaking. With no cached credential the full handshake plus
    /// session-activation sequence runs and the token is persisted.
    ///
    /// # Errors
    ///
    /// A failed handshake or activation surfaces one user-facing
    /// notification and returns [`Error::Handshake`]; it is not retried
    /// here. Retry on authorization failure of subsequent calls is the
    /// request executor's responsibility.
    pub fn acquire(&mut self, force_refresh: bool) -> Result<String> {
        if let Some(token) = self.token.clone() {
            if force_refresh {
                self.keep_alive(&token)?;
            }
            return Ok(token);
        }

        let token = self.handshake()?;
        self.activate(&token)?;
        if let Err(e) = self.store.save(&token) {
            // The session is still usable in-process without the record
            warn!("Failed to persist session token: {}", e);
        }
        self.token = Some(token.clone());
        info!("Portal session established");
        Ok(token)
    }

    /// Clear the in-memory credential and delete the persisted record.
    ///
    /// Idempotent: invalidating twice, or with nothing cached, is a no-op.
    pub fn invalidate(&mut self) {
        if self.token.take().is_some() {
            debug!("In-memory session token cleared");
        }
        self.store.clear();
    }

    /// Whether a credential is currently held (`ACTIVE` state)
    pub fn is_active(&self) -> bool {
        self.token.is_some()
    }

    /// The persistence surface backing this manager
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Initial unauthenticated call issuing a fresh token
    fn handshake(&self) -> Result<String> {
        let spec = RequestSpec::new(ContentKind::Session, PortalAction::Handshake);
        let body = self
            .call(&spec, None)
            .map_err(|e| self.fatal("handshake", e))?;

        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| self.fatal("handshake", Error::malformed_response(e.to_string())))?;
        let token = value
            .get(RESULT_WRAPPER)
            .and_then(|js| js.get("token"))
            .and_then(|token| token.as_str())
            .ok_or_else(|| {
                self.fatal(
                    "handshake",
                    Error::malformed_response("no token in handshake payload"),
                )
            })?;

        debug!("Handshake issued a fresh session token");
        Ok(token.to_string())
    }

    /// Profile-establishment call that must follow the handshake before the
    /// token is usable for content calls
    fn activate(&self, token: &str) -> Result<()> {
        let spec = RequestSpec::new(ContentKind::Session, PortalAction::GetProfile)
            .with_param("hd", "1")
            .with_param("auth_second_step", "1")
            .with_param("sn", &self.settings.portal.serial_number)
            .with_param("device_id", &self.settings.portal.device_id)
            .with_param("device_id2", &self.settings.portal.device_id_2)
            .with_param("signature", &self.settings.portal.signature);

        self.call(&spec, Some(token))
            .map_err(|e| self.fatal("session activation", e))?;
        debug!("Session activated");
        Ok(())
    }

    /// Keep-alive pair against an existing token. Rejections are logged but
    /// do not invalidate the session; the executor handles that on the next
    /// content call.
    fn keep_alive(&self, token: &str) -> Result<()> {
        let calls = [
            RequestSpec::new(ContentKind::Session, PortalAction::GetProfile),
            RequestSpec::new(ContentKind::Diagnostics, PortalAction::GetEvents),
        ];
        for spec in calls {
            let response = self
                .http
                .get(self.settings.endpoint_url())
                .query(&spec.query_pairs())
                .headers(portal_headers(&self.settings, Some(token))?)
                .send()?;
            if !response.status().is_success() {
                warn!(
                    action = %spec.action(),
                    status = response.status().as_u16(),
                    "Keep-alive call rejected"
                );
            }
        }
        Ok(())
    }

    /// Issue one session-scoped call and apply the authorization-failure
    /// detection rule (non-success status, or the sentinel body)
    fn call(&self, spec: &RequestSpec, token: Option<&str>) -> Result<String> {
        debug!(r#type = %spec.kind(), action = %spec.action(), "Portal session call");
        let response = self
            .http
            .get(self.settings.endpoint_url())
            .query(&spec.query_pairs())
            .headers(portal_headers(&self.settings, token)?)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if body == AUTH_FAILURE_SENTINEL {
            return Err(Error::auth("portal rejected the session"));
        }
        if !status.is_success() {
            return Err(Error::Portal {
                status: status.as_u16(),
            });
        }
        Ok(body)
    }

    /// Escalate a failed handshake-sequence call: surface the user-facing
    /// notification exactly once and convert to a fatal handshake error.
    /// Transport errors propagate unchanged.
    fn fatal(&self, stage: &str, err: Error) -> Error {
        match err {
            Error::Network(_) => err,
            other => {
                let reason = format!("{} failed: {}", stage, other);
                warn!("{}", reason);
                self.notifier.notify("Portal connection", &reason);
                Error::handshake(reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Notifier that records every message it is asked to surface
    #[derive(Debug, Default)]
    struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, _heading: &str, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    fn settings_for(server_url: &str, dir: &TempDir) -> Arc<Settings> {
        let mut settings = Settings::default();
        settings.portal.base_url = server_url.to_string();
        settings.portal.mac_address = "00:1A:79:12:34:56".to_string();
        settings.portal.serial_number = "0123456789".to_string();
        settings.portal.device_id = "device123".to_string();
        settings.portal.device_id_2 = "device456".to_string();
        settings.portal.signature = "sig".to_string();
        settings.client.token_path = Some(dir.path().join("session.json"));
        Arc::new(settings)
    }

    fn manager_for(
        server_url: &str,
        dir: &TempDir,
    ) -> TokenManagerGeneric<RecordingNotifier> {
        let settings = settings_for(server_url, dir);
        let http = Client::builder()
            .timeout(settings.timeout())
            .build()
            .unwrap();
        TokenManagerGeneric::with_notifier(settings, http, RecordingNotifier::default())
    }

    #[test]
    fn test_acquire_runs_handshake_and_activation_once() {
        let mut server = mockito::Server::new();
        let dir = TempDir::new().unwrap();

        let handshake = server
            .mock("GET", "/server/load.php")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("type".into(), "session".into()),
                mockito::Matcher::UrlEncoded("action".into(), "handshake".into()),
            ]))
            .with_body(r#"{"js": {"token": "fresh_token"}}"#)
            .expect(1)
            .create();
        let profile = server
            .mock("GET", "/server/load.php")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("action".into(), "get_profile".into()),
                mockito::Matcher::UrlEncoded("device_id".into(), "device123".into()),
            ]))
            .with_body(r#"{"js": {"id": 1}}"#)
            .expect(1)
            .create();

        let mut manager = manager_for(&server.url(), &dir);
        let token = manager.acquire(false).unwrap();

        assert_eq!(token, "fresh_token");
        assert!(manager.is_active());
        // Token round-trip: reloading the store yields the same value
        assert_eq!(manager.store().load().as_deref(), Some("fresh_token"));
        handshake.assert();
        profile.assert();
    }

    #[test]
    fn test_cached_token_needs_no_network() {
        let server = mockito::Server::new();
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("session.json"),
            r#"{"value": "cached_token_123"}"#,
        )
        .unwrap();

        let mut manager = manager_for(&server.url(), &dir);
        let token = manager.acquire(false).unwrap();
        assert_eq!(token, "cached_token_123");
        // No mocks registered: any network call would have failed
    }

    #[test]
    fn test_force_refresh_keeps_token_and_calls_keep_alive() {
        let mut server = mockito::Server::new();
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("session.json"),
            r#"{"value": "cached_token_123"}"#,
        )
        .unwrap();

        let profile = server
            .mock("GET", "/server/load.php")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("type".into(), "session".into()),
                mockito::Matcher::UrlEncoded("action".into(), "get_profile".into()),
            ]))
            .with_body(r#"{"js": {}}"#)
            .expect(1)
            .create();
        let events = server
            .mock("GET", "/server/load.php")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("type".into(), "diagnostics".into()),
                mockito::Matcher::UrlEncoded("action".into(), "get_events".into()),
            ]))
            .with_body(r#"{"js": {}}"#)
            .expect(1)
            .create();

        let mut manager = manager_for(&server.url(), &dir);
        let token = manager.acquire(true).unwrap();

        assert_eq!(token, "cached_token_123");
        profile.assert();
        events.assert();
    }

    #[test]
    fn test_handshake_sentinel_notifies_once_and_fails() {
        let mut server = mockito::Server::new();
        let dir = TempDir::new().unwrap();

        server
            .mock("GET", "/server/load.php")
            .with_body(AUTH_FAILURE_SENTINEL)
            .create();

        let mut manager = manager_for(&server.url(), &dir);
        let err = manager.acquire(false).unwrap_err();

        assert!(matches!(err, Error::Handshake { .. }));
        assert!(!manager.is_active());
        // Exactly one user-facing notification
        assert_eq!(manager.notifier.messages.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_activation_failure_leaves_state_empty() {
        let mut server = mockito::Server::new();
        let dir = TempDir::new().unwrap();

        server
            .mock("GET", "/server/load.php")
            .match_query(mockito::Matcher::UrlEncoded(
                "action".into(),
                "handshake".into(),
            ))
            .with_body(r#"{"js": {"token": "doomed"}}"#)
            .create();
        server
            .mock("GET", "/server/load.php")
            .match_query(mockito::Matcher::UrlEncoded(
                "action".into(),
                "get_profile".into(),
            ))
            .with_status(500)
            .with_body("Server Error")
            .create();

        let mut manager = manager_for(&server.url(), &dir);
        let err = manager.acquire(false).unwrap_err();

        assert!(matches!(err, Error::Handshake { .. }));
        assert!(!manager.is_active());
        // Nothing was persisted
        assert_eq!(manager.store().load(), None);
        assert_eq!(manager.notifier.messages.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_invalidate_is_idempotent() {
        let server = mockito::Server::new();
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("session.json"), r#"{"value": "tok"}"#).unwrap();

        let mut manager = manager_for(&server.url(), &dir);
        assert!(manager.is_active());

        manager.invalidate();
        manager.invalidate();

        assert!(!manager.is_active());
        assert_eq!(manager.store().load(), None);
    }
}
