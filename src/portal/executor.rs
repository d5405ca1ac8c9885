//! Portal request executor
//!
//! Issues one authenticated request per [`RequestSpec`], detecting
//! authorization failures and recovering by invalidating the session and
//! retrying within a configurable bound. Exhausted retries degrade to the
//! last received response instead of raising, so a transient auth hiccup
//! never takes down a whole listing operation.

use crate::{
    Error, Result,
    config::Settings,
    session::{LogNotifier, Notifier, TokenManagerGeneric},
    types::{AUTH_FAILURE_SENTINEL, RESULT_WRAPPER, RequestSpec},
    utils::portal_headers,
};
use reqwest::blocking::Client;
use std::sync::Arc;
use tracing::{debug, warn};

/// Convenience alias for the default notifier
pub type PortalClient = PortalClientGeneric<LogNotifier>;

/// Tagged result of one executed request.
///
/// Callers must check for [`Outcome::Degraded`] explicitly; a degraded
/// payload cannot be mistaken for success.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Successful response body, parsed as JSON
    Ok(serde_json::Value),
    /// All attempts exhausted; the last response is returned as-is
    Degraded {
        /// HTTP status of the final attempt
        status: u16,
        /// Raw body of the final attempt
        body: String,
    },
}

impl Outcome {
    /// The action payload inside the result wrapper, when present
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Ok(value) => value.get(RESULT_WRAPPER),
            Self::Degraded { .. } => None,
        }
    }

    /// Whether this outcome signals an exhausted retry loop
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// Synchronous portal client: request executor plus the higher-level
/// listing, stream-resolution and favorites operations layered on it.
///
/// One instance per process invocation; all operations are one blocking
/// call chain with no internal parallelism.
#[derive(Debug)]
pub struct PortalClientGeneric<N: Notifier = LogNotifier> {
    /// Connection parameters and device identity
    settings: Arc<Settings>,
    /// Blocking HTTP client with the configured request timeout
    http: Client,
    /// Session credential owner
    tokens: TokenManagerGeneric<N>,
}

impl PortalClientGeneric<LogNotifier> {
    /// Create a client for the given settings.
    ///
    /// Validates the settings and builds the underlying HTTP client with
    /// the configured request timeout.
    pub fn new(settings: Settings) -> Result<Self> {
        Self::with_notifier(settings, LogNotifier)
    }
}

impl<N: Notifier> PortalClientGeneric<N> {
    /// Create a client with a custom notification sink
    pub fn with_notifier(settings: Settings, notifier: N) -> Result<Self> {
        settings.validate()?;
        let settings = Arc::new(settings);
        let http = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(Error::Network)?;
        let tokens = TokenManagerGeneric::with_notifier(settings.clone(), http.clone(), notifier);
        Ok(Self {
            settings,
            http,
            tokens,
        })
    }

    /// Connection parameters this client was built with
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The session credential owner (read access, e.g. for state checks)
    pub fn token_manager(&self) -> &TokenManagerGeneric<N> {
        &self.tokens
    }

    /// Explicitly refresh the session via the keep-alive pair
    pub fn refresh_session(&mut self) -> Result<()> {
        self.tokens.acquire(true)?;
        Ok(())
    }

    /// Execute one portal request with authorization-failure recovery.
    ///
    /// Ensures a credential is available (lazy, non-forced acquisition),
    /// issues the request, and on a detected authorization failure
    /// (non-success status or the sentinel body) invalidates the session
    /// and retries up to `max_retries` additional attempts. A fresh
    /// handshake failure inside the loop counts toward the same bound.
    ///
    /// When every attempt fails but at least one response was received,
    /// the last response is returned as [`Outcome::Degraded`]. An error is
    /// returned only when no response was received at all.
    pub fn execute(&mut self, spec: &RequestSpec) -> Result<Outcome> {
        let attempts = self.settings.client.max_retries + 1;
        let mut last_degraded: Option<(u16, String)> = None;
        let mut last_error: Option<Error> = None;

        for attempt in 0..attempts {
            let token = match self.tokens.acquire(false) {
                Ok(token) => token,
                Err(e) => {
                    warn!(attempt, "Session acquisition failed: {}", e);
                    last_error = Some(e);
                    continue;
                }
            };

            debug!(
                r#type = %spec.kind(),
                action = %spec.action(),
                attempt,
                "Executing portal request"
            );
            let response = self
                .http
                .get(self.settings.endpoint_url())
                .query(&spec.query_pairs())
                .headers(portal_headers(&self.settings, Some(&token))?)
                .send();

            let response = match response {
                Ok(response) => response,
                Err(e) => {
                    warn!(attempt, "Transport failure: {}", e);
                    last_error = Some(e.into());
                    continue;
                }
            };

            let status = response.status();
            let body = match response.text() {
                Ok(body) => body,
                Err(e) => {
                    warn!(attempt, "Failed to read response body: {}", e);
                    last_error = Some(e.into());
                    continue;
                }
            };

            if status.is_success() && body != AUTH_FAILURE_SENTINEL {
                match serde_json::from_str(&body) {
                    Ok(value) => return Ok(Outcome::Ok(value)),
                    Err(e) => {
                        // Success status with an unparseable body is not an
                        // auth failure; hand it back for the caller to judge
                        warn!("Unparseable portal response: {}", e);
                        return Ok(Outcome::Degraded {
                            status: status.as_u16(),
                            body,
                        });
                    }
                }
            }

            warn!(
                status = status.as_u16(),
                attempt,
                action = %spec.action(),
                "Authorization failure detected, invalidating session"
            );
            self.tokens.invalidate();
            last_degraded = Some((status.as_u16(), body));
        }

        if let Some((status, body)) = last_degraded {
            warn!(status, "Retries exhausted, returning degraded response");
            return Ok(Outcome::Degraded { status, body });
        }
        Err(last_error.unwrap_or_else(|| Error::auth("request failed with no response")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outcome_payload_extraction() {
        let outcome = Outcome::Ok(json!({"js": {"token": "x"}}));
        assert_eq!(outcome.payload().unwrap()["token"], "x");
        assert!(!outcome.is_degraded());
    }

    #[test]
    fn test_degraded_outcome_has_no_payload() {
        let outcome = Outcome::Degraded {
            status: 401,
            body: "Authorization failed".to_string(),
        };
        assert!(outcome.payload().is_none());
        assert!(outcome.is_degraded());
    }

    #[test]
    fn test_missing_wrapper_yields_no_payload() {
        let outcome = Outcome::Ok(json!({"error": "nope"}));
        assert!(outcome.payload().is_none());
    }
}
