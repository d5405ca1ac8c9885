//! Portal request header construction
//!
//! Every portal call carries the device identity headers; authenticated
//! calls additionally carry the serial number and the bearer credential.

use crate::{Result, config::Settings};
use reqwest::header::{AUTHORIZATION, COOKIE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};

/// Client identity header expected by the portal.
static X_USER_AGENT: HeaderName = HeaderName::from_static("x-user-agent");
/// Non-standard spelling is intentional; the middleware checks `Referrer`.
static REFERRER: HeaderName = HeaderName::from_static("referrer");
/// Serial number header, sent once a session is established.
static SN: HeaderName = HeaderName::from_static("sn");

/// Build the header set for one portal request.
///
/// `token` is absent only for the initial handshake; all other calls carry
/// `Authorization: Bearer <token>` and the device serial number.
pub fn portal_headers(settings: &Settings, token: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, header_value(&settings.mac_cookie())?);
    headers.insert(X_USER_AGENT.clone(), header_value(&settings.client.model)?);
    headers.insert(REFERRER.clone(), header_value(&settings.referrer())?);
    headers.insert(USER_AGENT, header_value(&settings.client.user_agent)?);

    if let Some(token) = token {
        headers.insert(SN.clone(), header_value(&settings.portal.serial_number)?);
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", token))?);
    }

    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| crate::Error::config(format!("Invalid header value {:?}: {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.portal.base_url = "http://portal.example.com/portal".to_string();
        settings.portal.mac_address = "00:1A:79:12:34:56".to_string();
        settings.portal.serial_number = "0123456789".to_string();
        settings
    }

    #[test]
    fn test_handshake_headers_have_no_credential() {
        let headers = portal_headers(&settings(), None).unwrap();
        assert_eq!(headers[&COOKIE], "mac=00:1A:79:12:34:56");
        assert_eq!(headers[&X_USER_AGENT], "Model: MAG250; Link: WiFi");
        assert_eq!(headers[&REFERRER], "http://portal.example.com/portal/c/");
        assert!(headers.get(&AUTHORIZATION).is_none());
        assert!(headers.get(&SN).is_none());
    }

    #[test]
    fn test_authenticated_headers_carry_bearer_and_serial() {
        let headers = portal_headers(&settings(), Some("tok123")).unwrap();
        assert_eq!(headers[&AUTHORIZATION], "Bearer tok123");
        assert_eq!(headers[&SN], "0123456789");
    }

    #[test]
    fn test_rejects_unencodable_values() {
        let mut bad = settings();
        bad.portal.mac_address = "00:1A\n79".to_string();
        assert!(portal_headers(&bad, None).is_err());
    }
}
