//! Common test utilities and helpers
//!
//! Shared fixtures for the integration tests: settings wired to a mock
//! portal and canned response bodies.

/// Test helper functions
pub mod helpers {
    use std::path::Path;
    use stb_portal_client::config::Settings;

    /// Settings pointing at a mock portal, with the session record kept in
    /// a per-test directory
    pub fn portal_settings(server_url: &str, token_dir: &Path) -> Settings {
        let mut settings = Settings::default();
        settings.portal.base_url = server_url.to_string();
        settings.portal.mac_address = "00:2D:73:68:91:11".to_string();
        settings.portal.serial_number = "02983409283402".to_string();
        settings.portal.device_id = "device123".to_string();
        settings.portal.device_id_2 = "device456".to_string();
        settings.portal.signature = "test_signature".to_string();
        settings.client.token_path = Some(token_dir.join("session.json"));
        settings
    }

    /// Handshake payload issuing the given token
    pub fn handshake_body(token: &str) -> String {
        format!(r#"{{"js": {{"token": "{}"}}}}"#, token)
    }

    /// One listing page with the given record names and counters (string
    /// counters, the loosest form portals produce)
    pub fn page_body(names: &[&str], total_items: u32, page_size: u32) -> String {
        let records: Vec<String> = names
            .iter()
            .enumerate()
            .map(|(i, name)| format!(r#"{{"id": "{}", "name": "{}"}}"#, i + 1, name))
            .collect();
        format!(
            r#"{{"js": {{"data": [{}], "total_items": "{}", "max_page_items": "{}"}}}}"#,
            records.join(","),
            total_items,
            page_size
        )
    }
}
