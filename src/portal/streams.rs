//! Stream link resolution
//!
//! Resolves a playable URL through an ordered list of strategies: by
//! content identifier first, then by the portal-supplied raw command.
//! The resulting link is stripped of any player-invocation prefix, and a
//! playback log call is issued fire-and-forget after resolution.

use crate::{
    Error, Result,
    portal::{Outcome, PortalClientGeneric},
    session::Notifier,
    types::{ContentKind, PortalAction, RequestSpec},
    utils::strip_player_token,
};
use tracing::{debug, warn};

/// Parameters for one stream resolution
#[derive(Debug, Clone)]
pub struct StreamRequest {
    kind: ContentKind,
    content_id: String,
    episode: u32,
    raw_cmd: Option<String>,
    prefer_raw_cmd: bool,
}

impl StreamRequest {
    /// Create a stream request for the given content
    pub fn new(kind: ContentKind, content_id: impl Into<String>) -> Self {
        Self {
            kind,
            content_id: content_id.into(),
            episode: 0,
            raw_cmd: None,
            prefer_raw_cmd: false,
        }
    }

    /// Episode index for series content (0 for standalone items)
    pub fn with_episode(mut self, episode: u32) -> Self {
        self.episode = episode;
        self
    }

    /// Upstream-supplied playback command, used by the raw-command strategy
    pub fn with_raw_cmd(mut self, raw_cmd: impl Into<String>) -> Self {
        self.raw_cmd = Some(raw_cmd.into());
        self
    }

    /// Skip the content-identifier strategy and resolve by raw command
    /// directly (the usual mode for live channels)
    pub fn prefer_raw_cmd(mut self, prefer: bool) -> Self {
        self.prefer_raw_cmd = prefer;
        self
    }
}

/// One way of asking the portal for a playable link. Strategies are tried
/// in order until one produces a link, which keeps adding a third strategy
/// a local change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkStrategy {
    /// Derive the upstream command from the content identifier
    ByContentId,
    /// Pass the portal-supplied command through unchanged
    ByRawCommand,
}

impl LinkStrategy {
    /// Build the create-link spec for this strategy, or `None` when the
    /// request lacks what the strategy needs
    fn to_spec(self, request: &StreamRequest) -> Option<RequestSpec> {
        let cmd = match self {
            Self::ByContentId => format!("/media/{}.mpg", request.content_id),
            Self::ByRawCommand => request.raw_cmd.clone()?,
        };
        let mut spec = RequestSpec::new(request.kind, PortalAction::CreateLink)
            .with_param("cmd", cmd)
            .with_param("forced_storage", "")
            .with_param("disable_ad", "0")
            .with_param("download", "0");
        if request.kind != ContentKind::Channel {
            spec = spec.with_param("series", request.episode.to_string());
        }
        Some(spec)
    }
}

impl<N: Notifier> PortalClientGeneric<N> {
    /// Resolve a playable URL for the given content.
    ///
    /// With `prefer_raw_cmd` set the raw-command strategy is used directly;
    /// otherwise resolution by content identifier is attempted first and
    /// the raw command serves as the fallback. The returned string is the
    /// bare URL with any leading launcher token removed.
    ///
    /// # Errors
    ///
    /// [`Error::StreamResolution`] when every applicable strategy fails.
    pub fn resolve_stream(&mut self, request: &StreamRequest) -> Result<String> {
        let strategies: &[LinkStrategy] = if request.prefer_raw_cmd {
            &[LinkStrategy::ByRawCommand]
        } else {
            &[LinkStrategy::ByContentId, LinkStrategy::ByRawCommand]
        };

        let mut last_status = None;
        for strategy in strategies {
            let Some(spec) = strategy.to_spec(request) else {
                debug!(?strategy, "Strategy not applicable, skipping");
                continue;
            };

            match self.execute(&spec)? {
                Outcome::Ok(value) => {
                    let Some(cmd) = value
                        .get(crate::types::RESULT_WRAPPER)
                        .and_then(|js| js.get("cmd"))
                        .and_then(|cmd| cmd.as_str())
                    else {
                        warn!(?strategy, "Link payload missing command field");
                        continue;
                    };

                    let url = strip_player_token(cmd).to_string();
                    debug!(?strategy, %url, "Stream link resolved");
                    self.log_playback(&request.content_id, &url);
                    return Ok(url);
                }
                Outcome::Degraded { status, .. } => {
                    warn!(?strategy, status, "Link strategy failed, trying next");
                    last_status = Some(status);
                }
            }
        }

        Err(Error::stream_resolution(match last_status {
            Some(status) => format!("all strategies exhausted, last status {}", status),
            None => "no applicable strategy produced a link".to_string(),
        }))
    }

    /// Playback analytics log. Fire-and-forget: failure never prevents the
    /// resolved URL from reaching the caller.
    fn log_playback(&mut self, content_id: &str, url: &str) {
        let spec = RequestSpec::new(ContentKind::Session, PortalAction::Log)
            .with_param("real_action", "play")
            .with_param("param", url)
            .with_param("content_id", content_id)
            .with_param("tmp_type", "2");
        match self.execute(&spec) {
            Ok(Outcome::Degraded { status, .. }) => {
                debug!(status, "Playback log rejected, ignoring")
            }
            Ok(Outcome::Ok(_)) => {}
            Err(e) => debug!("Playback log failed, ignoring: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_content_id_strategy_builds_media_command() {
        let request = StreamRequest::new(ContentKind::Catalog, "3232").with_episode(3);
        let spec = LinkStrategy::ByContentId.to_spec(&request).unwrap();
        assert_eq!(spec.param("cmd"), Some("/media/3232.mpg"));
        assert_eq!(spec.param("series"), Some("3"));
        assert_eq!(spec.param("disable_ad"), Some("0"));
    }

    #[test]
    fn test_raw_strategy_requires_command() {
        let request = StreamRequest::new(ContentKind::Catalog, "3232");
        assert!(LinkStrategy::ByRawCommand.to_spec(&request).is_none());

        let with_cmd = request.with_raw_cmd("ffrt http://host/ch/1");
        let spec = LinkStrategy::ByRawCommand.to_spec(&with_cmd).unwrap();
        assert_eq!(spec.param("cmd"), Some("ffrt http://host/ch/1"));
    }

    #[test]
    fn test_channel_requests_omit_episode() {
        let request =
            StreamRequest::new(ContentKind::Channel, "99").with_raw_cmd("http://host/ch/9");
        let spec = LinkStrategy::ByRawCommand.to_spec(&request).unwrap();
        assert_eq!(spec.param("series"), None);
    }
}
