//! Stream command post-processing
//!
//! The portal's `create_link` payload may prefix the playable URL with a
//! launcher token (e.g. `ffmpeg http://host/x.m3u8`). Only the URL portion
//! is useful to callers.

/// Strip any leading player-invocation token, returning just the URL.
///
/// The upstream command is whitespace-separated with the real link last;
/// a command without whitespace is returned unchanged.
pub fn strip_player_token(cmd: &str) -> &str {
    cmd.split_whitespace().next_back().unwrap_or(cmd).trim()
}
