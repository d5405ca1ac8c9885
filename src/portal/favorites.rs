//! Favorites toggling
//!
//! Thin add/remove operations on top of the request executor. No retry
//! policy of their own beyond what the executor already provides.

use crate::{
    Error, Result,
    portal::{Outcome, PortalClientGeneric},
    session::Notifier,
    types::{ContentKind, PortalAction, RequestSpec},
};
use tracing::debug;

impl<N: Notifier> PortalClientGeneric<N> {
    /// Mark content as a favorite
    pub fn add_favorite(&mut self, kind: ContentKind, content_id: &str) -> Result<()> {
        self.toggle_favorite(kind, PortalAction::SetFavorite, content_id)
    }

    /// Remove content from favorites
    pub fn remove_favorite(&mut self, kind: ContentKind, content_id: &str) -> Result<()> {
        self.toggle_favorite(kind, PortalAction::RemoveFavorite, content_id)
    }

    fn toggle_favorite(
        &mut self,
        kind: ContentKind,
        action: PortalAction,
        content_id: &str,
    ) -> Result<()> {
        let spec = RequestSpec::new(kind, action).with_param("video_id", content_id);
        match self.execute(&spec)? {
            Outcome::Ok(_) => {
                debug!(r#type = %kind, action = %action, content_id, "Favorite toggled");
                Ok(())
            }
            Outcome::Degraded { status, .. } => Err(Error::Portal { status }),
        }
    }
}
