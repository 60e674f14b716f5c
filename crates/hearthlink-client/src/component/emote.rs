//! Emote component. Outbound-only.

use std::sync::Arc;

use hearthlink_proto::cmsg::{Emote, TextEmote};
use tokio_util::sync::CancellationToken;

use crate::client::WorldClient;
use crate::errors::ClientError;

use super::ComponentCore;

/// A few commonly used text emote ids.
pub mod text_emotes {
    /// /bow
    pub const BOW: u32 = 2;
    /// /dance
    pub const DANCE: u32 = 34;
    /// /hail
    pub const HAIL: u32 = 53;
    /// /salute
    pub const SALUTE: u32 = 78;
    /// /wave
    pub const WAVE: u32 = 101;
}

/// Emote component.
pub struct Emotes {
    core: ComponentCore,
}

impl Emotes {
    /// Build the component.
    #[must_use]
    pub fn new(client: Arc<WorldClient>) -> Self {
        Self { core: ComponentCore::new(client) }
    }

    /// Play an emote animation.
    pub async fn emote(&self, emote_id: u32, cancel: &CancellationToken) -> Result<(), ClientError> {
        let _op = self.core.begin_op();
        self.core
            .client()
            .send_msg(&Emote { emote_id }, cancel)
            .await
            .map_err(ClientError::from)
    }

    /// Perform a text emote, optionally at a target.
    pub async fn text_emote(
        &self,
        text_emote_id: u32,
        target_guid: Option<u64>,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let _op = self.core.begin_op();
        let msg = TextEmote { text_emote_id, target_guid: target_guid.unwrap_or(0) };
        self.core.client().send_msg(&msg, cancel).await.map_err(ClientError::from)
    }

    /// Core bookkeeping.
    #[must_use]
    pub fn core(&self) -> &ComponentCore {
        &self.core
    }

    /// Stop the component.
    pub async fn shutdown(&self) {
        self.core.shutdown().await;
    }
}
