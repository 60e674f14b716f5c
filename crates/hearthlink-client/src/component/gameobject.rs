//! Game object component.
//!
//! Outbound-only: object state lives on the object-update channel outside
//! the core, which fires [`GameObjects::on_event`] when something
//! relevant changes.

use bytes::Bytes;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use std::sync::Arc;

use hearthlink_proto::cmsg::GameObjUse;

use crate::client::WorldClient;
use crate::errors::ClientError;

use super::ComponentCore;

/// What happened to an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectEventKind {
    /// Object appeared in range.
    Spawned,
    /// Object left range or despawned.
    Despawned,
    /// Object fields changed (doors, chests, lock state, ...).
    Updated,
}

/// One externally observed object change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEvent {
    /// What happened.
    pub kind: ObjectEventKind,
    /// Raw update payload as captured by the object-update channel.
    pub payload: Bytes,
}

/// Game object interaction component.
pub struct GameObjects {
    core: ComponentCore,
    events_tx: broadcast::Sender<ObjectEvent>,
}

impl GameObjects {
    /// Build the component.
    #[must_use]
    pub fn new(client: Arc<WorldClient>) -> Self {
        let capacity = client.config().update_channel_capacity;
        let (events_tx, _) = broadcast::channel(capacity);
        Self { core: ComponentCore::new(client), events_tx }
    }

    /// Use an object (open a door, loot a chest, pick an herb).
    pub async fn use_object(
        &self,
        guid: u64,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let _op = self.core.begin_op();
        self.core
            .client()
            .send_msg(&GameObjUse { guid }, cancel)
            .await
            .map_err(ClientError::from)
    }

    /// Object change events.
    #[must_use]
    pub fn object_events(&self) -> broadcast::Receiver<ObjectEvent> {
        self.events_tx.subscribe()
    }

    /// Publish an externally observed object change.
    pub fn on_event(&self, kind: ObjectEventKind, payload: Bytes) {
        let _ = self.events_tx.send(ObjectEvent { kind, payload });
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
