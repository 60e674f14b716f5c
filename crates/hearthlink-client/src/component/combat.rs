//! Combat and pet component.
//!
//! Outbound pet commands plus the external event hook: combat state is
//! derived from the object-update channel outside the core, which fires
//! [`Combat::on_event`] when something relevant changes.

use bytes::Bytes;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use std::sync::Arc;

use hearthlink_proto::cmsg::PetAction;

use crate::client::WorldClient;
use crate::errors::ClientError;

use super::ComponentCore;

/// What changed in combat state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatEventKind {
    /// A spell cast started.
    SpellCastStart,
    /// A spell cast completed.
    SpellCastGo,
    /// A spell cast failed.
    SpellCastFailed,
    /// Auto-attack engaged.
    AttackStart,
    /// Auto-attack disengaged.
    AttackStop,
}

/// One externally observed combat change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatEvent {
    /// What happened.
    pub kind: CombatEventKind,
    /// Raw update payload as captured by the object-update channel.
    pub payload: Bytes,
}

/// Combat and pet component.
pub struct Combat {
    core: ComponentCore,
    events_tx: broadcast::Sender<CombatEvent>,
}

impl Combat {
    /// Build the component.
    #[must_use]
    pub fn new(client: Arc<WorldClient>) -> Self {
        let capacity = client.config().update_channel_capacity;
        let (events_tx, _) = broadcast::channel(capacity);
        Self { core: ComponentCore::new(client), events_tx }
    }

    /// Issue a pet action bar command. Targeted actions carry the target
    /// GUID; untargeted ones omit it.
    pub async fn pet_action(
        &self,
        pet_guid: u64,
        action: u32,
        target_guid: Option<u64>,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let _op = self.core.begin_op();
        let msg = PetAction { pet_guid, action, target_guid };
        self.core.client().send_msg(&msg, cancel).await.map_err(ClientError::from)
    }

    /// Combat change events.
    #[must_use]
    pub fn combat_events(&self) -> broadcast::Receiver<CombatEvent> {
        self.events_tx.subscribe()
    }

    /// Publish an externally observed combat change.
    pub fn on_event(&self, kind: CombatEventKind, payload: Bytes) {
        let _ = self.events_tx.send(CombatEvent { kind, payload });
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
