//! Targeting component.
//!
//! Holds the single current-target slot. Outbound selection updates the
//! cache optimistically before the packet is queued; when the server
//! disagrees (seen through object updates wired in externally), the
//! corrective transition is emitted as well, so observers always see the
//! full optimistic-then-corrected sequence.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use hearthlink_proto::cmsg::SetSelection;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::client::WorldClient;
use crate::errors::ClientError;

use super::{ComponentCore, lock};

/// Delay granting the server time to apply a selection before assisting.
const ASSIST_SETTLE: Duration = Duration::from_millis(100);

/// One target transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetChange {
    /// Target before the transition (`None` = no target).
    pub previous: Option<u64>,
    /// Target after the transition.
    pub current: Option<u64>,
    /// When the transition was recorded locally.
    pub timestamp: Instant,
}

/// Current-target component.
pub struct Targeting {
    core: ComponentCore,
    current: Arc<Mutex<Option<u64>>>,
    changes_tx: broadcast::Sender<TargetChange>,
}

impl Targeting {
    /// Build the component.
    #[must_use]
    pub fn new(client: Arc<WorldClient>) -> Self {
        let capacity = client.config().update_channel_capacity;
        let (changes_tx, _) = broadcast::channel(capacity);
        Self {
            core: ComponentCore::new(client),
            current: Arc::new(Mutex::new(None)),
            changes_tx,
        }
    }

    /// The target we believe is selected.
    #[must_use]
    pub fn current_target(&self) -> Option<u64> {
        *lock(&self.current)
    }

    /// Target transition events, optimistic and corrective alike.
    #[must_use]
    pub fn target_changes(&self) -> broadcast::Receiver<TargetChange> {
        self.changes_tx.subscribe()
    }

    /// Select `guid` (zero clears). The cache updates before the packet
    /// is queued.
    pub async fn set_target(
        &self,
        guid: u64,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let _op = self.core.begin_op();

        let target = (guid != 0).then_some(guid);
        self.transition(target);

        self.core
            .client()
            .send_msg(&SetSelection { guid }, cancel)
            .await
            .map_err(ClientError::from)
    }

    /// Clear the selection.
    pub async fn clear_target(&self, cancel: &CancellationToken) -> Result<(), ClientError> {
        self.set_target(0, cancel).await
    }

    /// Select `guid` and yield briefly so the server can swap the
    /// effective target before the caller acts on it.
    pub async fn assist(&self, guid: u64, cancel: &CancellationToken) -> Result<(), ClientError> {
        self.set_target(guid, cancel).await?;
        tokio::select! {
            () = cancel.cancelled() => Err(ClientError::Cancelled),
            () = tokio::time::sleep(ASSIST_SETTLE) => Ok(()),
        }
    }

    /// Reconcile with a server-observed target. External code calls this
    /// from the object-update channel; a disagreeing value emits a
    /// corrective transition.
    pub fn notify_server_target(&self, target: Option<u64>) {
        if *lock(&self.current) != target {
            self.transition(target);
        }
    }

    fn transition(&self, target: Option<u64>) {
        let previous = {
            let mut current = lock(&self.current);
            std::mem::replace(&mut *current, target)
        };
        let _ = self.changes_tx.send(TargetChange {
            previous,
            current: target,
            timestamp: Instant::now(),
        });
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
