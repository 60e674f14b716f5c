//! Inventory component.
//!
//! Outbound item movement (swap, split, destroy, autostore) plus the
//! failure channel: `SMSG_INVENTORY_CHANGE_FAILURE` records are mapped to
//! stable user-visible messages on `inventory_errors`. Item movement
//! itself is observed on the object-update channel outside the core and
//! enters through [`Inventory::notify_item_moved`].

use hearthlink_proto::Opcode;
use hearthlink_proto::cmsg::{AutostoreBagItem, DestroyItem, SplitItem, SwapItem};
use hearthlink_proto::smsg::{InventoryFailure, InventoryResult};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use std::sync::Arc;

use crate::client::WorldClient;
use crate::errors::ClientError;

use super::ComponentCore;

/// One observed item relocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemMoved {
    /// The item that moved.
    pub item_guid: u64,
    /// Previous `(bag, slot)`.
    pub from: (u8, u8),
    /// New `(bag, slot)`.
    pub to: (u8, u8),
}

/// Bag-management component.
pub struct Inventory {
    core: ComponentCore,
    errors_tx: broadcast::Sender<String>,
    moved_tx: broadcast::Sender<ItemMoved>,
}

impl Inventory {
    /// Build the component and register the failure stream.
    #[must_use]
    pub fn new(client: Arc<WorldClient>) -> Self {
        let capacity = client.config().update_channel_capacity;
        let core = ComponentCore::new(client);
        let (errors_tx, _) = broadcast::channel(capacity);
        let (moved_tx, _) = broadcast::channel(capacity);

        {
            let tx = errors_tx.clone();
            core.spawn_parser(
                Opcode::SmsgInventoryChangeFailure,
                InventoryFailure::parse,
                move |failure| {
                    if failure.result == InventoryResult::Ok {
                        // Success sentinel: carries no failure, suppressed.
                        trace!("inventory success sentinel suppressed");
                        return;
                    }
                    let _ = tx.send(failure.user_message());
                },
            );
        }

        Self { core, errors_tx, moved_tx }
    }

    /// User-visible failure messages, one per rejected operation.
    #[must_use]
    pub fn inventory_errors(&self) -> broadcast::Receiver<String> {
        self.errors_tx.subscribe()
    }

    /// Item relocation events (fed externally from the object-update
    /// channel).
    #[must_use]
    pub fn item_moved(&self) -> broadcast::Receiver<ItemMoved> {
        self.moved_tx.subscribe()
    }

    /// Publish an externally observed relocation.
    pub fn notify_item_moved(&self, event: ItemMoved) {
        let _ = self.moved_tx.send(event);
    }

    /// Swap two slots.
    pub async fn swap_item(
        &self,
        dst_bag: u8,
        dst_slot: u8,
        src_bag: u8,
        src_slot: u8,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let _op = self.core.begin_op();
        let msg = SwapItem { dst_bag, dst_slot, src_bag, src_slot };
        self.core.client().send_msg(&msg, cancel).await.map_err(ClientError::from)
    }

    /// Split `count` units off a stack. Counts beyond 255 clamp to the
    /// one-byte wire field.
    pub async fn split_item(
        &self,
        src_bag: u8,
        src_slot: u8,
        dst_bag: u8,
        dst_slot: u8,
        count: u32,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let _op = self.core.begin_op();
        let msg = SplitItem::clamped(src_bag, src_slot, dst_bag, dst_slot, count);
        self.core.client().send_msg(&msg, cancel).await.map_err(ClientError::from)
    }

    /// Destroy a stack (count 0 destroys all of it).
    pub async fn destroy_item(
        &self,
        bag: u8,
        slot: u8,
        count: u8,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let _op = self.core.begin_op();
        let msg = DestroyItem { bag, slot, count };
        self.core.client().send_msg(&msg, cancel).await.map_err(ClientError::from)
    }

    /// Store an item into the first free slot of `dst_bag`.
    pub async fn autostore_bag_item(
        &self,
        src_bag: u8,
        src_slot: u8,
        dst_bag: u8,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let _op = self.core.begin_op();
        let msg = AutostoreBagItem { src_bag, src_slot, dst_bag };
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
