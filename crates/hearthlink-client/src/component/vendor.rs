//! Vendor component.
//!
//! Window state machine: `Closed → (LIST_INVENTORY) Open → (GOSSIP_COMPLETE
//! or explicit close) Closed`. Purchases and sales require an open window;
//! bulk selling paces itself, honors a wall-clock budget, and routes
//! soulbound items to a confirmation stream instead of selling them unless
//! explicitly opted in.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use hearthlink_proto::Opcode;
use hearthlink_proto::cmsg::{BuyItem, BuyItemInSlot, ListInventoryRequest, RepairItem, SellItem};
use hearthlink_proto::smsg::VendorInventory;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::WorldClient;
use crate::errors::ClientError;

use super::{ComponentCore, lock};

/// Vendor window transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VendorWindowEvent {
    /// A vendor listing arrived; the window is open.
    Opened(Arc<VendorInventory>),
    /// The window closed (server gossip-complete or local close).
    Closed,
}

/// One item offered to a bulk sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SellCandidate {
    /// Item template id.
    pub item_id: u32,
    /// Whether the item is soulbound; soulbound items need explicit
    /// opt-in or go to the confirmation stream.
    pub soulbound: bool,
}

/// Pacing and safety options for [`Vendor::sell_all_junk`].
#[derive(Debug, Clone)]
pub struct BulkSellOptions {
    /// Pause between sales.
    pub per_item_delay: Duration,
    /// Wall-clock budget for the whole sweep.
    pub max_total_duration: Duration,
    /// Sell soulbound items instead of queuing confirmations.
    pub sell_soulbound: bool,
}

impl Default for BulkSellOptions {
    fn default() -> Self {
        Self {
            per_item_delay: Duration::from_millis(200),
            max_total_duration: Duration::from_secs(10),
            sell_soulbound: false,
        }
    }
}

/// Outcome of a bulk sell sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BulkSellReport {
    /// Items actually sold.
    pub sold: u32,
    /// Soulbound items routed to the confirmation stream.
    pub queued_confirmations: u32,
    /// Whether the wall-clock budget expired before the sweep finished.
    pub timed_out: bool,
}

/// Vendor interaction component.
pub struct Vendor {
    core: ComponentCore,
    window: Arc<Mutex<Option<Arc<VendorInventory>>>>,
    window_tx: broadcast::Sender<VendorWindowEvent>,
    confirm_tx: broadcast::Sender<SellCandidate>,
}

impl Vendor {
    /// Build the component and register its opcode streams.
    #[must_use]
    pub fn new(client: Arc<WorldClient>) -> Self {
        let capacity = client.config().update_channel_capacity;
        let core = ComponentCore::new(client);
        let window = Arc::new(Mutex::new(None));
        let (window_tx, _) = broadcast::channel(capacity);
        let (confirm_tx, _) = broadcast::channel(capacity);

        {
            let window = Arc::clone(&window);
            let tx = window_tx.clone();
            core.spawn_parser(Opcode::SmsgListInventory, VendorInventory::parse, move |listing| {
                let listing = Arc::new(listing);
                *lock(&window) = Some(Arc::clone(&listing));
                let _ = tx.send(VendorWindowEvent::Opened(listing));
            });
        }
        {
            let window = Arc::clone(&window);
            let tx = window_tx.clone();
            // GOSSIP_COMPLETE has an empty body; any payload closes the
            // window regardless.
            core.spawn_parser(Opcode::SmsgGossipComplete, |_body| Ok(()), move |()| {
                if lock(&window).take().is_some() {
                    let _ = tx.send(VendorWindowEvent::Closed);
                }
            });
        }

        Self { core, window, window_tx, confirm_tx }
    }

    /// The open vendor listing, if any.
    #[must_use]
    pub fn open_window(&self) -> Option<Arc<VendorInventory>> {
        lock(&self.window).clone()
    }

    /// Window open/close events.
    #[must_use]
    pub fn window_events(&self) -> broadcast::Receiver<VendorWindowEvent> {
        self.window_tx.subscribe()
    }

    /// Soulbound items awaiting an explicit sell decision.
    #[must_use]
    pub fn sell_confirmations(&self) -> broadcast::Receiver<SellCandidate> {
        self.confirm_tx.subscribe()
    }

    /// Ask a vendor for its inventory; the window opens when the listing
    /// arrives.
    pub async fn open(&self, vendor_guid: u64, cancel: &CancellationToken) -> Result<(), ClientError> {
        let _op = self.core.begin_op();
        self.core
            .client()
            .send_msg(&ListInventoryRequest { vendor_guid }, cancel)
            .await
            .map_err(ClientError::from)
    }

    /// Close the window locally (no close opcode exists; the server side
    /// only closes via gossip-complete).
    pub fn close(&self) {
        if lock(&self.window).take().is_some() {
            let _ = self.window_tx.send(VendorWindowEvent::Closed);
        }
    }

    fn require_open(&self) -> Result<Arc<VendorInventory>, ClientError> {
        self.open_window()
            .ok_or_else(|| ClientError::Protocol("vendor window is not open".to_owned()))
    }

    /// Buy `count` stacks of an item.
    pub async fn buy_item(
        &self,
        item_id: u32,
        count: u32,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let listing = self.require_open()?;
        let _op = self.core.begin_op();
        let msg = BuyItem { vendor_guid: listing.vendor_guid, item_id, count };
        self.core.client().send_msg(&msg, cancel).await.map_err(ClientError::from)
    }

    /// Buy an item directly into a bag slot.
    pub async fn buy_item_in_slot(
        &self,
        item_id: u32,
        count: u32,
        bag: u8,
        slot: u8,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let listing = self.require_open()?;
        let _op = self.core.begin_op();
        let msg = BuyItemInSlot { vendor_guid: listing.vendor_guid, item_id, count, bag, slot };
        self.core.client().send_msg(&msg, cancel).await.map_err(ClientError::from)
    }

    /// Sell one item.
    pub async fn sell_item(
        &self,
        item_id: u32,
        count: u16,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let listing = self.require_open()?;
        let _op = self.core.begin_op();
        let msg = SellItem { vendor_guid: listing.vendor_guid, item_id, count };
        self.core.client().send_msg(&msg, cancel).await.map_err(ClientError::from)
    }

    /// Repair one item at this vendor.
    pub async fn repair_item(
        &self,
        bag: u8,
        slot: u8,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let listing = self.require_open()?;
        let _op = self.core.begin_op();
        let msg = RepairItem { npc_guid: listing.vendor_guid, bag, slot };
        self.core.client().send_msg(&msg, cancel).await.map_err(ClientError::from)
    }

    /// Repair everything at this vendor.
    pub async fn repair_all(&self, cancel: &CancellationToken) -> Result<(), ClientError> {
        let listing = self.require_open()?;
        let _op = self.core.begin_op();
        let msg = RepairItem::all(listing.vendor_guid);
        self.core.client().send_msg(&msg, cancel).await.map_err(ClientError::from)
    }

    /// Sell a batch of items with pacing and a wall-clock budget.
    ///
    /// The item database lives outside the core, so callers supply the
    /// candidates. Soulbound candidates are queued on
    /// [`Vendor::sell_confirmations`] unless `sell_soulbound` is set.
    /// Expiry of `max_total_duration` aborts cleanly with
    /// `timed_out = true` in the report.
    pub async fn sell_all_junk(
        &self,
        candidates: &[SellCandidate],
        options: &BulkSellOptions,
        cancel: &CancellationToken,
    ) -> Result<BulkSellReport, ClientError> {
        self.require_open()?;
        let _op = self.core.begin_op();

        let deadline = Instant::now() + options.max_total_duration;
        let mut report = BulkSellReport::default();

        for candidate in candidates {
            if Instant::now() >= deadline {
                report.timed_out = true;
                break;
            }
            if cancel.is_cancelled() {
                return Err(ClientError::Cancelled);
            }

            if candidate.soulbound && !options.sell_soulbound {
                report.queued_confirmations += 1;
                let _ = self.confirm_tx.send(*candidate);
                continue;
            }

            // The window may have closed mid-sweep.
            let listing = self.require_open()?;
            let msg = SellItem { vendor_guid: listing.vendor_guid, item_id: candidate.item_id, count: 0 };
            self.core.client().send_msg(&msg, cancel).await.map_err(ClientError::from)?;
            report.sold += 1;

            let pause = tokio::time::sleep_until(deadline.min(Instant::now() + options.per_item_delay));
            tokio::select! {
                () = cancel.cancelled() => return Err(ClientError::Cancelled),
                () = pause => {}
            }
        }

        debug!(sold = report.sold, queued = report.queued_confirmations,
               timed_out = report.timed_out, "bulk sell finished");
        Ok(report)
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
