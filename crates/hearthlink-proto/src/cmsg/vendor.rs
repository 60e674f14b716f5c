//! Vendor interaction messages.

use bytes::{BufMut, BytesMut};

use crate::Opcode;

use super::CmsgBuild;

/// Request a vendor's inventory (`CMSG_LIST_INVENTORY`, 8 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListInventoryRequest {
    /// The vendor NPC.
    pub vendor_guid: u64,
}

impl CmsgBuild for ListInventoryRequest {
    const OPCODE: Opcode = Opcode::CmsgListInventory;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u64_le(self.vendor_guid);
    }
}

/// Buy an item by template id (`CMSG_BUY_ITEM`, 16 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyItem {
    /// The vendor NPC.
    pub vendor_guid: u64,
    /// Item template id.
    pub item_id: u32,
    /// Stacks to buy.
    pub count: u32,
}

impl CmsgBuild for BuyItem {
    const OPCODE: Opcode = Opcode::CmsgBuyItem;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u64_le(self.vendor_guid);
        buf.put_u32_le(self.item_id);
        buf.put_u32_le(self.count);
    }
}

/// Buy an item into a specific bag slot (`CMSG_BUY_ITEM_IN_SLOT`,
/// 18 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyItemInSlot {
    /// The vendor NPC.
    pub vendor_guid: u64,
    /// Item template id.
    pub item_id: u32,
    /// Stacks to buy.
    pub count: u32,
    /// Destination bag.
    pub bag: u8,
    /// Destination slot.
    pub slot: u8,
}

impl CmsgBuild for BuyItemInSlot {
    const OPCODE: Opcode = Opcode::CmsgBuyItemInSlot;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u64_le(self.vendor_guid);
        buf.put_u32_le(self.item_id);
        buf.put_u32_le(self.count);
        buf.put_u8(self.bag);
        buf.put_u8(self.slot);
    }
}

/// Sell an item to a vendor (`CMSG_SELL_ITEM`, 14 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SellItem {
    /// The vendor NPC.
    pub vendor_guid: u64,
    /// Item template id being sold.
    pub item_id: u32,
    /// Units to sell (0 sells the whole stack).
    pub count: u16,
}

impl CmsgBuild for SellItem {
    const OPCODE: Opcode = Opcode::CmsgSellItem;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u64_le(self.vendor_guid);
        buf.put_u32_le(self.item_id);
        buf.put_u16_le(self.count);
    }
}

/// Repair gear at an armorer (`CMSG_REPAIR_ITEM`, 10 bytes).
///
/// Repair-all is encoded with `bag = slot = 0xFF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairItem {
    /// The repair NPC.
    pub npc_guid: u64,
    /// Bag of the item to repair.
    pub bag: u8,
    /// Slot of the item to repair.
    pub slot: u8,
}

impl RepairItem {
    /// Sentinel for "repair everything".
    pub const ALL: u8 = 0xFF;

    /// Build a repair-all request.
    #[must_use]
    pub fn all(npc_guid: u64) -> Self {
        Self { npc_guid, bag: Self::ALL, slot: Self::ALL }
    }
}

impl CmsgBuild for RepairItem {
    const OPCODE: Opcode = Opcode::CmsgRepairItem;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u64_le(self.npc_guid);
        buf.put_u8(self.bag);
        buf.put_u8(self.slot);
    }
}
