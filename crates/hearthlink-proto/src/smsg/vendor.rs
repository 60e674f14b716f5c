//! Vendor inventory payload.

use crate::{Opcode, PacketReader, ProtocolError, Result};

/// One item a vendor offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorItem {
    /// Position in the vendor window (low byte of the wire word).
    pub slot: u8,
    /// Item template id.
    pub item_id: u32,
    /// Price in copper for one stack.
    pub price: u32,
    /// Units per purchase.
    pub stack_size: u32,
}

/// Vendor window contents from `SMSG_LIST_INVENTORY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorInventory {
    /// The vendor NPC.
    pub vendor_guid: u64,
    /// Items in window order.
    pub items: Vec<VendorItem>,
}

impl VendorInventory {
    /// Bytes per item row.
    const ITEM_WIDTH: usize = 16;

    /// Parse `vendor_guid: u64, count: u32` followed by 16-byte item rows.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let mut r = PacketReader::new(Opcode::SmsgListInventory, body);
        let vendor_guid = r.u64()?;
        let count = r.u32()? as usize;
        if r.remaining() < count * Self::ITEM_WIDTH {
            return Err(ProtocolError::Truncated {
                opcode: Opcode::SmsgListInventory,
                expected: count * Self::ITEM_WIDTH,
                actual: r.remaining(),
            });
        }
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(VendorItem {
                slot: r.u32()? as u8,
                item_id: r.u32()?,
                price: r.u32()?,
                stack_size: r.u32()?,
            });
        }
        Ok(Self { vendor_guid, items })
    }
}
