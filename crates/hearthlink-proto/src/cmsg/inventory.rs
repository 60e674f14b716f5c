//! Inventory manipulation messages.
//!
//! Bag/slot pairs address items: bag 255 is the backpack, other values
//! are equipped bag slots. All fields are single bytes.

use bytes::{BufMut, BytesMut};

use crate::Opcode;

use super::CmsgBuild;

/// Swap the contents of two slots (`CMSG_SWAP_ITEM`, 4 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapItem {
    /// Destination bag.
    pub dst_bag: u8,
    /// Destination slot.
    pub dst_slot: u8,
    /// Source bag.
    pub src_bag: u8,
    /// Source slot.
    pub src_slot: u8,
}

impl CmsgBuild for SwapItem {
    const OPCODE: Opcode = Opcode::CmsgSwapItem;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.dst_bag);
        buf.put_u8(self.dst_slot);
        buf.put_u8(self.src_bag);
        buf.put_u8(self.src_slot);
    }
}

/// Split a stack between two slots (`CMSG_SPLIT_ITEM`, 5 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitItem {
    /// Source bag.
    pub src_bag: u8,
    /// Source slot.
    pub src_slot: u8,
    /// Destination bag.
    pub dst_bag: u8,
    /// Destination slot.
    pub dst_slot: u8,
    /// Units to move; the wire field is one byte.
    pub count: u8,
}

impl SplitItem {
    /// Build a split, clamping `count` to the one-byte wire field.
    #[must_use]
    pub fn clamped(src_bag: u8, src_slot: u8, dst_bag: u8, dst_slot: u8, count: u32) -> Self {
        Self {
            src_bag,
            src_slot,
            dst_bag,
            dst_slot,
            count: u8::try_from(count).unwrap_or(u8::MAX),
        }
    }
}

impl CmsgBuild for SplitItem {
    const OPCODE: Opcode = Opcode::CmsgSplitItem;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.src_bag);
        buf.put_u8(self.src_slot);
        buf.put_u8(self.dst_bag);
        buf.put_u8(self.dst_slot);
        buf.put_u8(self.count);
    }
}

/// Destroy an item stack (`CMSG_DESTROYITEM`, 6 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestroyItem {
    /// Bag holding the item.
    pub bag: u8,
    /// Slot within the bag.
    pub slot: u8,
    /// Units to destroy (0 destroys the whole stack).
    pub count: u8,
}

impl CmsgBuild for DestroyItem {
    const OPCODE: Opcode = Opcode::CmsgDestroyItem;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.bag);
        buf.put_u8(self.slot);
        buf.put_u8(self.count);
        // Three reserved bytes, always zero.
        buf.put_bytes(0, 3);
    }
}

/// Store an item into the first free slot of a bag
/// (`CMSG_AUTOSTORE_BAG_ITEM`, 3 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutostoreBagItem {
    /// Bag holding the item.
    pub src_bag: u8,
    /// Slot within the source bag.
    pub src_slot: u8,
    /// Bag to store into.
    pub dst_bag: u8,
}

impl CmsgBuild for AutostoreBagItem {
    const OPCODE: Opcode = Opcode::CmsgAutostoreBagItem;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.src_bag);
        buf.put_u8(self.src_slot);
        buf.put_u8(self.dst_bag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_layout() {
        let body = SwapItem { dst_bag: 255, dst_slot: 23, src_bag: 19, src_slot: 1 }.body();
        assert_eq!(&body[..], &[255, 23, 19, 1]);
    }

    #[test]
    fn split_layout_and_clamp() {
        let body = SplitItem::clamped(255, 23, 255, 24, 10).body();
        assert_eq!(&body[..], &[255, 23, 255, 24, 10]);

        let clamped = SplitItem::clamped(0, 0, 0, 1, 1000);
        assert_eq!(clamped.count, 255);
    }

    #[test]
    fn destroy_carries_reserved_zeros() {
        let body = DestroyItem { bag: 255, slot: 30, count: 0 }.body();
        assert_eq!(&body[..], &[255, 30, 0, 0, 0, 0]);
        assert_eq!(body.len(), 6);
    }

    #[test]
    fn autostore_layout() {
        let body = AutostoreBagItem { src_bag: 255, src_slot: 16, dst_bag: 19 }.body();
        assert_eq!(&body[..], &[255, 16, 19]);
    }
}
