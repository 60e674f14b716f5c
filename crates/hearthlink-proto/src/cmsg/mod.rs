//! Typed builders for the client messages the components originate.
//!
//! Each builder is a plain record implementing [`CmsgBuild`]: a fixed
//! opcode plus an `encode` writing the little-endian body. The send path
//! wraps the body in a 6-byte outbound header (see [`crate::frame`]) and
//! the header cipher masks it just before the write.

pub mod inventory;
pub mod misc;
pub mod social;
pub mod taxi;
pub mod trainer;
pub mod vendor;

use bytes::{Bytes, BytesMut};

use crate::Opcode;

pub use inventory::{AutostoreBagItem, DestroyItem, SplitItem, SwapItem};
pub use misc::{Emote, GameObjUse, GossipHello, PetAction, SetSelection, TextEmote};
pub use social::{AddFriend, AddIgnore, DelFriend, DelIgnore, FriendListRequest};
pub use taxi::{
    ActivateTaxi, ActivateTaxiExpress, TaxiClearAllNodes, TaxiClearNode, TaxiEnableAllNodes,
    TaxiEnableNode, TaxiNodeStatusQuery, TaxiQueryAvailableNodes, TaxiShowNodes,
};
pub use trainer::{TrainerBuySpell, TrainerListRequest};
pub use vendor::{BuyItem, BuyItemInSlot, ListInventoryRequest, RepairItem, SellItem};

/// A client-to-server message that knows its opcode and body layout.
pub trait CmsgBuild {
    /// The opcode this message is sent under.
    const OPCODE: Opcode;

    /// Append the body bytes.
    fn encode(&self, buf: &mut BytesMut);

    /// Build the body as an owned buffer.
    fn body(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.encode(&mut buf);
        buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_matches_encode() {
        let msg = SetSelection { guid: 0x0102_0304_0506_0708 };
        let mut buf = BytesMut::new();
        msg.encode(&mut buf);
        assert_eq!(msg.body(), buf.freeze());
    }
}
