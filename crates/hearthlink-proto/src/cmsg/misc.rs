//! Targeting, gossip, emote, game object, and pet messages.

use bytes::{BufMut, BytesMut};

use crate::Opcode;

use super::CmsgBuild;

/// Select the current target (`CMSG_SET_SELECTION`, 8 bytes).
///
/// GUID zero clears the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetSelection {
    /// Target GUID, or zero for none.
    pub guid: u64,
}

impl CmsgBuild for SetSelection {
    const OPCODE: Opcode = Opcode::CmsgSetSelection;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u64_le(self.guid);
    }
}

/// Open a gossip dialog with an NPC (`CMSG_GOSSIP_HELLO`, 8 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GossipHello {
    /// The NPC to greet.
    pub guid: u64,
}

impl CmsgBuild for GossipHello {
    const OPCODE: Opcode = Opcode::CmsgGossipHello;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u64_le(self.guid);
    }
}

/// Play an emote animation (`CMSG_EMOTE`, 4 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Emote {
    /// Emote animation id.
    pub emote_id: u32,
}

impl CmsgBuild for Emote {
    const OPCODE: Opcode = Opcode::CmsgEmote;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32_le(self.emote_id);
    }
}

/// Perform a text emote at a target (`CMSG_TEXT_EMOTE`, 12 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEmote {
    /// Text emote id.
    pub text_emote_id: u32,
    /// Target GUID, or zero for none.
    pub target_guid: u64,
}

impl CmsgBuild for TextEmote {
    const OPCODE: Opcode = Opcode::CmsgTextEmote;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32_le(self.text_emote_id);
        buf.put_u64_le(self.target_guid);
    }
}

/// Use a game object (`CMSG_GAMEOBJ_USE`, 8 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameObjUse {
    /// The object to use.
    pub guid: u64,
}

impl CmsgBuild for GameObjUse {
    const OPCODE: Opcode = Opcode::CmsgGameObjUse;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u64_le(self.guid);
    }
}

/// Issue a pet action bar command (`CMSG_PET_ACTION`, 12 or 20 bytes).
///
/// The target GUID is appended only for targeted actions (attack, cast at
/// unit), which is why the wire length varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PetAction {
    /// The pet being commanded.
    pub pet_guid: u64,
    /// Packed action word from the pet bar.
    pub action: u32,
    /// Target for targeted actions.
    pub target_guid: Option<u64>,
}

impl CmsgBuild for PetAction {
    const OPCODE: Opcode = Opcode::CmsgPetAction;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u64_le(self.pet_guid);
        buf.put_u32_le(self.action);
        if let Some(target) = self.target_guid {
            buf.put_u64_le(target);
        }
    }
}
