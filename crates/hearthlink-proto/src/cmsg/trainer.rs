//! Class trainer messages.

use bytes::{BufMut, BytesMut};

use crate::Opcode;

use super::CmsgBuild;

/// Request a trainer's spell list (`CMSG_TRAINER_LIST`, 8 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainerListRequest {
    /// The trainer NPC.
    pub guid: u64,
}

impl CmsgBuild for TrainerListRequest {
    const OPCODE: Opcode = Opcode::CmsgTrainerList;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u64_le(self.guid);
    }
}

/// Buy a spell from a trainer (`CMSG_TRAINER_BUY_SPELL`, 12 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainerBuySpell {
    /// The trainer NPC.
    pub guid: u64,
    /// Spell to learn.
    pub spell_id: u32,
}

impl CmsgBuild for TrainerBuySpell {
    const OPCODE: Opcode = Opcode::CmsgTrainerBuySpell;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u64_le(self.guid);
        buf.put_u32_le(self.spell_id);
    }
}
