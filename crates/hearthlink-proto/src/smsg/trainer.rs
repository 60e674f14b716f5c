//! Class trainer payloads.

use crate::{Opcode, PacketReader, ProtocolError, Result};

/// One spell a trainer offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainerSpell {
    /// Position in the trainer window.
    pub index: u32,
    /// Spell template id.
    pub spell_id: u32,
    /// Training cost in copper.
    pub cost: u32,
}

/// Trainer window contents from `SMSG_TRAINER_LIST`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainerList {
    /// The trainer NPC.
    pub guid: u64,
    /// Offered spells in window order.
    pub spells: Vec<TrainerSpell>,
}

impl TrainerList {
    /// Mandatory bytes per entry.
    const ENTRY_WIDTH: usize = 12;

    /// Parse `guid: u64, count: u32` followed by entry rows.
    ///
    /// Each row carries `index, spell_id, cost` and, on some cores, extra
    /// trailing fields. When the remaining bytes divide evenly into wider
    /// rows the surplus per row is skipped; the three leading words are
    /// the contract.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let mut r = PacketReader::new(Opcode::SmsgTrainerList, body);
        let guid = r.u64()?;
        let count = r.u32()? as usize;

        if count == 0 {
            return Ok(Self { guid, spells: Vec::new() });
        }
        if r.remaining() < count * Self::ENTRY_WIDTH {
            return Err(ProtocolError::Truncated {
                opcode: Opcode::SmsgTrainerList,
                expected: count * Self::ENTRY_WIDTH,
                actual: r.remaining(),
            });
        }

        // Per-row width including any extras this core appends.
        let row_width = r.remaining() / count;
        let extra = row_width - Self::ENTRY_WIDTH;

        let mut spells = Vec::with_capacity(count);
        for _ in 0..count {
            let spell = TrainerSpell { index: r.u32()?, spell_id: r.u32()?, cost: r.u32()? };
            r.skip(extra)?;
            spells.push(spell);
        }
        Ok(Self { guid, spells })
    }
}

/// Confirmation of a trainer purchase, from `SMSG_TRAINER_BUY_SUCCEEDED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainerBuySucceeded {
    /// The spell that was learned.
    pub spell_id: u32,
    /// What it cost, in copper.
    pub cost: u32,
}

impl TrainerBuySucceeded {
    /// Parse the 8-byte payload.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let mut r = PacketReader::new(Opcode::SmsgTrainerBuySucceeded, body);
        Ok(Self { spell_id: r.u32()?, cost: r.u32()? })
    }
}

/// Rejection of a trainer purchase, from `SMSG_TRAINER_BUY_FAILED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainerBuyFailed {
    /// Server-side error code.
    pub error_code: u32,
}

impl TrainerBuyFailed {
    /// Parse the 4-byte payload.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let mut r = PacketReader::new(Opcode::SmsgTrainerBuyFailed, body);
        Ok(Self { error_code: r.u32()? })
    }
}
