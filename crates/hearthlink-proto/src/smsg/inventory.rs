//! Inventory failure payload.
//!
//! `SMSG_INVENTORY_CHANGE_FAILURE` is the server's rejection of any
//! inventory operation (swap, split, equip, buy, ...). A result code of
//! zero is a success sentinel some cores emit; it carries no information
//! and is suppressed by the inventory component.

use crate::{Opcode, PacketReader, Result};

/// Result code of an inventory operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryResult {
    /// Success sentinel; carries no failure.
    Ok,
    /// Item requires a higher level; payload carries the level.
    CantEquipLevelI,
    /// Item requires a skill the character lacks.
    CantEquipSkill,
    /// No room in the target bag.
    BagFull,
    /// A bag being moved still contains items.
    NonEmptyBag,
    /// Item is locked.
    ItemLocked,
    /// Item cannot go into that slot.
    WrongSlot,
    /// Source slot had nothing in it.
    SlotIsEmpty,
    /// Item belongs to someone else.
    NotOwner,
    /// Interaction target is out of range.
    TooFarAway,
    /// Purchase exceeds available funds.
    NotEnoughMoney,
    /// A code outside the mapped set.
    Unknown(u8),
}

impl InventoryResult {
    /// Map a wire code to a result.
    #[must_use]
    pub fn from_u8(code: u8) -> Self {
        match code {
            0 => Self::Ok,
            1 => Self::CantEquipLevelI,
            2 => Self::CantEquipSkill,
            3 => Self::BagFull,
            4 => Self::NonEmptyBag,
            5 => Self::ItemLocked,
            6 => Self::WrongSlot,
            7 => Self::SlotIsEmpty,
            8 => Self::NotOwner,
            9 => Self::TooFarAway,
            10 => Self::NotEnoughMoney,
            other => Self::Unknown(other),
        }
    }

    /// Wire code for this result.
    #[must_use]
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::CantEquipLevelI => 1,
            Self::CantEquipSkill => 2,
            Self::BagFull => 3,
            Self::NonEmptyBag => 4,
            Self::ItemLocked => 5,
            Self::WrongSlot => 6,
            Self::SlotIsEmpty => 7,
            Self::NotOwner => 8,
            Self::TooFarAway => 9,
            Self::NotEnoughMoney => 10,
            Self::Unknown(code) => code,
        }
    }
}

/// A parsed `SMSG_INVENTORY_CHANGE_FAILURE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryFailure {
    /// The failure code.
    pub result: InventoryResult,
    /// Level requirement; present only for [`InventoryResult::CantEquipLevelI`].
    pub required_level: Option<u32>,
    /// GUID of the primary item involved, when reported.
    pub item_guid: Option<u64>,
    /// GUID of the secondary item (swap target), when reported.
    pub other_item_guid: Option<u64>,
}

impl InventoryFailure {
    /// Parse the variable-length payload.
    ///
    /// Layout: `result: u8`, then for `CantEquipLevelI` a `u32` required
    /// level, then up to two item GUIDs depending on how many bytes
    /// remain.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let mut r = PacketReader::new(Opcode::SmsgInventoryChangeFailure, body);
        let result = InventoryResult::from_u8(r.u8()?);

        let required_level = if result == InventoryResult::CantEquipLevelI {
            Some(r.u32()?)
        } else {
            None
        };

        let item_guid = if r.remaining() >= 8 { Some(r.u64()?) } else { None };
        let other_item_guid = if r.remaining() >= 8 { Some(r.u64()?) } else { None };

        Ok(Self { result, required_level, item_guid, other_item_guid })
    }

    /// Stable human-readable description of the failure.
    ///
    /// Unknown codes format with their numeric value rather than failing.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self.result {
            InventoryResult::Ok => "OK".to_owned(),
            InventoryResult::CantEquipLevelI => match self.required_level {
                Some(level) => format!("You must reach level {level} to use that item"),
                None => "You must be a higher level to use that item".to_owned(),
            },
            InventoryResult::CantEquipSkill => {
                "You aren't skilled enough to use that item".to_owned()
            }
            InventoryResult::BagFull => "Inventory is full".to_owned(),
            InventoryResult::NonEmptyBag => "Can only do that with empty bags".to_owned(),
            InventoryResult::ItemLocked => "Item is locked".to_owned(),
            InventoryResult::WrongSlot => "Item can't go in that slot".to_owned(),
            InventoryResult::SlotIsEmpty => "That slot is empty".to_owned(),
            InventoryResult::NotOwner => "You don't own that item".to_owned(),
            InventoryResult::TooFarAway => "You are too far away".to_owned(),
            InventoryResult::NotEnoughMoney => "Not enough money".to_owned(),
            InventoryResult::Unknown(code) => format!("inventory error {code}"),
        }
    }
}
