//! Opcode table for the dispatched message set.
//!
//! The full 1.12.1 protocol defines several hundred opcodes; this client
//! routes only the set it actually handles. Inbound frames carry `SMSG_*`
//! codes and outbound headers carry `CMSG_*` codes. The numeric spaces
//! overlap in the full protocol but never in context, so the framer maps
//! inbound values through [`Opcode::from_server_u16`] only.
//!
//! Numeric values follow the vanilla (MaNGOS) opcode table.

use std::fmt;

/// Message direction, encoded in the opcode name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Server-to-client (`SMSG_*`).
    ServerToClient,
    /// Client-to-server (`CMSG_*`).
    ClientToServer,
}

macro_rules! opcodes {
    ($( $(#[$meta:meta])* $variant:ident = ($value:literal, $name:literal, $dir:ident) ),+ $(,)?) => {
        /// A 16-bit message identifier from the dispatched set.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u16)]
        pub enum Opcode {
            $( $(#[$meta])* $variant = $value, )+
        }

        impl Opcode {
            /// Every opcode in the dispatched set.
            pub const ALL: &'static [Self] = &[ $( Self::$variant, )+ ];

            /// Numeric wire identifier.
            #[must_use]
            pub const fn to_u16(self) -> u16 {
                self as u16
            }

            /// Look up any dispatched opcode by numeric value.
            #[must_use]
            pub const fn from_u16(value: u16) -> Option<Self> {
                match value {
                    $( $value => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// Canonical protocol name (`SMSG_*` / `CMSG_*`).
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $name, )+
                }
            }

            /// Which side originates this message.
            #[must_use]
            pub const fn direction(self) -> Direction {
                match self {
                    $( Self::$variant => Direction::$dir, )+
                }
            }
        }
    };
}

opcodes! {
    // Social
    /// Request the friend list.
    CmsgFriendList = (0x066, "CMSG_FRIEND_LIST", ClientToServer),
    /// Full friend list snapshot.
    SmsgFriendList = (0x067, "SMSG_FRIEND_LIST", ServerToClient),
    /// Single friend status transition.
    SmsgFriendStatus = (0x068, "SMSG_FRIEND_STATUS", ServerToClient),
    /// Add a friend by name.
    CmsgAddFriend = (0x069, "CMSG_ADD_FRIEND", ClientToServer),
    /// Remove a friend by GUID.
    CmsgDelFriend = (0x06A, "CMSG_DEL_FRIEND", ClientToServer),
    /// Full ignore list snapshot.
    SmsgIgnoreList = (0x06B, "SMSG_IGNORE_LIST", ServerToClient),
    /// Add an ignore by name.
    CmsgAddIgnore = (0x06C, "CMSG_ADD_IGNORE", ClientToServer),
    /// Remove an ignore by name.
    CmsgDelIgnore = (0x06D, "CMSG_DEL_IGNORE", ClientToServer),

    // World interaction
    /// Use a game object by GUID.
    CmsgGameObjUse = (0x0B1, "CMSG_GAMEOBJ_USE", ClientToServer),
    /// Tutorial completion bitmask.
    SmsgTutorialFlags = (0x0FD, "SMSG_TUTORIAL_FLAGS", ServerToClient),
    /// Play an emote animation.
    CmsgEmote = (0x102, "CMSG_EMOTE", ClientToServer),
    /// Perform a text emote at a target.
    CmsgTextEmote = (0x104, "CMSG_TEXT_EMOTE", ClientToServer),

    // Inventory
    /// Store an item into a bag, first free slot.
    CmsgAutostoreBagItem = (0x10B, "CMSG_AUTOSTORE_BAG_ITEM", ClientToServer),
    /// Swap two item slots.
    CmsgSwapItem = (0x10C, "CMSG_SWAP_ITEM", ClientToServer),
    /// Split a stack between two slots.
    CmsgSplitItem = (0x10E, "CMSG_SPLIT_ITEM", ClientToServer),
    /// Destroy an item stack.
    CmsgDestroyItem = (0x111, "CMSG_DESTROYITEM", ClientToServer),
    /// Server rejected an inventory operation.
    SmsgInventoryChangeFailure = (0x112, "SMSG_INVENTORY_CHANGE_FAILURE", ServerToClient),

    // Character initialization
    /// Faction standings at login.
    SmsgInitializeFactions = (0x122, "SMSG_INITIALIZE_FACTIONS", ServerToClient),
    /// Weapon/armor proficiency grant.
    SmsgSetProficiency = (0x127, "SMSG_SET_PROFICIENCY", ServerToClient),
    /// The 120-slot action bar.
    SmsgActionButtons = (0x129, "SMSG_ACTION_BUTTONS", ServerToClient),
    /// Select the current target.
    CmsgSetSelection = (0x13D, "CMSG_SET_SELECTION", ClientToServer),
    /// Hearthstone bind location.
    SmsgBindPointUpdate = (0x155, "SMSG_BINDPOINTUPDATE", ServerToClient),

    // Pet
    /// Issue a pet action bar command.
    CmsgPetAction = (0x175, "CMSG_PET_ACTION", ClientToServer),

    // Gossip / vendor
    /// Open a gossip dialog with an NPC.
    CmsgGossipHello = (0x17B, "CMSG_GOSSIP_HELLO", ClientToServer),
    /// Gossip dialog closed by the server.
    SmsgGossipComplete = (0x17E, "SMSG_GOSSIP_COMPLETE", ServerToClient),
    /// Request a vendor's inventory.
    CmsgListInventory = (0x19E, "CMSG_LIST_INVENTORY", ClientToServer),
    /// Vendor inventory listing.
    SmsgListInventory = (0x19F, "SMSG_LIST_INVENTORY", ServerToClient),
    /// Sell an item to a vendor.
    CmsgSellItem = (0x1A0, "CMSG_SELL_ITEM", ClientToServer),
    /// Buy an item by entry.
    CmsgBuyItem = (0x1A2, "CMSG_BUY_ITEM", ClientToServer),
    /// Buy an item into a specific slot.
    CmsgBuyItemInSlot = (0x1A3, "CMSG_BUY_ITEM_IN_SLOT", ClientToServer),

    // Taxi
    /// Flight master node map.
    SmsgShowTaxiNodes = (0x1A9, "SMSG_SHOWTAXINODES", ServerToClient),
    /// Query whether a flight master's node is known.
    CmsgTaxiNodeStatusQuery = (0x1AA, "CMSG_TAXINODE_STATUS_QUERY", ClientToServer),
    /// Reply to a node status query.
    SmsgTaxiNodeStatus = (0x1AB, "SMSG_TAXINODE_STATUS", ServerToClient),
    /// Ask a flight master for reachable nodes.
    CmsgTaxiQueryAvailableNodes = (0x1AC, "CMSG_TAXIQUERYAVAILABLENODES", ClientToServer),
    /// Take a flight.
    CmsgActivateTaxi = (0x1AD, "CMSG_ACTIVATETAXI", ClientToServer),
    /// Result of a flight activation.
    SmsgActivateTaxiReply = (0x1AE, "SMSG_ACTIVATETAXIREPLY", ServerToClient),

    // Trainer
    /// Request a trainer's spell list.
    CmsgTrainerList = (0x1B0, "CMSG_TRAINER_LIST", ClientToServer),
    /// Trainer spell listing.
    SmsgTrainerList = (0x1B1, "SMSG_TRAINER_LIST", ServerToClient),
    /// Buy a spell from a trainer.
    CmsgTrainerBuySpell = (0x1B2, "CMSG_TRAINER_BUY_SPELL", ClientToServer),
    /// Trainer purchase succeeded.
    SmsgTrainerBuySucceeded = (0x1B3, "SMSG_TRAINER_BUY_SUCCEEDED", ServerToClient),
    /// Trainer purchase failed.
    SmsgTrainerBuyFailed = (0x1B4, "SMSG_TRAINER_BUY_FAILED", ServerToClient),

    // Taxi map maintenance
    /// Clear every known taxi node.
    CmsgTaxiClearAllNodes = (0x241, "CMSG_TAXICLEARALLNODES", ClientToServer),
    /// Mark every taxi node as known.
    CmsgTaxiEnableAllNodes = (0x242, "CMSG_TAXIENABLEALLNODES", ClientToServer),
    /// Clear one taxi node.
    CmsgTaxiClearNode = (0x243, "CMSG_TAXICLEARNODE", ClientToServer),
    /// Mark one taxi node as known.
    CmsgTaxiEnableNode = (0x244, "CMSG_TAXIENABLENODE", ClientToServer),
    /// Request the known-node map outside a flight master dialog.
    CmsgTaxiShowNodes = (0x245, "CMSG_TAXISHOWNODES", ClientToServer),

    // Durability
    /// Repair one item or everything (bag = slot = 0xFF).
    CmsgRepairItem = (0x2A8, "CMSG_REPAIR_ITEM", ClientToServer),

    // Express taxi (multi-hop)
    /// Take a flight along an explicit node path.
    CmsgActivateTaxiExpress = (0x312, "CMSG_ACTIVATETAXIEXPRESS", ClientToServer),
}

impl Opcode {
    /// Look up an inbound opcode. Only `SMSG_*` codes resolve; the CMSG
    /// numeric space is not valid in server-to-client frames.
    #[must_use]
    pub fn from_server_u16(value: u16) -> Option<Self> {
        Self::from_u16(value).filter(|op| op.direction() == Direction::ServerToClient)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_round_trip() {
        for &op in Opcode::ALL {
            assert_eq!(Opcode::from_u16(op.to_u16()), Some(op));
        }
    }

    #[test]
    fn values_are_unique() {
        let mut values: Vec<u16> = Opcode::ALL.iter().map(|op| op.to_u16()).collect();
        values.sort_unstable();
        values.dedup();
        assert_eq!(values.len(), Opcode::ALL.len());
    }

    #[test]
    fn names_match_direction() {
        for &op in Opcode::ALL {
            match op.direction() {
                Direction::ServerToClient => assert!(op.name().starts_with("SMSG_")),
                Direction::ClientToServer => assert!(op.name().starts_with("CMSG_")),
            }
        }
    }

    #[test]
    fn server_lookup_rejects_client_codes() {
        assert_eq!(Opcode::from_server_u16(0x13D), None); // CMSG_SET_SELECTION
        assert_eq!(
            Opcode::from_server_u16(0x129),
            Some(Opcode::SmsgActionButtons)
        );
    }

    #[test]
    fn unknown_value_does_not_resolve() {
        assert_eq!(Opcode::from_u16(0xFFFF), None);
        assert_eq!(Opcode::from_server_u16(0xFFFF), None);
    }
}
