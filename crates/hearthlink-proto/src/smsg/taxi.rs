//! Flight master payloads.

use crate::{Opcode, PacketReader, Result};

/// Result codes of `SMSG_ACTIVATETAXIREPLY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxiActivateResult {
    /// Flight accepted.
    Ok,
    /// Unspecified server-side failure.
    UnspecifiedServerError,
    /// No flight path between those nodes.
    NoSuchPath,
    /// Not enough money for the fare.
    NotEnoughMoney,
    /// Flight master is too far away.
    TooFarAway,
    /// No flight master nearby.
    NoVendorNearby,
    /// Destination node not yet visited.
    NotVisited,
    /// Player is busy.
    PlayerBusy,
    /// Player is already mounted.
    PlayerAlreadyMounted,
    /// Player is shapeshifted.
    PlayerShapeshifted,
    /// Player is moving.
    PlayerMoving,
    /// Source and destination are the same node.
    SameNode,
    /// Player is not standing.
    NotStanding,
    /// A code outside the known set.
    Unknown(u32),
}

impl TaxiActivateResult {
    /// Map a wire code to a result.
    #[must_use]
    pub const fn from_u32(code: u32) -> Self {
        match code {
            0 => Self::Ok,
            1 => Self::UnspecifiedServerError,
            2 => Self::NoSuchPath,
            3 => Self::NotEnoughMoney,
            4 => Self::TooFarAway,
            5 => Self::NoVendorNearby,
            6 => Self::NotVisited,
            7 => Self::PlayerBusy,
            8 => Self::PlayerAlreadyMounted,
            9 => Self::PlayerShapeshifted,
            10 => Self::PlayerMoving,
            11 => Self::SameNode,
            12 => Self::NotStanding,
            other => Self::Unknown(other),
        }
    }

    /// Parse the 4-byte payload.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let mut r = PacketReader::new(Opcode::SmsgActivateTaxiReply, body);
        Ok(Self::from_u32(r.u32()?))
    }
}

/// The node map a flight master shows, from `SMSG_SHOWTAXINODES`.
///
/// The tail of the payload is a little-endian `u32` bitmask array: node
/// `n` is known iff bit `n % 32` of word `n / 32` is set. Node 0 does not
/// exist and is never reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxiNodeMap {
    /// Leading flag word (1 in every observed capture).
    pub flag: u32,
    /// The flight master NPC.
    pub flight_master_guid: u64,
    /// The node this flight master serves.
    pub current_node_id: u32,
    /// Known node ids, ascending.
    pub known_nodes: Vec<u32>,
}

impl TaxiNodeMap {
    /// Parse the header and decode the bitmask tail.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let mut r = PacketReader::new(Opcode::SmsgShowTaxiNodes, body);
        let flag = r.u32()?;
        let flight_master_guid = r.u64()?;
        let current_node_id = r.u32()?;

        let mut known_nodes = Vec::new();
        let mut word_index = 0u32;
        while r.remaining() >= 4 {
            let word = r.u32()?;
            for bit in 0..32 {
                let node = word_index * 32 + bit;
                if node != 0 && word & (1 << bit) != 0 {
                    known_nodes.push(node);
                }
            }
            word_index += 1;
        }

        Ok(Self { flag, flight_master_guid, current_node_id, known_nodes })
    }

    /// Whether a node is in the known set.
    #[must_use]
    pub fn knows(&self, node_id: u32) -> bool {
        self.known_nodes.binary_search(&node_id).is_ok()
    }
}

/// Reply to a node status query, from `SMSG_TAXINODE_STATUS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxiNodeStatus {
    /// The flight master that was queried.
    pub guid: u64,
    /// Whether the node is already known to the character.
    pub known: bool,
}

impl TaxiNodeStatus {
    /// Parse the 9-byte payload.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let mut r = PacketReader::new(Opcode::SmsgTaxiNodeStatus, body);
        Ok(Self { guid: r.u64()?, known: r.u8()? != 0 })
    }
}
