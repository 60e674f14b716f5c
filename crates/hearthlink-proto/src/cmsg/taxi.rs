//! Flight master messages.

use bytes::{BufMut, BytesMut};

use crate::Opcode;

use super::CmsgBuild;

/// Ask whether a flight master's node is known
/// (`CMSG_TAXINODE_STATUS_QUERY`, 8 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxiNodeStatusQuery {
    /// The flight master NPC.
    pub guid: u64,
}

impl CmsgBuild for TaxiNodeStatusQuery {
    const OPCODE: Opcode = Opcode::CmsgTaxiNodeStatusQuery;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u64_le(self.guid);
    }
}

/// Ask a flight master for reachable nodes
/// (`CMSG_TAXIQUERYAVAILABLENODES`, 8 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxiQueryAvailableNodes {
    /// The flight master NPC.
    pub guid: u64,
}

impl CmsgBuild for TaxiQueryAvailableNodes {
    const OPCODE: Opcode = Opcode::CmsgTaxiQueryAvailableNodes;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u64_le(self.guid);
    }
}

/// Take a flight (`CMSG_ACTIVATETAXI`, 16 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivateTaxi {
    /// The flight master NPC.
    pub guid: u64,
    /// Departure node.
    pub src_node: u32,
    /// Destination node.
    pub dst_node: u32,
}

impl CmsgBuild for ActivateTaxi {
    const OPCODE: Opcode = Opcode::CmsgActivateTaxi;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u64_le(self.guid);
        buf.put_u32_le(self.src_node);
        buf.put_u32_le(self.dst_node);
    }
}

/// Take a flight without the pathing preamble
/// (`CMSG_ACTIVATETAXIEXPRESS`, 16 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivateTaxiExpress {
    /// The flight master NPC.
    pub guid: u64,
    /// Departure node.
    pub src_node: u32,
    /// Destination node.
    pub dst_node: u32,
}

impl CmsgBuild for ActivateTaxiExpress {
    const OPCODE: Opcode = Opcode::CmsgActivateTaxiExpress;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u64_le(self.guid);
        buf.put_u32_le(self.src_node);
        buf.put_u32_le(self.dst_node);
    }
}

/// Clear one known node (`CMSG_TAXICLEARNODE`, 4 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxiClearNode {
    /// Node to clear.
    pub node: u32,
}

impl CmsgBuild for TaxiClearNode {
    const OPCODE: Opcode = Opcode::CmsgTaxiClearNode;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32_le(self.node);
    }
}

/// Mark one node as known (`CMSG_TAXIENABLENODE`, 4 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxiEnableNode {
    /// Node to mark known.
    pub node: u32,
}

impl CmsgBuild for TaxiEnableNode {
    const OPCODE: Opcode = Opcode::CmsgTaxiEnableNode;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32_le(self.node);
    }
}

/// Request the known-node map (`CMSG_TAXISHOWNODES`, empty body).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaxiShowNodes;

impl CmsgBuild for TaxiShowNodes {
    const OPCODE: Opcode = Opcode::CmsgTaxiShowNodes;

    fn encode(&self, _buf: &mut BytesMut) {}
}

/// Clear every known node (`CMSG_TAXICLEARALLNODES`, empty body).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaxiClearAllNodes;

impl CmsgBuild for TaxiClearAllNodes {
    const OPCODE: Opcode = Opcode::CmsgTaxiClearAllNodes;

    fn encode(&self, _buf: &mut BytesMut) {}
}

/// Mark every node as known (`CMSG_TAXIENABLEALLNODES`, empty body).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaxiEnableAllNodes;

impl CmsgBuild for TaxiEnableAllNodes {
    const OPCODE: Opcode = Opcode::CmsgTaxiEnableAllNodes;

    fn encode(&self, _buf: &mut BytesMut) {}
}
