//! Frame header codec.
//!
//! The wire frame is a small header followed by the opaque body. Headers
//! are the only obfuscated portion of the stream, and the only place where
//! big-endian appears: the size field. Widths differ by direction:
//!
//! - inbound (server-to-client): 4 bytes — `size: u16 BE` counting the
//!   2-byte opcode plus the body, then `opcode: u16 LE`
//! - outbound (client-to-server): 6 bytes — `size: u16 BE` counting the
//!   4-byte opcode plus the body, then `opcode: u32 LE`
//!
//! This module is authoritative for those widths; everything else in the
//! workspace goes through it.

use bytes::{BufMut, BytesMut};

use crate::{Opcode, ProtocolError, Result};

/// Largest outbound body the 16-bit size field can describe.
///
/// `size = body_len + 4` must fit in a u16.
pub const MAX_OUTBOUND_BODY: usize = u16::MAX as usize - ClientHeader::OPCODE_WIDTH;

/// Largest inbound body the 16-bit size field can describe.
pub const MAX_INBOUND_BODY: usize = u16::MAX as usize - ServerHeader::OPCODE_WIDTH;

/// Parsed inbound (server-to-client) frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerHeader {
    /// Raw numeric opcode. Mapped to [`Opcode`] at dispatch, not here: an
    /// unknown opcode is still a well-framed packet whose body must be
    /// consumed from the stream.
    pub opcode: u16,
    /// Body length in bytes (size field minus the opcode width).
    pub body_len: usize,
}

impl ServerHeader {
    /// Header width on the wire.
    pub const SIZE: usize = 4;
    /// Width of the opcode counted by the size field.
    pub const OPCODE_WIDTH: usize = 2;

    /// Parse a (deciphered) inbound header.
    ///
    /// # Errors
    ///
    /// `ProtocolError::Framing` if the size field cannot even cover the
    /// opcode. A stream in that state cannot be re-synchronized.
    pub fn parse(raw: [u8; Self::SIZE]) -> Result<Self> {
        let size = u16::from_be_bytes([raw[0], raw[1]]) as usize;
        let opcode = u16::from_le_bytes([raw[2], raw[3]]);
        if size < Self::OPCODE_WIDTH {
            return Err(ProtocolError::Framing { reason: "size field smaller than opcode" });
        }
        Ok(Self { opcode, body_len: size - Self::OPCODE_WIDTH })
    }

    /// Assemble an inbound header. Used by harnesses that synthesize
    /// server traffic with the same codec the client parses.
    ///
    /// # Errors
    ///
    /// `ProtocolError::PayloadTooLarge` if the body exceeds
    /// [`MAX_INBOUND_BODY`].
    pub fn assemble(opcode: Opcode, body_len: usize) -> Result<[u8; Self::SIZE]> {
        if body_len > MAX_INBOUND_BODY {
            return Err(ProtocolError::PayloadTooLarge { size: body_len, max: MAX_INBOUND_BODY });
        }
        let size = (body_len + Self::OPCODE_WIDTH) as u16;
        let mut raw = [0u8; Self::SIZE];
        raw[0..2].copy_from_slice(&size.to_be_bytes());
        raw[2..4].copy_from_slice(&opcode.to_u16().to_le_bytes());
        Ok(raw)
    }
}

/// Outbound (client-to-server) frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientHeader;

impl ClientHeader {
    /// Header width on the wire.
    pub const SIZE: usize = 6;
    /// Width of the opcode counted by the size field.
    pub const OPCODE_WIDTH: usize = 4;

    /// Assemble an outbound header for `body_len` bytes of payload.
    ///
    /// # Errors
    ///
    /// `ProtocolError::PayloadTooLarge` if the body exceeds
    /// [`MAX_OUTBOUND_BODY`].
    pub fn assemble(opcode: Opcode, body_len: usize) -> Result<[u8; Self::SIZE]> {
        if body_len > MAX_OUTBOUND_BODY {
            return Err(ProtocolError::PayloadTooLarge { size: body_len, max: MAX_OUTBOUND_BODY });
        }
        let size = (body_len + Self::OPCODE_WIDTH) as u16;
        let mut raw = [0u8; Self::SIZE];
        raw[0..2].copy_from_slice(&size.to_be_bytes());
        raw[2..6].copy_from_slice(&u32::from(opcode.to_u16()).to_le_bytes());
        Ok(raw)
    }
}

/// Encode a complete outbound packet: 6-byte header followed by the body.
///
/// The header occupies the first [`ClientHeader::SIZE`] bytes of the
/// returned buffer so the send path can cipher it in place just before the
/// write.
///
/// # Errors
///
/// `ProtocolError::PayloadTooLarge` if the body exceeds
/// [`MAX_OUTBOUND_BODY`].
pub fn encode_client_packet(opcode: Opcode, body: &[u8]) -> Result<BytesMut> {
    let header = ClientHeader::assemble(opcode, body.len())?;
    let mut buf = BytesMut::with_capacity(ClientHeader::SIZE + body.len());
    buf.put_slice(&header);
    buf.put_slice(body);
    Ok(buf)
}

/// Encode a complete inbound packet the way the server would.
///
/// Harness/test helper: 4-byte header followed by the body.
///
/// # Errors
///
/// `ProtocolError::PayloadTooLarge` if the body exceeds
/// [`MAX_INBOUND_BODY`].
pub fn encode_server_packet(opcode: Opcode, body: &[u8]) -> Result<BytesMut> {
    let header = ServerHeader::assemble(opcode, body.len())?;
    let mut buf = BytesMut::with_capacity(ServerHeader::SIZE + body.len());
    buf.put_slice(&header);
    buf.put_slice(body);
    Ok(buf)
}
