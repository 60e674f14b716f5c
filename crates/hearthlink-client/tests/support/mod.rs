//! Shared harness: drives a real `WorldClient` over an in-memory duplex,
//! synthesizing server traffic with the proto crate's server-direction
//! codec.

// Each test binary uses a subset of these helpers.
#![allow(dead_code)]

use std::sync::Arc;

use hearthlink_client::{ClientConfig, WorldClient};
use hearthlink_proto::{Opcode, frame};
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};

/// A connected client plus the server end of its transport.
pub fn session() -> (Arc<WorldClient>, DuplexStream) {
    session_with(ClientConfig::default())
}

/// A connected client with custom tunables.
pub fn session_with(config: ClientConfig) -> (Arc<WorldClient>, DuplexStream) {
    let (client_io, server_io) = tokio::io::duplex(1 << 16);
    (WorldClient::from_io(client_io, config), server_io)
}

/// Write one server-to-client packet.
pub async fn feed(server: &mut DuplexStream, opcode: Opcode, body: &[u8]) {
    let packet = frame::encode_server_packet(opcode, body).unwrap();
    server.write_all(&packet).await.unwrap();
}

/// Read one client-to-server packet (identity cipher).
pub async fn read_outbound(server: &mut DuplexStream) -> (u16, Vec<u8>) {
    let mut header = [0u8; 6];
    server.read_exact(&mut header).await.unwrap();
    let size = u16::from_be_bytes([header[0], header[1]]) as usize;
    let opcode = u32::from_le_bytes([header[2], header[3], header[4], header[5]]) as u16;
    assert!(size >= 4, "outbound size field must cover the opcode");
    let mut body = vec![0u8; size - 4];
    server.read_exact(&mut body).await.unwrap();
    (opcode, body)
}

/// Server-side mirror of the client's header masking, one direction.
pub struct MirrorCipher {
    key: [u8; 40],
    index: usize,
    last: u8,
}

impl MirrorCipher {
    /// A mirror for one direction of the given session key.
    pub fn new(key: [u8; 40]) -> Self {
        Self { key, index: 0, last: 0 }
    }

    /// Mask bytes the way the server masks its outbound headers.
    pub fn encode(&mut self, bytes: &mut [u8]) {
        for byte in bytes.iter_mut() {
            let t = (*byte ^ self.key[self.index]).wrapping_add(self.last);
            self.index = (self.index + 1) % self.key.len();
            self.last = t;
            *byte = t;
        }
    }

    /// Unmask bytes the way the server unmasks client headers.
    pub fn decode(&mut self, bytes: &mut [u8]) {
        for byte in bytes.iter_mut() {
            let b = *byte;
            *byte = b.wrapping_sub(self.last) ^ self.key[self.index];
            self.index = (self.index + 1) % self.key.len();
            self.last = b;
        }
    }
}

/// Write one server-to-client packet with a masked header.
pub async fn feed_masked(
    server: &mut DuplexStream,
    cipher: &mut MirrorCipher,
    opcode: Opcode,
    body: &[u8],
) {
    let mut packet = frame::encode_server_packet(opcode, body).unwrap();
    cipher.encode(&mut packet[..4]);
    server.write_all(&packet).await.unwrap();
}

/// Read one client-to-server packet whose header was masked.
pub async fn read_outbound_masked(
    server: &mut DuplexStream,
    cipher: &mut MirrorCipher,
) -> (u16, Vec<u8>) {
    let mut header = [0u8; 6];
    server.read_exact(&mut header).await.unwrap();
    cipher.decode(&mut header);
    let size = u16::from_be_bytes([header[0], header[1]]) as usize;
    let opcode = u32::from_le_bytes([header[2], header[3], header[4], header[5]]) as u16;
    assert!(size >= 4, "outbound size field must cover the opcode");
    let mut body = vec![0u8; size - 4];
    server.read_exact(&mut body).await.unwrap();
    (opcode, body)
}
