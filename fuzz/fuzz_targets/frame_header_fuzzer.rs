//! Fuzz target for frame header boundary conditions.
//!
//! # Strategy
//!
//! Arbitrary 4-byte inbound headers plus structured outbound cases around
//! the size-field limit.
//!
//! # Invariants
//!
//! - `size < 2` MUST return `ProtocolError::Framing`, never panic
//! - A parsed inbound header re-assembles to the same bytes
//! - Outbound bodies over the limit MUST return `PayloadTooLarge`
//! - An assembled outbound packet is exactly `6 + body_len` bytes with
//!   the size field covering `body_len + 4`

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use hearthlink_proto::{ClientHeader, Opcode, ServerHeader, frame};

#[derive(Debug, Clone, Arbitrary)]
struct HeaderCase {
    raw: [u8; 4],
    body_len: BodyLen,
    opcode_index: u8,
}

#[derive(Debug, Clone, Arbitrary)]
enum BodyLen {
    Zero,
    Small(u8),
    AtMax,
    JustOverMax,
    Random(u16),
}

fuzz_target!(|case: HeaderCase| {
    // Inbound: parse arbitrary bytes, re-assemble on success.
    match ServerHeader::parse(case.raw) {
        Ok(parsed) => {
            let size = u16::from_be_bytes([case.raw[0], case.raw[1]]) as usize;
            assert_eq!(parsed.body_len, size - ServerHeader::OPCODE_WIDTH);
            if let Some(opcode) = Opcode::from_u16(parsed.opcode) {
                if opcode.to_u16() == parsed.opcode {
                    let rebuilt = ServerHeader::assemble(opcode, parsed.body_len)
                        .expect("parsed sizes are always assemblable");
                    assert_eq!(u16::from_be_bytes([rebuilt[0], rebuilt[1]]) as usize, size);
                }
            }
        }
        Err(_) => {
            let size = u16::from_be_bytes([case.raw[0], case.raw[1]]) as usize;
            assert!(size < ServerHeader::OPCODE_WIDTH);
        }
    }

    // Outbound: the size limit is enforced exactly.
    let body_len = match case.body_len {
        BodyLen::Zero => 0,
        BodyLen::Small(n) => n as usize,
        BodyLen::AtMax => frame::MAX_OUTBOUND_BODY,
        BodyLen::JustOverMax => frame::MAX_OUTBOUND_BODY + 1,
        BodyLen::Random(n) => n as usize,
    };
    let opcode = Opcode::ALL[case.opcode_index as usize % Opcode::ALL.len()];
    let body = vec![0xA5u8; body_len];

    match frame::encode_client_packet(opcode, &body) {
        Ok(packet) => {
            assert!(body_len <= frame::MAX_OUTBOUND_BODY);
            assert_eq!(packet.len(), ClientHeader::SIZE + body_len);
            let size = u16::from_be_bytes([packet[0], packet[1]]) as usize;
            assert_eq!(size, body_len + ClientHeader::OPCODE_WIDTH);
            let wire_opcode = u32::from_le_bytes([packet[2], packet[3], packet[4], packet[5]]);
            assert_eq!(wire_opcode, u32::from(opcode.to_u16()));
        }
        Err(_) => assert!(body_len > frame::MAX_OUTBOUND_BODY),
    }
});
