//! Wire layer for the 1.12.1 world protocol.
//!
//! Everything in this crate is synchronous and I/O-free: opcode
//! identification, frame header assembly and parsing, the symmetric header
//! cipher, and the typed codecs for the server messages the client handles.
//! The runtime layer (`hearthlink-client`) owns sockets, tasks, and
//! dispatch; this crate only turns bytes into records and records into
//! bytes.
//!
//! Layout:
//! - [`Opcode`]: the closed set of message identifiers the client speaks
//! - [`frame`]: 4-byte inbound / 6-byte outbound header codec
//! - [`cipher`]: rolling-XOR header obfuscation keyed by the session key
//! - [`reader`]: bounds-checked little-endian payload cursor
//! - [`smsg`]: typed parsers for server-to-client payloads
//! - [`cmsg`]: typed builders for client-to-server payloads

pub mod cipher;
pub mod cmsg;
pub mod errors;
pub mod frame;
pub mod opcode;
pub mod reader;
pub mod smsg;

pub use cipher::HeaderCipher;
pub use cmsg::CmsgBuild;
pub use errors::{ProtocolError, Result};
pub use frame::{ClientHeader, ServerHeader};
pub use opcode::Opcode;
pub use reader::PacketReader;
