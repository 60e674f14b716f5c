//! Reactive world-session runtime.
//!
//! This crate owns the live side of the protocol: the TCP connection, the
//! framing read loop, the per-opcode router, the serialized send path, and
//! the domain components (targeting, inventory, vendor, friends, flight
//! master, ...) built on a uniform substrate.
//!
//! Data flow inbound:
//! socket → [`framer`] → cipher decode → [`router`] → per-opcode streams →
//! component parsers → typed update streams → subscribers.
//!
//! Outbound: component → builder → [`WorldClient::send`] → send queue →
//! header assembly → cipher encode → socket.
//!
//! Everything is cooperatively scheduled: one read-loop task, one
//! write-loop task, and one small pump task per component subscription.
//! A slow subscriber never blocks the read loop; its queue sheds oldest
//! packets past the configured backlog instead.

pub mod client;
pub mod component;
pub mod config;
pub mod errors;
pub mod framer;
pub mod router;
pub mod send_queue;

pub use client::{Disconnect, WorldClient};
pub use config::ClientConfig;
pub use errors::{ClientError, SendError};
pub use router::{OpcodeRouter, Subscription};
