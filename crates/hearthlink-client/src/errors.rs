//! Error types for the session runtime.
//!
//! Propagation policy:
//! - framing errors are fatal: one disconnect emission, the read loop
//!   terminates, pending sends fail with [`SendError::Disconnected`]
//! - decode errors are local: logged with opcode and length, the packet is
//!   dropped, caches stay untouched
//! - send errors surface to the caller of the operation
//! - cancellation is never an error at the component API; callers may
//!   ignore it

use hearthlink_proto::ProtocolError;
use thiserror::Error;

/// Errors surfaced by the client facade and the components.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The connection is gone.
    #[error("connection lost")]
    Disconnected,

    /// Establishing the connection failed.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The inbound byte stream could not be framed. Fatal.
    #[error("framing error: {0}")]
    Framing(ProtocolError),

    /// A payload did not match its schema. Local to one packet.
    #[error("decode error: {0}")]
    Decode(ProtocolError),

    /// A message arrived in a context that cannot accept it. Logged, not
    /// fatal.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// The outbound write path failed.
    #[error("send failed: {0}")]
    Send(SendError),

    /// The operation's cancellation token fired before the write was
    /// admitted.
    #[error("operation cancelled")]
    Cancelled,

    /// The caller passed an argument the protocol cannot express.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// Errors from [`crate::WorldClient::send`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    /// The connection is gone; nothing was queued.
    #[error("connection lost")]
    Disconnected,

    /// Cancelled before the packet was admitted to the queue.
    #[error("cancelled before queue admission")]
    Cancelled,

    /// The body exceeds what the outbound header can describe.
    #[error("payload too large: {size} bytes exceeds maximum {max}")]
    PayloadTooLarge {
        /// Attempted body length.
        size: usize,
        /// Largest body the header can describe.
        max: usize,
    },
}

impl From<SendError> for ClientError {
    fn from(err: SendError) -> Self {
        match err {
            SendError::Disconnected => Self::Disconnected,
            SendError::Cancelled => Self::Cancelled,
            other => Self::Send(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_errors_fold_into_client_errors() {
        assert_eq!(ClientError::from(SendError::Disconnected), ClientError::Disconnected);
        assert_eq!(ClientError::from(SendError::Cancelled), ClientError::Cancelled);
        assert!(matches!(
            ClientError::from(SendError::PayloadTooLarge { size: 70000, max: 65531 }),
            ClientError::Send(SendError::PayloadTooLarge { .. })
        ));
    }
}
