//! Error types for the wire layer.
//!
//! Strongly-typed errors instead of `std::io::Error`: the framer needs to
//! distinguish a malformed header (fatal to the connection) from a payload
//! that is merely shorter than its schema claims (logged and dropped).

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while encoding or decoding wire data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Frame header is structurally invalid.
    ///
    /// Fatal to the connection: a bad size field means the byte stream can
    /// no longer be re-synchronized.
    #[error("malformed frame header: {reason}")]
    Framing {
        /// What was wrong with the header.
        reason: &'static str,
    },

    /// Payload is shorter than its declared schema.
    ///
    /// Local to the packet: the frame boundary itself was sound, so the
    /// packet is dropped and the connection continues.
    #[error("truncated payload for {opcode}: needed {expected} bytes, had {actual}")]
    Truncated {
        /// Opcode whose parser hit the shortfall.
        opcode: crate::Opcode,
        /// Bytes the schema required at the point of failure.
        expected: usize,
        /// Bytes actually remaining.
        actual: usize,
    },

    /// Payload contained a malformed field value.
    #[error("invalid payload for {opcode}: {reason}")]
    Malformed {
        /// Opcode whose parser rejected the value.
        opcode: crate::Opcode,
        /// What was wrong.
        reason: &'static str,
    },

    /// Outbound body exceeds what the 16-bit size field can carry.
    #[error("payload too large: {size} bytes exceeds maximum {max}")]
    PayloadTooLarge {
        /// Attempted body length.
        size: usize,
        /// Largest body the header can describe.
        max: usize,
    },

    /// A string field was not valid UTF-8 or was missing its terminator.
    #[error("invalid string in {opcode} payload")]
    InvalidString {
        /// Opcode whose parser rejected the string.
        opcode: crate::Opcode,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Opcode;

    #[test]
    fn display_includes_opcode_name() {
        let err = ProtocolError::Truncated {
            opcode: Opcode::SmsgFriendList,
            expected: 9,
            actual: 3,
        };
        let text = err.to_string();
        assert!(text.contains("SMSG_FRIEND_LIST"), "got: {text}");
        assert!(text.contains("needed 9"), "got: {text}");
    }
}
