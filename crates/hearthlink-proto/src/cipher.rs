//! Symmetric header obfuscation.
//!
//! After authentication the server and client mask packet headers (and only
//! headers) with a rolling XOR keyed by the 40-byte session key. Each
//! direction keeps its own `(index, last)` pair that persists across
//! packets, so the cipher must see every header byte exactly once and in
//! wire order. Before [`HeaderCipher::install`] both directions are
//! identity transforms.

/// Length of the session key in bytes.
pub const SESSION_KEY_LEN: usize = 40;

/// Rolling state for one direction.
#[derive(Debug, Clone, Copy, Default)]
struct DirectionState {
    /// Index into the session key, wraps at [`SESSION_KEY_LEN`].
    index: usize,
    /// Previous output byte (encode) or previous input byte (decode).
    last: u8,
}

/// Stateful header cipher for one world session.
///
/// Encode (client-to-server headers): `t = (b ^ key[i]) + j; j = t`.
/// Decode (server-to-client headers): `t = (b - j) ^ key[i]; j = b`.
/// The decode recurrence advances `j` to the *ciphertext* byte, which makes
/// the two directions exact inverses of each other.
#[derive(Debug, Clone)]
pub struct HeaderCipher {
    key: Option<[u8; SESSION_KEY_LEN]>,
    send: DirectionState,
    recv: DirectionState,
}

impl HeaderCipher {
    /// A cipher with no key installed; both directions are identity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            key: None,
            send: DirectionState::default(),
            recv: DirectionState::default(),
        }
    }

    /// Install the session key derived by the authentication handshake.
    ///
    /// Idempotent within a session: installing the same key again does not
    /// reset the rolling indices. Installing a different key restarts both
    /// directions from zero (a new session).
    pub fn install(&mut self, key: [u8; SESSION_KEY_LEN]) {
        if self.key == Some(key) {
            return;
        }
        self.key = Some(key);
        self.send = DirectionState::default();
        self.recv = DirectionState::default();
    }

    /// Whether a session key has been installed.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.key.is_some()
    }

    /// Mask an outbound 6-byte header in place.
    pub fn encode_send_header(&mut self, header: &mut [u8; 6]) {
        let Some(key) = self.key else { return };
        for byte in header.iter_mut() {
            let t = (*byte ^ key[self.send.index]).wrapping_add(self.send.last);
            self.send.index = (self.send.index + 1) % SESSION_KEY_LEN;
            self.send.last = t;
            *byte = t;
        }
    }

    /// Unmask an inbound 4-byte header in place.
    pub fn decode_recv_header(&mut self, header: &mut [u8; 4]) {
        let Some(key) = self.key else { return };
        for byte in header.iter_mut() {
            let b = *byte;
            let t = b.wrapping_sub(self.recv.last) ^ key[self.recv.index];
            self.recv.index = (self.recv.index + 1) % SESSION_KEY_LEN;
            self.recv.last = b;
            *byte = t;
        }
    }
}

impl Default for HeaderCipher {
    fn default() -> Self {
        Self::new()
    }
}
