//! Inbound frame reader.
//!
//! Pulls bytes off the transport, unmasks and parses the 4-byte header,
//! then reads exactly the body the size field declared. EOF at a header
//! boundary is a clean close; EOF inside a frame and malformed size
//! fields are framing errors, which are fatal to the connection.

use std::sync::{Arc, Mutex};

use bytes::{Bytes, BytesMut};
use hearthlink_proto::{HeaderCipher, ProtocolError, ServerHeader};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::errors::ClientError;

/// One parsed inbound frame: the raw opcode and its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundFrame {
    /// Raw numeric opcode as read from the wire.
    pub opcode: u16,
    /// Body bytes (may be empty).
    pub body: Bytes,
}

/// Frame reader over an async byte stream.
pub struct Framer<R> {
    reader: R,
    cipher: Arc<Mutex<HeaderCipher>>,
}

impl<R: AsyncRead + Unpin> Framer<R> {
    /// Wrap a transport read half. The cipher is shared with the client so
    /// `install_session_key` takes effect mid-stream.
    pub fn new(reader: R, cipher: Arc<Mutex<HeaderCipher>>) -> Self {
        Self { reader, cipher }
    }

    /// Read the next frame.
    ///
    /// Returns `Ok(None)` on a clean close (EOF exactly between frames).
    ///
    /// # Errors
    ///
    /// - [`ClientError::Framing`] if the header is malformed or the stream
    ///   ends mid-frame
    /// - [`ClientError::Disconnected`] on transport read errors
    pub async fn next_frame(&mut self) -> Result<Option<InboundFrame>, ClientError> {
        // Filled incrementally: EOF before the first header byte is a clean
        // close, EOF after it is a cut frame.
        let mut header = [0u8; ServerHeader::SIZE];
        let mut filled = 0;
        while filled < header.len() {
            let n = self
                .reader
                .read(&mut header[filled..])
                .await
                .map_err(|_| ClientError::Disconnected)?;
            if n == 0 {
                if filled == 0 {
                    return Ok(None);
                }
                return Err(ClientError::Framing(ProtocolError::Framing {
                    reason: "stream ended inside a frame header",
                }));
            }
            filled += n;
        }

        {
            let mut cipher = lock_cipher(&self.cipher);
            cipher.decode_recv_header(&mut header);
        }

        let parsed = ServerHeader::parse(header).map_err(ClientError::Framing)?;

        let mut body = BytesMut::zeroed(parsed.body_len);
        if parsed.body_len > 0 {
            match self.reader.read_exact(&mut body).await {
                Ok(_) => {}
                Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
                    return Err(ClientError::Framing(ProtocolError::Framing {
                        reason: "stream ended inside a frame body",
                    }));
                }
                Err(_) => return Err(ClientError::Disconnected),
            }
        }

        Ok(Some(InboundFrame { opcode: parsed.opcode, body: body.freeze() }))
    }
}

/// Lock the shared cipher, recovering from a poisoned lock.
///
/// The cipher state is a pair of small counters; a panic elsewhere cannot
/// leave it torn, so continuing with the inner value is sound.
pub(crate) fn lock_cipher(cipher: &Arc<Mutex<HeaderCipher>>) -> std::sync::MutexGuard<'_, HeaderCipher> {
    match cipher.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
