//! Serialized outbound path.
//!
//! All writes funnel through one task: packets arrive on a bounded
//! channel, the 6-byte header is assembled, ciphered in place, and the
//! whole packet hits the socket in one `write_all`. The single-writer
//! rule is structural; nothing else ever touches the write half.

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use hearthlink_proto::{ClientHeader, HeaderCipher, Opcode, ProtocolError, frame};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot, watch};

use crate::client::Disconnect;
use crate::errors::{ClientError, SendError};
use crate::framer::lock_cipher;

/// One packet awaiting the writer task.
pub(crate) struct OutboundPacket {
    pub(crate) opcode: Opcode,
    pub(crate) body: Bytes,
    /// Completion for the caller; dropped receivers are fire-and-forget.
    pub(crate) done: oneshot::Sender<Result<(), SendError>>,
}

/// Drive the writer until disconnect or queue closure.
///
/// On a write error, the failing packet and everything still queued fail
/// with [`SendError::Disconnected`] and the loop returns the error for the
/// spawning wrapper to publish.
pub(crate) async fn write_loop<W: AsyncWrite + Unpin>(
    mut writer: W,
    mut rx: mpsc::Receiver<OutboundPacket>,
    cipher: Arc<Mutex<HeaderCipher>>,
    mut disconnected: watch::Receiver<Option<Disconnect>>,
) -> Result<(), ClientError> {
    loop {
        tokio::select! {
            maybe = rx.recv() => {
                let Some(packet) = maybe else { return Ok(()) };
                if let Err(err) = write_packet(&mut writer, &cipher, packet).await {
                    drain_pending(&mut rx);
                    return Err(err);
                }
            }
            changed = disconnected.changed() => {
                if changed.is_err() || disconnected.borrow().is_some() {
                    drain_pending(&mut rx);
                    return Ok(());
                }
            }
        }
    }
}

async fn write_packet<W: AsyncWrite + Unpin>(
    writer: &mut W,
    cipher: &Arc<Mutex<HeaderCipher>>,
    packet: OutboundPacket,
) -> Result<(), ClientError> {
    let mut wire = match frame::encode_client_packet(packet.opcode, &packet.body) {
        Ok(wire) => wire,
        Err(ProtocolError::PayloadTooLarge { size, max }) => {
            // Oversized bodies fail only their own send.
            let _ = packet.done.send(Err(SendError::PayloadTooLarge { size, max }));
            return Ok(());
        }
        Err(err) => {
            let _ = packet.done.send(Err(SendError::Disconnected));
            return Err(ClientError::Framing(err));
        }
    };

    {
        let mut cipher = lock_cipher(cipher);
        let mut header = [0u8; ClientHeader::SIZE];
        header.copy_from_slice(&wire[..ClientHeader::SIZE]);
        cipher.encode_send_header(&mut header);
        wire[..ClientHeader::SIZE].copy_from_slice(&header);
    }

    match writer.write_all(&wire).await {
        Ok(()) => {
            let _ = packet.done.send(Ok(()));
            Ok(())
        }
        Err(err) => {
            tracing::debug!(error = %err, opcode = %packet.opcode, "socket write failed");
            let _ = packet.done.send(Err(SendError::Disconnected));
            Err(ClientError::Send(SendError::Disconnected))
        }
    }
}

/// Fail everything still in the queue with `Disconnected`.
fn drain_pending(rx: &mut mpsc::Receiver<OutboundPacket>) {
    rx.close();
    while let Ok(packet) = rx.try_recv() {
        let _ = packet.done.send(Err(SendError::Disconnected));
    }
}
