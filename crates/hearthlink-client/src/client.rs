//! World session facade.
//!
//! [`WorldClient`] is the narrow surface components consume:
//! `register_opcode_stream`, `send`, `on_disconnected`, plus the session
//! key installer the external handshake calls once authentication is
//! done. Internally it owns the read-loop and write-loop tasks and the
//! shared header cipher.

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use hearthlink_proto::cipher::SESSION_KEY_LEN;
use hearthlink_proto::{CmsgBuild, HeaderCipher, Opcode};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::ClientConfig;
use crate::errors::{ClientError, SendError};
use crate::framer::{Framer, lock_cipher};
use crate::router::{OpcodeRouter, Subscription};
use crate::send_queue::{self, OutboundPacket};

/// Why the session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disconnect {
    /// Orderly close: peer EOF between frames, or a local `disconnect()`.
    Clean,
    /// The session died with an error.
    Error(ClientError),
}

impl Disconnect {
    /// The error that ended the session, if any.
    #[must_use]
    pub fn error(&self) -> Option<&ClientError> {
        match self {
            Self::Clean => None,
            Self::Error(err) => Some(err),
        }
    }
}

/// First-writer-wins publisher for the disconnect event.
struct DisconnectSignal {
    tx: watch::Sender<Option<Disconnect>>,
}

impl DisconnectSignal {
    /// Publish the disconnect reason. Only the first call sticks; later
    /// causes (e.g. the write loop failing after the read loop already
    /// died) are dropped.
    fn fire(&self, reason: Disconnect) {
        self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
            true
        });
    }
}

/// Handle to one world session.
///
/// Cheap to share (`Arc` internally via the component substrate); all
/// methods take `&self`.
pub struct WorldClient {
    router: Arc<OpcodeRouter>,
    cipher: Arc<Mutex<HeaderCipher>>,
    queue_tx: mpsc::Sender<OutboundPacket>,
    signal: Arc<DisconnectSignal>,
    disconnected: watch::Receiver<Option<Disconnect>>,
    config: ClientConfig,
}

impl WorldClient {
    /// Connect to a world server over TCP.
    ///
    /// # Errors
    ///
    /// [`ClientError::Connect`] if the TCP connection cannot be
    /// established.
    pub async fn connect(
        host: &str,
        port: u16,
        config: ClientConfig,
    ) -> Result<Arc<Self>, ClientError> {
        let stream = TcpStream::connect((host, port))
            .await
            .map_err(|err| ClientError::Connect(err.to_string()))?;
        // Small packets dominate this protocol.
        let _ = stream.set_nodelay(true);
        debug!(host, port, "world connection established");
        Ok(Self::from_io(stream, config))
    }

    /// Build a session over any duplex transport.
    ///
    /// The production path hands in a [`TcpStream`]; harnesses drive an
    /// in-memory duplex pipe through the same read/write loops.
    pub fn from_io<S>(io: S, config: ClientConfig) -> Arc<Self>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (reader, writer) = tokio::io::split(io);
        let cipher = Arc::new(Mutex::new(HeaderCipher::new()));
        let router = Arc::new(OpcodeRouter::new(config.backlog_limit));
        let (queue_tx, queue_rx) = mpsc::channel(config.send_queue_depth);
        let (watch_tx, disconnected) = watch::channel(None);
        let signal = Arc::new(DisconnectSignal { tx: watch_tx });

        // Read loop: frames to the router until EOF, a framing error, or a
        // local disconnect. Exiting drops the read half, so a local
        // `disconnect()` closes both directions once each loop observes
        // the signal.
        {
            let mut framer = Framer::new(reader, Arc::clone(&cipher));
            let router = Arc::clone(&router);
            let signal = Arc::clone(&signal);
            let mut watch_rx = disconnected.clone();
            tokio::spawn(async move {
                let reason = loop {
                    tokio::select! {
                        frame = framer.next_frame() => match frame {
                            Ok(Some(frame)) => router.dispatch_raw(frame.opcode, frame.body),
                            Ok(None) => break Disconnect::Clean,
                            Err(err) => break Disconnect::Error(err),
                        },
                        changed = watch_rx.changed() => {
                            if changed.is_err() || watch_rx.borrow().is_some() {
                                break Disconnect::Clean;
                            }
                        }
                    }
                };
                debug!(?reason, "read loop finished");
                signal.fire(reason);
                // Streams end once their backlog drains; components see
                // the disconnect through `on_disconnected`.
                router.close_all();
            });
        }

        // Write loop: serialized sends until disconnect.
        {
            let cipher = Arc::clone(&cipher);
            let signal = Arc::clone(&signal);
            let watch_rx = disconnected.clone();
            tokio::spawn(async move {
                if let Err(err) = send_queue::write_loop(writer, queue_rx, cipher, watch_rx).await {
                    signal.fire(Disconnect::Error(err));
                }
            });
        }

        Arc::new(Self { router, cipher, queue_tx, signal, disconnected, config })
    }

    /// Install the 40-byte session key produced by the authentication
    /// handshake. Idempotent; headers are masked from the next packet in
    /// each direction.
    pub fn install_session_key(&self, key: [u8; SESSION_KEY_LEN]) {
        lock_cipher(&self.cipher).install(key);
        debug!("session key installed, header cipher active");
    }

    /// Subscribe to an inbound opcode. See
    /// [`OpcodeRouter::register_opcode_stream`] for the delivery contract.
    #[must_use]
    pub fn register_opcode_stream(&self, opcode: Opcode) -> Subscription {
        self.router.register_opcode_stream(opcode)
    }

    /// Queue one outbound packet and wait for it to reach the socket.
    ///
    /// Cancellation before queue admission returns
    /// [`SendError::Cancelled`] and nothing is sent. Cancellation after
    /// admission returns `Ok(())`: the packet is already committed and
    /// will be written (fire-and-forget).
    pub async fn send(
        &self,
        opcode: Opcode,
        body: Bytes,
        cancel: &CancellationToken,
    ) -> Result<(), SendError> {
        if self.is_disconnected() {
            return Err(SendError::Disconnected);
        }

        let permit = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(SendError::Cancelled),
            permit = self.queue_tx.reserve() => {
                permit.map_err(|_| SendError::Disconnected)?
            }
        };

        let (done_tx, done_rx) = oneshot::channel();
        permit.send(OutboundPacket { opcode, body, done: done_tx });

        tokio::select! {
            () = cancel.cancelled() => Ok(()),
            result = done_rx => result.unwrap_or(Err(SendError::Disconnected)),
        }
    }

    /// Build and send a typed client message.
    pub async fn send_msg<M: CmsgBuild>(
        &self,
        msg: &M,
        cancel: &CancellationToken,
    ) -> Result<(), SendError> {
        self.send(M::OPCODE, msg.body(), cancel).await
    }

    /// Watch the disconnect event. The value stays `None` until the
    /// session ends, then holds the reason forever.
    #[must_use]
    pub fn on_disconnected(&self) -> watch::Receiver<Option<Disconnect>> {
        self.disconnected.clone()
    }

    /// Wait for the session to end.
    pub async fn wait_disconnected(&self) -> Disconnect {
        let mut rx = self.disconnected.clone();
        let result = rx.wait_for(|value| value.is_some()).await;
        match result {
            Ok(value) => (*value).clone().unwrap_or(Disconnect::Clean),
            // Sender gone means the client is being torn down.
            Err(_) => Disconnect::Clean,
        }
    }

    /// Whether the session has ended.
    #[must_use]
    pub fn is_disconnected(&self) -> bool {
        self.disconnected.borrow().is_some()
    }

    /// End the session locally: pending sends fail, opcode streams end
    /// after draining, `on_disconnected` observers see a clean close, and
    /// both loop tasks exit, dropping their transport halves and closing
    /// the connection in both directions.
    pub fn disconnect(&self) {
        self.signal.fire(Disconnect::Clean);
        self.router.close_all();
    }

    /// The session configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The router, for diagnostics.
    #[must_use]
    pub fn router(&self) -> &OpcodeRouter {
        &self.router
    }
}

impl std::fmt::Debug for WorldClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldClient")
            .field("disconnected", &self.is_disconnected())
            .field("router", &self.router)
            .finish_non_exhaustive()
    }
}
