//! Runtime configuration.

/// Packets a single subscriber may fall behind before its oldest packets
/// are shed.
pub const DEFAULT_BACKLOG_LIMIT: usize = 1024;

/// Outbound packets the send queue buffers before `send` awaits admission.
pub const DEFAULT_SEND_QUEUE_DEPTH: usize = 64;

/// Capacity of each component's typed update stream.
pub const DEFAULT_UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Tunables for one world session.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-subscriber queue bound; beyond it the oldest packet is shed and
    /// the subscription's drop counter increments.
    pub backlog_limit: usize,
    /// Send queue depth; `send` awaits admission when full.
    pub send_queue_depth: usize,
    /// Buffered events per component update stream.
    pub update_channel_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backlog_limit: DEFAULT_BACKLOG_LIMIT,
            send_queue_depth: DEFAULT_SEND_QUEUE_DEPTH,
            update_channel_capacity: DEFAULT_UPDATE_CHANNEL_CAPACITY,
        }
    }
}
