//! Flight master component.
//!
//! Taxi map state machine: `Closed → (SHOWTAXINODES) Open → (disconnect or
//! explicit close) Closed`. The 1.12.1 protocol has no dedicated
//! map-close opcode, so disconnect is the only server-side closer; a
//! dedicated pump watches `on_disconnected` for that.

use std::sync::{Arc, Mutex};

use hearthlink_proto::Opcode;
use hearthlink_proto::cmsg::{
    ActivateTaxi, ActivateTaxiExpress, GossipHello, TaxiClearAllNodes, TaxiClearNode,
    TaxiEnableAllNodes, TaxiEnableNode, TaxiNodeStatusQuery, TaxiQueryAvailableNodes,
    TaxiShowNodes,
};
use hearthlink_proto::smsg::{TaxiActivateResult, TaxiNodeMap, TaxiNodeStatus};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::client::WorldClient;
use crate::errors::ClientError;

use super::{ComponentCore, lock};

/// Taxi map transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxiMapEvent {
    /// A node map arrived; the map is open.
    Opened(Arc<TaxiNodeMap>),
    /// The map closed (disconnect or local close).
    Closed,
}

/// Flight master component.
pub struct FlightMaster {
    core: ComponentCore,
    map: Arc<Mutex<Option<Arc<TaxiNodeMap>>>>,
    map_tx: broadcast::Sender<TaxiMapEvent>,
    reply_tx: broadcast::Sender<TaxiActivateResult>,
    status_tx: broadcast::Sender<TaxiNodeStatus>,
}

impl FlightMaster {
    /// Build the component and register its opcode streams.
    #[must_use]
    pub fn new(client: Arc<WorldClient>) -> Self {
        let capacity = client.config().update_channel_capacity;
        let core = ComponentCore::new(client);
        let map = Arc::new(Mutex::new(None));
        let (map_tx, _) = broadcast::channel(capacity);
        let (reply_tx, _) = broadcast::channel(capacity);
        let (status_tx, _) = broadcast::channel(capacity);

        {
            let map = Arc::clone(&map);
            let tx = map_tx.clone();
            core.spawn_parser(Opcode::SmsgShowTaxiNodes, TaxiNodeMap::parse, move |node_map| {
                let node_map = Arc::new(node_map);
                *lock(&map) = Some(Arc::clone(&node_map));
                let _ = tx.send(TaxiMapEvent::Opened(node_map));
            });
        }
        {
            let tx = reply_tx.clone();
            core.spawn_parser(
                Opcode::SmsgActivateTaxiReply,
                TaxiActivateResult::parse,
                move |result| {
                    let _ = tx.send(result);
                },
            );
        }
        {
            let tx = status_tx.clone();
            core.spawn_parser(Opcode::SmsgTaxiNodeStatus, TaxiNodeStatus::parse, move |status| {
                let _ = tx.send(status);
            });
        }

        // No close opcode exists in this protocol revision; the map
        // closes with the connection.
        {
            let map = Arc::clone(&map);
            let tx = map_tx.clone();
            let client = Arc::clone(core.client());
            core.spawn(async move {
                client.wait_disconnected().await;
                if lock(&map).take().is_some() {
                    let _ = tx.send(TaxiMapEvent::Closed);
                }
            });
        }

        Self { core, map, map_tx, reply_tx, status_tx }
    }

    /// The open node map, if any.
    #[must_use]
    pub fn current_map(&self) -> Option<Arc<TaxiNodeMap>> {
        lock(&self.map).clone()
    }

    /// Map open/close events.
    #[must_use]
    pub fn map_events(&self) -> broadcast::Receiver<TaxiMapEvent> {
        self.map_tx.subscribe()
    }

    /// Flight activation results.
    #[must_use]
    pub fn activate_replies(&self) -> broadcast::Receiver<TaxiActivateResult> {
        self.reply_tx.subscribe()
    }

    /// Node status replies.
    #[must_use]
    pub fn node_statuses(&self) -> broadcast::Receiver<TaxiNodeStatus> {
        self.status_tx.subscribe()
    }

    /// Greet a flight master (opens the gossip dialog server-side).
    pub async fn hello(&self, guid: u64, cancel: &CancellationToken) -> Result<(), ClientError> {
        let _op = self.core.begin_op();
        self.core
            .client()
            .send_msg(&GossipHello { guid }, cancel)
            .await
            .map_err(ClientError::from)
    }

    /// Ask whether a flight master's node is known.
    pub async fn query_node_status(
        &self,
        guid: u64,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let _op = self.core.begin_op();
        self.core
            .client()
            .send_msg(&TaxiNodeStatusQuery { guid }, cancel)
            .await
            .map_err(ClientError::from)
    }

    /// Ask a flight master for its reachable nodes; the map opens when
    /// the reply arrives.
    pub async fn query_available_nodes(
        &self,
        guid: u64,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let _op = self.core.begin_op();
        self.core
            .client()
            .send_msg(&TaxiQueryAvailableNodes { guid }, cancel)
            .await
            .map_err(ClientError::from)
    }

    /// Take a flight from `src_node` to `dst_node`.
    pub async fn activate_taxi(
        &self,
        guid: u64,
        src_node: u32,
        dst_node: u32,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let _op = self.core.begin_op();
        let msg = ActivateTaxi { guid, src_node, dst_node };
        self.core.client().send_msg(&msg, cancel).await.map_err(ClientError::from)
    }

    /// Take a flight without the pathing preamble.
    pub async fn activate_taxi_express(
        &self,
        guid: u64,
        src_node: u32,
        dst_node: u32,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let _op = self.core.begin_op();
        let msg = ActivateTaxiExpress { guid, src_node, dst_node };
        self.core.client().send_msg(&msg, cancel).await.map_err(ClientError::from)
    }

    /// Clear one known node.
    pub async fn clear_node(&self, node: u32, cancel: &CancellationToken) -> Result<(), ClientError> {
        let _op = self.core.begin_op();
        self.core
            .client()
            .send_msg(&TaxiClearNode { node }, cancel)
            .await
            .map_err(ClientError::from)
    }

    /// Mark one node as known.
    pub async fn enable_node(
        &self,
        node: u32,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let _op = self.core.begin_op();
        self.core
            .client()
            .send_msg(&TaxiEnableNode { node }, cancel)
            .await
            .map_err(ClientError::from)
    }

    /// Request the known-node map outside a flight master dialog.
    pub async fn show_nodes(&self, cancel: &CancellationToken) -> Result<(), ClientError> {
        let _op = self.core.begin_op();
        self.core
            .client()
            .send_msg(&TaxiShowNodes, cancel)
            .await
            .map_err(ClientError::from)
    }

    /// Clear every known node.
    pub async fn clear_all_nodes(&self, cancel: &CancellationToken) -> Result<(), ClientError> {
        let _op = self.core.begin_op();
        self.core
            .client()
            .send_msg(&TaxiClearAllNodes, cancel)
            .await
            .map_err(ClientError::from)
    }

    /// Mark every node as known.
    pub async fn enable_all_nodes(&self, cancel: &CancellationToken) -> Result<(), ClientError> {
        let _op = self.core.begin_op();
        self.core
            .client()
            .send_msg(&TaxiEnableAllNodes, cancel)
            .await
            .map_err(ClientError::from)
    }

    /// Close the map locally.
    pub fn close(&self) {
        if lock(&self.map).take().is_some() {
            let _ = self.map_tx.send(TaxiMapEvent::Closed);
        }
    }

    /// Core bookkeeping.
    #[must_use]
    pub fn core(&self) -> &ComponentCore {
        &self.core
    }

    /// Stop the component.
    pub async fn shutdown(&self) {
        self.core.shutdown().await;
    }
}
