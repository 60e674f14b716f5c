//! Ignore list component.
//!
//! The ignore list is name-based in both directions: the server sends
//! NUL-terminated names and additions/removals go out as names too.

use std::sync::{Arc, Mutex};

use hearthlink_proto::Opcode;
use hearthlink_proto::cmsg::{AddIgnore, DelIgnore};
use hearthlink_proto::smsg::IgnoreList;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::client::WorldClient;
use crate::errors::ClientError;

use super::{ComponentCore, lock};

/// Ignore list component.
pub struct Ignores {
    core: ComponentCore,
    names: Arc<Mutex<Vec<String>>>,
    list_tx: broadcast::Sender<Arc<Vec<String>>>,
}

impl Ignores {
    /// Build the component and register its opcode stream.
    #[must_use]
    pub fn new(client: Arc<WorldClient>) -> Self {
        let capacity = client.config().update_channel_capacity;
        let core = ComponentCore::new(client);
        let names = Arc::new(Mutex::new(Vec::new()));
        let (list_tx, _) = broadcast::channel(capacity);

        {
            let names = Arc::clone(&names);
            let tx = list_tx.clone();
            core.spawn_parser(Opcode::SmsgIgnoreList, IgnoreList::parse, move |snapshot| {
                *lock(&names) = snapshot.names.clone();
                let _ = tx.send(Arc::new(snapshot.names));
            });
        }

        Self { core, names, list_tx }
    }

    /// Current ignored names.
    #[must_use]
    pub fn ignored(&self) -> Vec<String> {
        lock(&self.names).clone()
    }

    /// Whether a name is on the list.
    #[must_use]
    pub fn is_ignored(&self, name: &str) -> bool {
        lock(&self.names).iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    /// Full-list replacement events.
    #[must_use]
    pub fn ignore_list_updates(&self) -> broadcast::Receiver<Arc<Vec<String>>> {
        self.list_tx.subscribe()
    }

    /// Ignore a player by name.
    pub async fn add_ignore(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        if name.is_empty() {
            return Err(ClientError::InvalidArgument("player name must not be empty"));
        }
        let _op = self.core.begin_op();
        let msg = AddIgnore { name: name.to_owned() };
        self.core.client().send_msg(&msg, cancel).await.map_err(ClientError::from)
    }

    /// Stop ignoring a player.
    pub async fn remove_ignore(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        if name.is_empty() {
            return Err(ClientError::InvalidArgument("player name must not be empty"));
        }
        let _op = self.core.begin_op();
        let msg = DelIgnore { name: name.to_owned() };
        self.core.client().send_msg(&msg, cancel).await.map_err(ClientError::from)
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
