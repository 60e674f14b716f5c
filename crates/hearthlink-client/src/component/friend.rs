//! Friend list component.
//!
//! Maintains the friend snapshot from `SMSG_FRIEND_LIST` and applies the
//! `SMSG_FRIEND_STATUS` transitions to it: adds, removals, and presence
//! changes. The cache is updated before every emission, so a subscriber
//! reacting to a status event reads a list that already reflects it.

use std::sync::{Arc, Mutex};

use hearthlink_proto::Opcode;
use hearthlink_proto::cmsg::{AddFriend, DelFriend, FriendListRequest};
use hearthlink_proto::smsg::{FriendEntry, FriendList, FriendResult, FriendStatusUpdate};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::WorldClient;
use crate::errors::ClientError;

use super::{ComponentCore, lock};

/// One applied friend status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FriendEvent {
    /// The status-result code the server sent.
    pub result: FriendResult,
    /// Snapshot of the affected entry after the transition; `None` when
    /// the transition removed it or it was never on the list.
    pub entry: Option<FriendEntry>,
}

/// Friend list component.
pub struct Friends {
    core: ComponentCore,
    list: Arc<Mutex<Vec<FriendEntry>>>,
    list_tx: broadcast::Sender<Arc<Vec<FriendEntry>>>,
    status_tx: broadcast::Sender<FriendEvent>,
}

impl Friends {
    /// Build the component and register its opcode streams.
    #[must_use]
    pub fn new(client: Arc<WorldClient>) -> Self {
        let capacity = client.config().update_channel_capacity;
        let core = ComponentCore::new(client);
        let list = Arc::new(Mutex::new(Vec::new()));
        let (list_tx, _) = broadcast::channel(capacity);
        let (status_tx, _) = broadcast::channel(capacity);

        {
            let list = Arc::clone(&list);
            let tx = list_tx.clone();
            core.spawn_parser(Opcode::SmsgFriendList, FriendList::parse, move |snapshot| {
                let entries = snapshot.entries;
                *lock(&list) = entries.clone();
                let _ = tx.send(Arc::new(entries));
            });
        }
        {
            let list = Arc::clone(&list);
            let tx = status_tx.clone();
            core.spawn_parser(
                Opcode::SmsgFriendStatus,
                FriendStatusUpdate::parse,
                move |update| {
                    let entry = apply_status(&mut lock(&list), &update);
                    let _ = tx.send(FriendEvent { result: update.result, entry });
                },
            );
        }

        Self { core, list, list_tx, status_tx }
    }

    /// Current friend list snapshot.
    #[must_use]
    pub fn friends(&self) -> Vec<FriendEntry> {
        lock(&self.list).clone()
    }

    /// One entry by GUID.
    #[must_use]
    pub fn friend(&self, guid: u64) -> Option<FriendEntry> {
        lock(&self.list).iter().find(|entry| entry.guid == guid).copied()
    }

    /// Full-list replacement events.
    #[must_use]
    pub fn friend_list_updates(&self) -> broadcast::Receiver<Arc<Vec<FriendEntry>>> {
        self.list_tx.subscribe()
    }

    /// Per-entry status transition events.
    #[must_use]
    pub fn friend_status_updates(&self) -> broadcast::Receiver<FriendEvent> {
        self.status_tx.subscribe()
    }

    /// Request a fresh list from the server.
    pub async fn request_list(&self, cancel: &CancellationToken) -> Result<(), ClientError> {
        let _op = self.core.begin_op();
        self.core
            .client()
            .send_msg(&FriendListRequest, cancel)
            .await
            .map_err(ClientError::from)
    }

    /// Add a friend by character name.
    pub async fn add_friend(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        if name.is_empty() {
            return Err(ClientError::InvalidArgument("player name must not be empty"));
        }
        let _op = self.core.begin_op();
        let msg = AddFriend { name: name.to_owned() };
        self.core.client().send_msg(&msg, cancel).await.map_err(ClientError::from)
    }

    /// Remove a friend. Removal is by GUID, not by name.
    pub async fn remove_friend(
        &self,
        guid: u64,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let _op = self.core.begin_op();
        self.core
            .client()
            .send_msg(&DelFriend { guid }, cancel)
            .await
            .map_err(ClientError::from)
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

/// Apply one status transition to the cached list; returns the affected
/// entry after the change.
fn apply_status(list: &mut Vec<FriendEntry>, update: &FriendStatusUpdate) -> Option<FriendEntry> {
    match update.result {
        FriendResult::AddedOnline | FriendResult::AddedOffline => {
            let mut entry = FriendEntry {
                guid: update.guid,
                status: 0,
                area_id: 0,
                level: 0,
                class: 0,
            };
            if let Some(info) = update.online {
                entry.status = info.status.max(1);
                entry.area_id = info.area_id;
                entry.level = info.level;
                entry.class = info.class;
            }
            match list.iter_mut().find(|e| e.guid == update.guid) {
                Some(existing) => *existing = entry,
                None => list.push(entry),
            }
            Some(entry)
        }
        FriendResult::Online => {
            let existing = list.iter_mut().find(|e| e.guid == update.guid)?;
            if let Some(info) = update.online {
                existing.status = info.status.max(1);
                existing.area_id = info.area_id;
                existing.level = info.level;
                existing.class = info.class;
            } else {
                existing.status = 1;
            }
            Some(*existing)
        }
        FriendResult::Offline => {
            let existing = list.iter_mut().find(|e| e.guid == update.guid)?;
            existing.status = 0;
            existing.area_id = 0;
            Some(*existing)
        }
        FriendResult::Removed => {
            let before = list.len();
            list.retain(|e| e.guid != update.guid);
            if list.len() != before {
                debug!(guid = update.guid, "friend removed");
            }
            None
        }
        // Error results never touch the cache.
        _ => list.iter().find(|e| e.guid == update.guid).copied(),
    }
}
