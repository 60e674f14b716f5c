//! Class trainer component.

use std::sync::{Arc, Mutex};

use hearthlink_proto::Opcode;
use hearthlink_proto::cmsg::{TrainerBuySpell, TrainerListRequest};
use hearthlink_proto::smsg::{TrainerBuyFailed, TrainerBuySucceeded, TrainerList};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::client::WorldClient;
use crate::errors::ClientError;

use super::{ComponentCore, lock};

/// Outcome of a trainer purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainerPurchase {
    /// The spell was learned.
    Succeeded {
        /// Learned spell id.
        spell_id: u32,
        /// Copper spent.
        cost: u32,
    },
    /// The purchase was rejected.
    Failed {
        /// Server-side error code.
        error_code: u32,
    },
}

/// Trainer interaction component.
pub struct Trainer {
    core: ComponentCore,
    list: Arc<Mutex<Option<Arc<TrainerList>>>>,
    list_tx: broadcast::Sender<Arc<TrainerList>>,
    purchase_tx: broadcast::Sender<TrainerPurchase>,
}

impl Trainer {
    /// Build the component and register its opcode streams.
    #[must_use]
    pub fn new(client: Arc<WorldClient>) -> Self {
        let capacity = client.config().update_channel_capacity;
        let core = ComponentCore::new(client);
        let list = Arc::new(Mutex::new(None));
        let (list_tx, _) = broadcast::channel(capacity);
        let (purchase_tx, _) = broadcast::channel(capacity);

        {
            let list = Arc::clone(&list);
            let tx = list_tx.clone();
            core.spawn_parser(Opcode::SmsgTrainerList, TrainerList::parse, move |snapshot| {
                let snapshot = Arc::new(snapshot);
                *lock(&list) = Some(Arc::clone(&snapshot));
                let _ = tx.send(snapshot);
            });
        }
        {
            let tx = purchase_tx.clone();
            core.spawn_parser(
                Opcode::SmsgTrainerBuySucceeded,
                TrainerBuySucceeded::parse,
                move |ok| {
                    let _ = tx.send(TrainerPurchase::Succeeded {
                        spell_id: ok.spell_id,
                        cost: ok.cost,
                    });
                },
            );
        }
        {
            let tx = purchase_tx.clone();
            core.spawn_parser(
                Opcode::SmsgTrainerBuyFailed,
                TrainerBuyFailed::parse,
                move |failed| {
                    let _ = tx.send(TrainerPurchase::Failed { error_code: failed.error_code });
                },
            );
        }

        Self { core, list, list_tx, purchase_tx }
    }

    /// Latest trainer listing, if any.
    #[must_use]
    pub fn current_list(&self) -> Option<Arc<TrainerList>> {
        lock(&self.list).clone()
    }

    /// Listing replacement events.
    #[must_use]
    pub fn list_updates(&self) -> broadcast::Receiver<Arc<TrainerList>> {
        self.list_tx.subscribe()
    }

    /// Purchase outcome events.
    #[must_use]
    pub fn purchase_results(&self) -> broadcast::Receiver<TrainerPurchase> {
        self.purchase_tx.subscribe()
    }

    /// Request a trainer's spell list.
    pub async fn request_list(
        &self,
        guid: u64,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let _op = self.core.begin_op();
        self.core
            .client()
            .send_msg(&TrainerListRequest { guid }, cancel)
            .await
            .map_err(ClientError::from)
    }

    /// Buy one spell from a trainer.
    pub async fn buy_spell(
        &self,
        guid: u64,
        spell_id: u32,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let _op = self.core.begin_op();
        let msg = TrainerBuySpell { guid, spell_id };
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
