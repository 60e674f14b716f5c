//! Domain component substrate.
//!
//! Every component follows the same shape: construct with the shared
//! [`WorldClient`], register per-opcode streams lazily through
//! [`ComponentCore::spawn_parser`], parse payloads into typed records,
//! update the component cache BEFORE emitting on the update stream, and
//! shut down deterministically by aborting the pump tasks.
//!
//! Caches are mutated only from parser pumps (the router's dispatch path);
//! outbound methods read them, and the few optimistic writers (targeting)
//! go through the component's own lock.

pub mod character_init;
pub mod combat;
pub mod emote;
pub mod flight;
pub mod friend;
pub mod gameobject;
pub mod ignore;
pub mod inventory;
pub mod targeting;
pub mod trainer;
pub mod vendor;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use hearthlink_proto::Opcode;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::client::WorldClient;

pub use character_init::CharacterInit;
pub use combat::{Combat, CombatEvent, CombatEventKind};
pub use emote::Emotes;
pub use flight::{FlightMaster, TaxiMapEvent};
pub use friend::{Friends, FriendEvent};
pub use gameobject::{GameObjects, ObjectEvent, ObjectEventKind};
pub use ignore::Ignores;
pub use inventory::{Inventory, ItemMoved};
pub use targeting::{TargetChange, Targeting};
pub use trainer::{Trainer, TrainerPurchase};
pub use vendor::{BulkSellOptions, BulkSellReport, SellCandidate, Vendor, VendorWindowEvent};

/// Lock a component mutex, recovering from poisoning.
///
/// Component caches are replaced wholesale by parser pumps, so a panicked
/// holder cannot leave a half-written record behind.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Shared bookkeeping every component owns.
///
/// Tracks the in-flight flag with its `last_op_time` stamp and the pump
/// tasks feeding the component's parsers.
pub struct ComponentCore {
    client: Arc<WorldClient>,
    op_in_progress: AtomicBool,
    last_op_time: Mutex<Option<Instant>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl ComponentCore {
    /// Bind the substrate to a session.
    #[must_use]
    pub fn new(client: Arc<WorldClient>) -> Self {
        Self {
            client,
            op_in_progress: AtomicBool::new(false),
            last_op_time: Mutex::new(None),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// The session this component operates on.
    #[must_use]
    pub fn client(&self) -> &Arc<WorldClient> {
        &self.client
    }

    /// Flip the in-flight flag. The transition to `true` stamps
    /// `last_op_time`.
    pub fn set_op_in_progress(&self, value: bool) {
        let was = self.op_in_progress.swap(value, Ordering::AcqRel);
        if value && !was {
            *lock(&self.last_op_time) = Some(Instant::now());
        }
    }

    /// Whether an outbound operation is currently in flight.
    #[must_use]
    pub fn is_op_in_progress(&self) -> bool {
        self.op_in_progress.load(Ordering::Acquire)
    }

    /// When the most recent operation started.
    #[must_use]
    pub fn last_op_time(&self) -> Option<Instant> {
        *lock(&self.last_op_time)
    }

    /// Mark an operation in flight for the duration of the returned guard.
    #[must_use]
    pub fn begin_op(&self) -> OpGuard<'_> {
        self.set_op_in_progress(true);
        OpGuard { core: self }
    }

    /// Track a task for teardown.
    pub fn spawn<F>(&self, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        lock(&self.tasks).push(tokio::spawn(future));
    }

    /// Subscribe to `opcode` and pump every body through `parse`, handing
    /// records to `handle`.
    ///
    /// Decode failures are logged with opcode and length and dropped; the
    /// handler never sees them, so caches stay untouched and nothing is
    /// emitted.
    pub fn spawn_parser<T, P, F>(&self, opcode: Opcode, parse: P, mut handle: F)
    where
        T: Send + 'static,
        P: Fn(&[u8]) -> hearthlink_proto::Result<T> + Send + 'static,
        F: FnMut(T) + Send + 'static,
    {
        let mut subscription = self.client.register_opcode_stream(opcode);
        self.spawn(async move {
            while let Some(body) = subscription.recv().await {
                match parse(&body) {
                    Ok(record) => handle(record),
                    Err(err) => {
                        warn!(opcode = %opcode, len = body.len(), error = %err,
                              "dropping undecodable payload");
                    }
                }
            }
        });
    }

    /// Abort every pump task and wait for them to settle. Subscriptions
    /// are dropped with their tasks, which unsubscribes from the router;
    /// the component's streams see no further emissions.
    pub async fn shutdown(&self) {
        let handles: Vec<JoinHandle<()>> = std::mem::take(&mut *lock(&self.tasks));
        for handle in &handles {
            handle.abort();
        }
        for result in futures::future::join_all(handles).await {
            // Cancelled tasks are the expected outcome here.
            drop(result);
        }
    }
}

impl std::fmt::Debug for ComponentCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentCore")
            .field("op_in_progress", &self.is_op_in_progress())
            .field("tasks", &lock(&self.tasks).len())
            .finish()
    }
}

/// RAII guard clearing the in-flight flag.
pub struct OpGuard<'a> {
    core: &'a ComponentCore,
}

impl Drop for OpGuard<'_> {
    fn drop(&mut self) {
        self.core.set_op_in_progress(false);
    }
}
