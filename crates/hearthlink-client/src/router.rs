//! Per-opcode fan-out.
//!
//! The router keeps one lazily-created slot per opcode. Each subscriber
//! owns a bounded delivery ring; the slot holds only weak references, so
//! dropping a [`Subscription`] unsubscribes immediately and breaks the
//! component → client → stream → component reference cycle.
//!
//! Guarantees:
//! - per-opcode, per-subscriber delivery is FIFO in dispatch order
//! - already-dispatched packets are never replayed to new subscribers
//! - a subscriber more than `backlog_limit` packets behind loses its
//!   oldest packets (counted per subscription); the read loop never blocks
//! - slots survive a subscriber count of zero and are reused until
//!   teardown

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use bytes::Bytes;
use hearthlink_proto::Opcode;
use tokio::sync::Notify;
use tracing::{trace, warn};

/// Lock a mutex, recovering from poisoning.
///
/// Router state is a plain queue; a panicked holder cannot leave it torn.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// One subscriber's delivery ring.
struct DeliveryQueue {
    opcode: Opcode,
    limit: usize,
    state: Mutex<QueueState>,
    notify: Notify,
    shed: AtomicU64,
}

struct QueueState {
    items: VecDeque<Bytes>,
    closed: bool,
}

impl DeliveryQueue {
    fn push(&self, body: Bytes) {
        {
            let mut state = lock(&self.state);
            if state.closed {
                return;
            }
            if state.items.len() >= self.limit {
                state.items.pop_front();
                self.shed.fetch_add(1, Ordering::Relaxed);
                trace!(opcode = %self.opcode, "backlog full, shedding oldest packet");
            }
            state.items.push_back(body);
        }
        self.notify.notify_one();
    }

    fn close(&self) {
        lock(&self.state).closed = true;
        self.notify.notify_waiters();
    }
}

/// A handle yielding bodies for one opcode.
///
/// Dropping the handle unsubscribes; buffered but undelivered packets are
/// discarded with it.
pub struct Subscription {
    queue: Arc<DeliveryQueue>,
}

impl Subscription {
    /// The opcode this subscription delivers.
    #[must_use]
    pub fn opcode(&self) -> Opcode {
        self.queue.opcode
    }

    /// Packets shed from this subscription because it fell behind.
    #[must_use]
    pub fn shed_count(&self) -> u64 {
        self.queue.shed.load(Ordering::Relaxed)
    }

    /// Receive the next body, in dispatch order.
    ///
    /// Returns `None` once the router is torn down and the backlog is
    /// drained.
    pub async fn recv(&mut self) -> Option<Bytes> {
        loop {
            let notified = self.queue.notify.notified();
            {
                let mut state = lock(&self.queue.state);
                if let Some(body) = state.items.pop_front() {
                    // Wake a sibling waiter in case several pushes landed
                    // while we held the lock.
                    if !state.items.is_empty() {
                        self.queue.notify.notify_one();
                    }
                    return Some(body);
                }
                if state.closed {
                    return None;
                }
            }
            notified.await;
        }
    }

    /// Receive without waiting. `None` when the backlog is empty.
    pub fn try_recv(&mut self) -> Option<Bytes> {
        lock(&self.queue.state).items.pop_front()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("opcode", &self.queue.opcode)
            .field("shed", &self.shed_count())
            .finish()
    }
}

/// Per-opcode slot: the weak side of every live subscription.
#[derive(Default)]
struct Slot {
    subscribers: Vec<Weak<DeliveryQueue>>,
}

struct RouterState {
    slots: HashMap<Opcode, Slot>,
    /// Raw opcodes already reported as unhandled; one log line per opcode
    /// per session.
    unhandled_logged: HashSet<u16>,
    closed: bool,
}

/// Multi-subscriber opcode fan-out.
pub struct OpcodeRouter {
    state: Mutex<RouterState>,
    backlog_limit: usize,
}

impl OpcodeRouter {
    /// A router shedding per-subscriber backlogs beyond `backlog_limit`.
    #[must_use]
    pub fn new(backlog_limit: usize) -> Self {
        Self {
            state: Mutex::new(RouterState {
                slots: HashMap::new(),
                unhandled_logged: HashSet::new(),
                closed: false,
            }),
            backlog_limit,
        }
    }

    /// Subscribe to one opcode.
    ///
    /// Idempotent per opcode: every call returns an independent stream
    /// backed by the same slot, each receiving every packet dispatched
    /// after the call. Nothing is replayed.
    pub fn register_opcode_stream(&self, opcode: Opcode) -> Subscription {
        let queue = Arc::new(DeliveryQueue {
            opcode,
            limit: self.backlog_limit,
            state: Mutex::new(QueueState { items: VecDeque::new(), closed: false }),
            notify: Notify::new(),
            shed: AtomicU64::new(0),
        });

        let mut state = lock(&self.state);
        if state.closed {
            // Late registration after teardown yields a stream that ends
            // immediately rather than one that hangs forever.
            lock(&queue.state).closed = true;
        } else {
            state
                .slots
                .entry(opcode)
                .or_default()
                .subscribers
                .push(Arc::downgrade(&queue));
        }
        Subscription { queue }
    }

    /// Deliver one inbound body to every live subscriber of its opcode.
    ///
    /// Raw opcodes outside the dispatched set, and opcodes nobody has
    /// registered, are logged once per session and dropped.
    pub fn dispatch_raw(&self, raw_opcode: u16, body: Bytes) {
        let Some(opcode) = Opcode::from_server_u16(raw_opcode) else {
            self.note_unhandled(raw_opcode, body.len());
            return;
        };
        self.dispatch(opcode, body);
    }

    /// Deliver one inbound body for a resolved opcode.
    pub fn dispatch(&self, opcode: Opcode, body: Bytes) {
        // Snapshot the live queues under the short slot lock, then push
        // outside it: dispatch stays lock-free per-slot, and a slow
        // subscriber can only contend its own queue.
        let queues: Vec<Arc<DeliveryQueue>> = {
            let mut state = lock(&self.state);
            match state.slots.get_mut(&opcode) {
                Some(slot) => {
                    slot.subscribers.retain(|weak| weak.strong_count() > 0);
                    if slot.subscribers.is_empty() {
                        // Slot is retained for future subscribers; with
                        // nobody listening the body is dropped silently.
                        trace!(opcode = %opcode, "no live subscribers, dropping packet");
                        return;
                    }
                    slot.subscribers.iter().filter_map(Weak::upgrade).collect()
                }
                None => {
                    drop(state);
                    self.note_unhandled(opcode.to_u16(), body.len());
                    return;
                }
            }
        };

        trace!(opcode = %opcode, len = body.len(), fanout = queues.len(), "dispatch");
        for queue in queues {
            queue.push(body.clone());
        }
    }

    /// Live subscriber count for an opcode.
    #[must_use]
    pub fn subscriber_count(&self, opcode: Opcode) -> usize {
        let mut state = lock(&self.state);
        state.slots.get_mut(&opcode).map_or(0, |slot| {
            slot.subscribers.retain(|weak| weak.strong_count() > 0);
            slot.subscribers.len()
        })
    }

    /// Tear down every slot. All subscriptions end after draining their
    /// backlog; late registrations yield ended streams.
    pub fn close_all(&self) {
        let queues: Vec<Arc<DeliveryQueue>> = {
            let mut state = lock(&self.state);
            state.closed = true;
            state
                .slots
                .values()
                .flat_map(|slot| slot.subscribers.iter().filter_map(Weak::upgrade))
                .collect()
        };
        for queue in queues {
            queue.close();
        }
    }

    fn note_unhandled(&self, raw_opcode: u16, len: usize) {
        let mut state = lock(&self.state);
        if state.unhandled_logged.insert(raw_opcode) {
            warn!(opcode = raw_opcode, len, "unhandled opcode");
        }
    }
}

impl std::fmt::Debug for OpcodeRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("OpcodeRouter")
            .field("slots", &state.slots.len())
            .field("closed", &state.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(byte: u8) -> Bytes {
        Bytes::from(vec![byte])
    }

    #[tokio::test]
    async fn per_opcode_fifo_per_subscriber() {
        let router = OpcodeRouter::new(16);
        let mut a = router.register_opcode_stream(Opcode::SmsgFriendStatus);
        let mut b = router.register_opcode_stream(Opcode::SmsgFriendStatus);

        for i in 0..5 {
            router.dispatch(Opcode::SmsgFriendStatus, body(i));
        }

        for i in 0..5 {
            assert_eq!(a.recv().await.unwrap()[0], i);
            assert_eq!(b.recv().await.unwrap()[0], i);
        }
    }

    #[tokio::test]
    async fn interleaved_opcodes_stay_separate() {
        let router = OpcodeRouter::new(16);
        let mut friends = router.register_opcode_stream(Opcode::SmsgFriendStatus);
        let mut vendors = router.register_opcode_stream(Opcode::SmsgListInventory);

        router.dispatch(Opcode::SmsgFriendStatus, body(1));
        router.dispatch(Opcode::SmsgListInventory, body(2));
        router.dispatch(Opcode::SmsgFriendStatus, body(3));

        assert_eq!(friends.recv().await.unwrap()[0], 1);
        assert_eq!(friends.recv().await.unwrap()[0], 3);
        assert_eq!(vendors.recv().await.unwrap()[0], 2);
    }

    #[tokio::test]
    async fn no_replay_for_late_subscribers() {
        let router = OpcodeRouter::new(16);
        let mut early = router.register_opcode_stream(Opcode::SmsgGossipComplete);
        router.dispatch(Opcode::SmsgGossipComplete, body(1));

        let mut late = router.register_opcode_stream(Opcode::SmsgGossipComplete);
        router.dispatch(Opcode::SmsgGossipComplete, body(2));

        assert_eq!(early.recv().await.unwrap()[0], 1);
        assert_eq!(early.recv().await.unwrap()[0], 2);
        assert_eq!(late.recv().await.unwrap()[0], 2);
        assert!(late.try_recv().is_none());
    }

    #[tokio::test]
    async fn dropping_a_subscription_unsubscribes() {
        let router = OpcodeRouter::new(16);
        let a = router.register_opcode_stream(Opcode::SmsgFriendList);
        let mut b = router.register_opcode_stream(Opcode::SmsgFriendList);
        assert_eq!(router.subscriber_count(Opcode::SmsgFriendList), 2);

        drop(a);
        for i in 0..3 {
            router.dispatch(Opcode::SmsgFriendList, body(i));
        }
        assert_eq!(router.subscriber_count(Opcode::SmsgFriendList), 1);

        for i in 0..3 {
            assert_eq!(b.recv().await.unwrap()[0], i);
        }

        // Slot is retained: a new subscriber sees only later packets.
        let mut c = router.register_opcode_stream(Opcode::SmsgFriendList);
        router.dispatch(Opcode::SmsgFriendList, body(9));
        assert_eq!(c.recv().await.unwrap()[0], 9);
        assert_eq!(b.recv().await.unwrap()[0], 9);
        assert!(c.try_recv().is_none());
    }

    #[tokio::test]
    async fn backlog_sheds_oldest_without_touching_peers() {
        let router = OpcodeRouter::new(4);
        let mut stalled = router.register_opcode_stream(Opcode::SmsgActionButtons);
        let mut healthy = router.register_opcode_stream(Opcode::SmsgActionButtons);

        for i in 0..10 {
            router.dispatch(Opcode::SmsgActionButtons, body(i));
            // Healthy subscriber keeps up.
            assert_eq!(healthy.recv().await.unwrap()[0], i);
        }

        assert_eq!(stalled.shed_count(), 6);
        assert_eq!(healthy.shed_count(), 0);

        // The stalled subscriber sees the newest window, still in order.
        for i in 6..10 {
            assert_eq!(stalled.recv().await.unwrap()[0], i);
        }
        assert!(stalled.try_recv().is_none());
    }

    #[tokio::test]
    async fn close_all_ends_streams_after_drain() {
        let router = OpcodeRouter::new(16);
        let mut sub = router.register_opcode_stream(Opcode::SmsgIgnoreList);
        router.dispatch(Opcode::SmsgIgnoreList, body(1));
        router.close_all();

        assert_eq!(sub.recv().await.unwrap()[0], 1);
        assert!(sub.recv().await.is_none());

        // Registration after teardown ends immediately.
        let mut late = router.register_opcode_stream(Opcode::SmsgIgnoreList);
        assert!(late.recv().await.is_none());
    }

    #[test]
    fn unknown_opcode_is_dropped() {
        let router = OpcodeRouter::new(16);
        // Not in the dispatched set; must not panic, must not allocate a
        // slot.
        router.dispatch_raw(0x7777, body(1));
        router.dispatch_raw(0x7777, body(2));
        assert_eq!(lock(&router.state).slots.len(), 0);
        assert_eq!(lock(&router.state).unhandled_logged.len(), 1);
    }
}
