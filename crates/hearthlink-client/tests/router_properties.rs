//! Property tests over the router's ordering guarantees.
//!
//! For any interleaving of two opcodes, each subscriber observes only its
//! own opcode, in the exact order dispatched, regardless of when other
//! subscriptions come and go.

use bytes::Bytes;
use hearthlink_client::OpcodeRouter;
use hearthlink_proto::Opcode;
use proptest::prelude::*;

/// One scripted router action.
#[derive(Debug, Clone)]
enum Action {
    /// Dispatch a packet for opcode A (`true`) or B (`false`).
    Dispatch(bool),
    /// Add a throwaway subscription to opcode A and drop it immediately.
    Churn,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => any::<bool>().prop_map(Action::Dispatch),
        1 => Just(Action::Churn),
    ]
}

proptest! {
    #[test]
    fn interleaved_dispatch_preserves_per_opcode_fifo(
        script in prop::collection::vec(action(), 1..200)
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");
        runtime.block_on(async move {
            let router = OpcodeRouter::new(1024);
            let mut sub_a = router.register_opcode_stream(Opcode::SmsgFriendStatus);
            let mut sub_b = router.register_opcode_stream(Opcode::SmsgListInventory);

            let mut expected_a = Vec::new();
            let mut expected_b = Vec::new();
            let mut counter = 0u16;

            for step in &script {
                match step {
                    Action::Dispatch(to_a) => {
                        let body = Bytes::copy_from_slice(&counter.to_le_bytes());
                        if *to_a {
                            expected_a.push(counter);
                            router.dispatch(Opcode::SmsgFriendStatus, body);
                        } else {
                            expected_b.push(counter);
                            router.dispatch(Opcode::SmsgListInventory, body);
                        }
                        counter += 1;
                    }
                    Action::Churn => {
                        // Subscriber churn on A must not disturb delivery.
                        drop(router.register_opcode_stream(Opcode::SmsgFriendStatus));
                    }
                }
            }

            for want in expected_a {
                let got = sub_a.recv().await.expect("stream alive");
                assert_eq!(u16::from_le_bytes([got[0], got[1]]), want);
            }
            for want in expected_b {
                let got = sub_b.recv().await.expect("stream alive");
                assert_eq!(u16::from_le_bytes([got[0], got[1]]), want);
            }
            assert!(sub_a.try_recv().is_none());
            assert!(sub_b.try_recv().is_none());
        });
    }
}
