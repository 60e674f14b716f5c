//! End-to-end session behavior: dispatch through the real read loop,
//! send-path semantics, cipher transparency, and disconnect propagation.

mod support;

use bytes::Bytes;
use hearthlink_client::{ClientError, Disconnect, SendError};
use hearthlink_proto::Opcode;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

use support::{
    MirrorCipher, feed, feed_masked, read_outbound, read_outbound_masked, session, session_with,
};

#[tokio::test]
async fn stalled_subscriber_sheds_without_blocking_the_read_loop() {
    let config = hearthlink_client::ClientConfig { backlog_limit: 4, ..Default::default() };
    let (client, mut server) = session_with(config);

    let mut stalled = client.register_opcode_stream(Opcode::SmsgFriendStatus);
    let mut healthy = client.register_opcode_stream(Opcode::SmsgFriendStatus);

    // The healthy subscriber keeps up while its sibling never reads;
    // each recv also proves the read loop was never blocked by the
    // stalled 4-deep backlog.
    for i in 0u8..12 {
        feed(&mut server, Opcode::SmsgFriendStatus, &[i]).await;
        assert_eq!(healthy.recv().await.unwrap()[0], i);
    }
    assert_eq!(healthy.shed_count(), 0);

    // The stalled one lost the oldest packets and kept the newest
    // window, still in order.
    assert_eq!(stalled.shed_count(), 8);
    for i in 8u8..12 {
        assert_eq!(stalled.recv().await.unwrap()[0], i);
    }
}

#[tokio::test]
async fn router_delivery_through_the_read_loop() {
    let (client, mut server) = session();

    let mut a = client.register_opcode_stream(Opcode::SmsgFriendStatus);
    let mut b = client.register_opcode_stream(Opcode::SmsgFriendStatus);

    for i in 1u8..=3 {
        feed(&mut server, Opcode::SmsgFriendStatus, &[i]).await;
    }

    for i in 1u8..=3 {
        assert_eq!(a.recv().await.unwrap()[0], i);
        assert_eq!(b.recv().await.unwrap()[0], i);
    }
}

#[tokio::test]
async fn subscription_cancellation_and_no_replay() {
    let (client, mut server) = session();

    let a = client.register_opcode_stream(Opcode::SmsgFriendStatus);
    let mut b = client.register_opcode_stream(Opcode::SmsgFriendStatus);
    drop(a);

    for i in 1u8..=3 {
        feed(&mut server, Opcode::SmsgFriendStatus, &[i]).await;
    }
    for i in 1u8..=3 {
        assert_eq!(b.recv().await.unwrap()[0], i);
    }
    assert_eq!(client.router().subscriber_count(Opcode::SmsgFriendStatus), 1);

    // A fresh subscriber sees only packets dispatched after it joined.
    let mut c = client.register_opcode_stream(Opcode::SmsgFriendStatus);
    feed(&mut server, Opcode::SmsgFriendStatus, &[9]).await;
    assert_eq!(b.recv().await.unwrap()[0], 9);
    assert_eq!(c.recv().await.unwrap()[0], 9);
    assert!(c.try_recv().is_none());
}

#[tokio::test]
async fn send_reaches_the_wire() {
    let (client, mut server) = session();
    let cancel = CancellationToken::new();

    client
        .send(Opcode::CmsgSetSelection, Bytes::copy_from_slice(&0xABCDu64.to_le_bytes()), &cancel)
        .await
        .unwrap();

    let (opcode, body) = read_outbound(&mut server).await;
    assert_eq!(opcode, Opcode::CmsgSetSelection.to_u16());
    assert_eq!(body, 0xABCDu64.to_le_bytes());
}

#[tokio::test]
async fn cancellation_before_admission_sends_nothing() {
    let (client, mut server) = session();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = client
        .send(Opcode::CmsgEmote, Bytes::copy_from_slice(&4u32.to_le_bytes()), &cancel)
        .await;
    assert_eq!(result, Err(SendError::Cancelled));

    // Nothing was queued: a subsequent send is the first thing on the
    // wire.
    let fresh = CancellationToken::new();
    client
        .send(Opcode::CmsgGameObjUse, Bytes::copy_from_slice(&7u64.to_le_bytes()), &fresh)
        .await
        .unwrap();
    let (opcode, _) = read_outbound(&mut server).await;
    assert_eq!(opcode, Opcode::CmsgGameObjUse.to_u16());
}

#[tokio::test]
async fn framing_error_is_fatal_and_fails_sends() {
    let (client, mut server) = session();

    // size field smaller than the opcode width
    server.write_all(&[0x00, 0x01, 0x7E, 0x01]).await.unwrap();

    let disconnect = client.wait_disconnected().await;
    assert!(matches!(disconnect, Disconnect::Error(ClientError::Framing(_))));

    let cancel = CancellationToken::new();
    let result = client.send(Opcode::CmsgEmote, Bytes::new(), &cancel).await;
    assert_eq!(result, Err(SendError::Disconnected));
}

#[tokio::test]
async fn clean_eof_reports_no_error_and_ends_streams() {
    let (client, mut server) = session();
    let mut sub = client.register_opcode_stream(Opcode::SmsgGossipComplete);

    feed(&mut server, Opcode::SmsgGossipComplete, &[]).await;
    drop(server);

    let disconnect = client.wait_disconnected().await;
    assert_eq!(disconnect.error(), None);

    // Backlog drains, then the stream ends.
    assert!(sub.recv().await.is_some());
    assert!(sub.recv().await.is_none());
}

#[tokio::test]
async fn local_disconnect_ends_the_session() {
    let (client, mut server) = session();
    let mut sub = client.register_opcode_stream(Opcode::SmsgFriendList);

    client.disconnect();
    assert!(client.is_disconnected());
    assert_eq!(client.wait_disconnected().await, Disconnect::Clean);
    assert!(sub.recv().await.is_none());

    let cancel = CancellationToken::new();
    assert_eq!(
        client.send(Opcode::CmsgEmote, Bytes::new(), &cancel).await,
        Err(SendError::Disconnected)
    );

    // Both loop tasks exit and drop their transport halves, so the peer
    // sees the connection closed in both directions.
    let mut probe = [0u8; 1];
    let read = tokio::io::AsyncReadExt::read(&mut server, &mut probe).await.unwrap();
    assert_eq!(read, 0, "peer must observe EOF after a local disconnect");
}

#[tokio::test]
async fn oversized_send_fails_without_killing_the_session() {
    let (client, mut server) = session();
    let cancel = CancellationToken::new();

    let body = Bytes::from(vec![0u8; hearthlink_proto::frame::MAX_OUTBOUND_BODY + 1]);
    let result = client.send(Opcode::CmsgEmote, body, &cancel).await;
    assert!(matches!(result, Err(SendError::PayloadTooLarge { .. })));
    assert!(!client.is_disconnected());

    client
        .send(Opcode::CmsgEmote, Bytes::copy_from_slice(&4u32.to_le_bytes()), &cancel)
        .await
        .unwrap();
    let (opcode, _) = read_outbound(&mut server).await;
    assert_eq!(opcode, Opcode::CmsgEmote.to_u16());
}

#[tokio::test]
async fn session_key_masks_both_directions() {
    let key = {
        let mut key = [0u8; 40];
        for (i, byte) in key.iter_mut().enumerate() {
            *byte = (i as u8).wrapping_mul(11).wrapping_add(1);
        }
        key
    };

    let (client, mut server) = session();
    client.install_session_key(key);

    // Inbound: masked headers decode transparently.
    let mut server_send = MirrorCipher::new(key);
    let mut sub = client.register_opcode_stream(Opcode::SmsgFriendStatus);
    feed_masked(&mut server, &mut server_send, Opcode::SmsgFriendStatus, &[3, 0, 0]).await;
    feed_masked(&mut server, &mut server_send, Opcode::SmsgFriendStatus, &[7]).await;
    assert_eq!(&sub.recv().await.unwrap()[..], &[3, 0, 0]);
    assert_eq!(&sub.recv().await.unwrap()[..], &[7]);

    // Outbound: the server unmasks what the client masked.
    let cancel = CancellationToken::new();
    let mut server_recv = MirrorCipher::new(key);
    client
        .send(Opcode::CmsgSetSelection, Bytes::copy_from_slice(&0x55u64.to_le_bytes()), &cancel)
        .await
        .unwrap();
    client
        .send(Opcode::CmsgEmote, Bytes::copy_from_slice(&4u32.to_le_bytes()), &cancel)
        .await
        .unwrap();

    let (opcode, body) = read_outbound_masked(&mut server, &mut server_recv).await;
    assert_eq!(opcode, Opcode::CmsgSetSelection.to_u16());
    assert_eq!(body, 0x55u64.to_le_bytes());

    let (opcode, body) = read_outbound_masked(&mut server, &mut server_recv).await;
    assert_eq!(opcode, Opcode::CmsgEmote.to_u16());
    assert_eq!(body, 4u32.to_le_bytes());
}

#[tokio::test]
async fn unhandled_opcode_is_dropped_quietly() {
    let (client, mut server) = session();
    let mut sub = client.register_opcode_stream(Opcode::SmsgGossipComplete);

    // An opcode outside the dispatched set, then a handled one; the
    // stream sees only the handled packet and the session stays up.
    let packet = hearthlink_proto::frame::encode_server_packet(Opcode::SmsgFriendList, &[0]).unwrap();
    let mut raw = packet.to_vec();
    raw[2] = 0xFF; // mangle the opcode to something unknown
    raw[3] = 0x7F;
    server.write_all(&raw).await.unwrap();
    feed(&mut server, Opcode::SmsgGossipComplete, &[]).await;

    assert!(sub.recv().await.is_some());
    assert!(!client.is_disconnected());
}
