//! Outbound operation scenarios: optimistic targeting, paced bulk
//! selling, and the fire-and-forget component senders.

mod support;

use std::sync::Arc;
use std::time::Duration;

use hearthlink_client::ClientError;
use hearthlink_client::component::{
    BulkSellOptions, Combat, CombatEventKind, Emotes, GameObjects, ObjectEventKind, SellCandidate,
    Targeting, Vendor, VendorWindowEvent,
};
use hearthlink_proto::Opcode;
use tokio_util::sync::CancellationToken;

use support::{feed, read_outbound, session};

#[tokio::test]
async fn set_target_is_optimistic_then_hits_the_wire() {
    let (client, mut server) = session();
    let targeting = Targeting::new(client);
    let mut changes = targeting.target_changes();
    let cancel = CancellationToken::new();

    targeting.set_target(0xBEEF, &cancel).await.unwrap();

    // The optimistic transition was recorded and emitted.
    assert_eq!(targeting.current_target(), Some(0xBEEF));
    let change = changes.recv().await.unwrap();
    assert_eq!(change.previous, None);
    assert_eq!(change.current, Some(0xBEEF));

    let (opcode, body) = read_outbound(&mut server).await;
    assert_eq!(opcode, Opcode::CmsgSetSelection.to_u16());
    assert_eq!(body, 0xBEEFu64.to_le_bytes());
}

#[tokio::test]
async fn server_disagreement_emits_a_corrective_transition() {
    let (client, _server) = session();
    let targeting = Targeting::new(client);
    let mut changes = targeting.target_changes();
    let cancel = CancellationToken::new();

    targeting.set_target(0xBEEF, &cancel).await.unwrap();
    let optimistic = changes.recv().await.unwrap();
    assert_eq!(optimistic.current, Some(0xBEEF));

    // The server says the effective target is someone else.
    targeting.notify_server_target(Some(0xF00D));
    let corrective = changes.recv().await.unwrap();
    assert_eq!(corrective.previous, Some(0xBEEF));
    assert_eq!(corrective.current, Some(0xF00D));
    assert_eq!(targeting.current_target(), Some(0xF00D));

    // Agreement emits nothing further.
    targeting.notify_server_target(Some(0xF00D));
    assert!(changes.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn assist_waits_one_settle_tick() {
    let (client, mut server) = session();
    let targeting = Targeting::new(client);
    let cancel = CancellationToken::new();

    let started = tokio::time::Instant::now();
    targeting.assist(0x77, &cancel).await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(100));

    let (opcode, _) = read_outbound(&mut server).await;
    assert_eq!(opcode, Opcode::CmsgSetSelection.to_u16());
}

#[tokio::test]
async fn clear_target_sends_guid_zero() {
    let (client, mut server) = session();
    let targeting = Targeting::new(client);
    let cancel = CancellationToken::new();

    targeting.set_target(0x11, &cancel).await.unwrap();
    targeting.clear_target(&cancel).await.unwrap();
    assert_eq!(targeting.current_target(), None);

    let _ = read_outbound(&mut server).await;
    let (_, body) = read_outbound(&mut server).await;
    assert_eq!(body, 0u64.to_le_bytes());
}

async fn open_vendor(vendor: &Vendor, server: &mut tokio::io::DuplexStream) {
    let mut events = vendor.window_events();
    let mut listing = Vec::new();
    listing.extend_from_slice(&0x7777u64.to_le_bytes());
    listing.extend_from_slice(&0u32.to_le_bytes());
    feed(server, Opcode::SmsgListInventory, &listing).await;
    assert!(matches!(events.recv().await.unwrap(), VendorWindowEvent::Opened(_)));
}

#[tokio::test(start_paused = true)]
async fn bulk_sell_paces_sales_and_queues_soulbound() {
    let (client, mut server) = session();
    let vendor = Vendor::new(client);
    open_vendor(&vendor, &mut server).await;

    let mut confirmations = vendor.sell_confirmations();
    let cancel = CancellationToken::new();
    let candidates = [
        SellCandidate { item_id: 100, soulbound: false },
        SellCandidate { item_id: 200, soulbound: true },
        SellCandidate { item_id: 300, soulbound: false },
    ];

    let report = vendor
        .sell_all_junk(&candidates, &BulkSellOptions::default(), &cancel)
        .await
        .unwrap();

    assert_eq!(report.sold, 2);
    assert_eq!(report.queued_confirmations, 1);
    assert!(!report.timed_out);

    // The soulbound item went to the confirmation stream, not the wire.
    assert_eq!(confirmations.recv().await.unwrap().item_id, 200);

    let (opcode, body) = read_outbound(&mut server).await;
    assert_eq!(opcode, Opcode::CmsgSellItem.to_u16());
    assert_eq!(&body[8..12], &100u32.to_le_bytes());
    let (_, body) = read_outbound(&mut server).await;
    assert_eq!(&body[8..12], &300u32.to_le_bytes());
}

#[tokio::test(start_paused = true)]
async fn bulk_sell_honors_soulbound_opt_in() {
    let (client, mut server) = session();
    let vendor = Vendor::new(client);
    open_vendor(&vendor, &mut server).await;

    let cancel = CancellationToken::new();
    let candidates = [SellCandidate { item_id: 200, soulbound: true }];
    let options = BulkSellOptions { sell_soulbound: true, ..BulkSellOptions::default() };

    let report = vendor.sell_all_junk(&candidates, &options, &cancel).await.unwrap();
    assert_eq!(report.sold, 1);
    assert_eq!(report.queued_confirmations, 0);

    let (opcode, body) = read_outbound(&mut server).await;
    assert_eq!(opcode, Opcode::CmsgSellItem.to_u16());
    assert_eq!(&body[8..12], &200u32.to_le_bytes());
}

#[tokio::test(start_paused = true)]
async fn bulk_sell_aborts_on_wall_clock_budget() {
    let (client, mut server) = session();
    let vendor = Vendor::new(client);
    open_vendor(&vendor, &mut server).await;

    let cancel = CancellationToken::new();
    let candidates: Vec<SellCandidate> =
        (0..100).map(|i| SellCandidate { item_id: i, soulbound: false }).collect();
    let options = BulkSellOptions {
        per_item_delay: Duration::from_millis(200),
        max_total_duration: Duration::from_secs(1),
        sell_soulbound: false,
    };

    let report = vendor.sell_all_junk(&candidates, &options, &cancel).await.unwrap();
    assert!(report.timed_out);
    assert!(report.sold < 100);
    // Roughly the budget divided by the pacing, never the whole batch.
    assert!(report.sold >= 4);
}

#[tokio::test]
async fn bulk_sell_requires_an_open_window() {
    let (client, _server) = session();
    let vendor = Vendor::new(client);
    let cancel = CancellationToken::new();

    let result = vendor
        .sell_all_junk(&[], &BulkSellOptions::default(), &cancel)
        .await;
    assert!(matches!(result, Err(ClientError::Protocol(_))));
}

#[tokio::test]
async fn emote_and_object_and_pet_senders() {
    let (client, mut server) = session();
    let emotes = Emotes::new(Arc::clone(&client));
    let objects = GameObjects::new(Arc::clone(&client));
    let combat = Combat::new(client);
    let cancel = CancellationToken::new();

    emotes.emote(4, &cancel).await.unwrap();
    emotes.text_emote(101, Some(0x55), &cancel).await.unwrap();
    objects.use_object(0x88, &cancel).await.unwrap();
    combat.pet_action(0x99, 0x0700_0002, Some(0x55), &cancel).await.unwrap();

    let (opcode, body) = read_outbound(&mut server).await;
    assert_eq!(opcode, Opcode::CmsgEmote.to_u16());
    assert_eq!(body, 4u32.to_le_bytes());

    let (opcode, body) = read_outbound(&mut server).await;
    assert_eq!(opcode, Opcode::CmsgTextEmote.to_u16());
    assert_eq!(&body[0..4], &101u32.to_le_bytes());
    assert_eq!(&body[4..12], &0x55u64.to_le_bytes());

    let (opcode, body) = read_outbound(&mut server).await;
    assert_eq!(opcode, Opcode::CmsgGameObjUse.to_u16());
    assert_eq!(body, 0x88u64.to_le_bytes());

    let (opcode, body) = read_outbound(&mut server).await;
    assert_eq!(opcode, Opcode::CmsgPetAction.to_u16());
    assert_eq!(body.len(), 20);
    assert_eq!(&body[0..8], &0x99u64.to_le_bytes());
}

#[tokio::test]
async fn external_event_hooks_fan_out() {
    let (client, _server) = session();
    let objects = GameObjects::new(Arc::clone(&client));
    let combat = Combat::new(client);

    let mut object_events = objects.object_events();
    let mut combat_events = combat.combat_events();

    objects.on_event(ObjectEventKind::Updated, bytes::Bytes::from_static(&[1, 2]));
    combat.on_event(CombatEventKind::AttackStart, bytes::Bytes::new());

    let event = object_events.recv().await.unwrap();
    assert_eq!(event.kind, ObjectEventKind::Updated);
    assert_eq!(&event.payload[..], &[1, 2]);

    let event = combat_events.recv().await.unwrap();
    assert_eq!(event.kind, CombatEventKind::AttackStart);
}
