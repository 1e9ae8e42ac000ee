mod common;

use std::sync::Arc;

use futures_util::StreamExt;

use common::{Call, FakeLog, FakeRegistrar, GENERATED, SEED, coordinator};
use dav_api::{
    Bid, BidParams, DomainRecord, LogError, Message, MessageParams, Mission, MissionParams, Need,
    NeedFilterParams, NeedParams, RecordKind, RegistrarError, TopicId,
};
use dav_engine::{CoordinatorError, RecordStream};

fn need_params(need_type: &str) -> NeedParams {
    NeedParams { need_type: need_type.into(), location: None, ttl: None }
}

fn filter() -> NeedFilterParams {
    NeedFilterParams { need_type: "charging".into(), area: None, ttl: None }
}

fn mission_params(n: u32) -> MissionParams {
    MissionParams {
        need_id: format!("need-{n}"),
        bid_id: format!("bid-{n}"),
        vehicle_id: "vehicle-1".into(),
        price: "100".into(),
    }
}

async fn drain<R>(mut stream: RecordStream<R>) -> Vec<Result<R, LogError>> {
    let mut items = Vec::new();
    while let Some(item) = stream.next().await {
        items.push(item);
    }
    items
}

// ═══════════════════════════════════════════════════════════════
//  Topic resolution
// ═══════════════════════════════════════════════════════════════

#[tokio::test]
async fn explicit_topic_skips_provisioning() {
    let (coordinator, journal, _) = coordinator(FakeLog::default(), FakeRegistrar::default());

    let stream = coordinator.missions(Some("SESSION".into())).await.unwrap();
    assert_eq!(stream.topic(), &TopicId::new("SESSION"));
    drain(stream).await;

    assert_eq!(journal.calls(), vec![Call::Subscribe("SESSION".into())]);
}

#[tokio::test]
async fn explicit_topic_for_needs_still_registers_filter() {
    let (coordinator, journal, _) = coordinator(FakeLog::default(), FakeRegistrar::default());

    let stream = coordinator.needs_for_type(filter(), Some("SESSION".into())).await.unwrap();
    drain(stream).await;

    assert_eq!(
        journal.calls(),
        vec![
            Call::Post(
                format!("{SEED}/needsForType/:SESSION"),
                serde_json::to_value(filter()).unwrap()
            ),
            Call::Subscribe("SESSION".into()),
        ]
    );
}

#[tokio::test]
async fn generated_topic_is_provisioned_before_subscribe() {
    let (coordinator, journal, _) = coordinator(FakeLog::default(), FakeRegistrar::default());

    let stream = coordinator.messages(None).await.unwrap();
    assert_eq!(stream.topic(), &TopicId::new(GENERATED));
    drain(stream).await;

    assert_eq!(
        journal.calls(),
        vec![
            Call::Generate(RecordKind::Message),
            Call::Create(GENERATED.into()),
            Call::Subscribe(GENERATED.into()),
        ]
    );
}

#[tokio::test]
async fn generated_needs_topic_is_provisioned_before_filter_and_subscribe() {
    let (coordinator, journal, _) = coordinator(FakeLog::default(), FakeRegistrar::default());

    let stream = coordinator.needs_for_type(filter(), None).await.unwrap();
    assert_eq!(stream.topic(), &TopicId::new(GENERATED));
    drain(stream).await;

    assert_eq!(
        journal.calls(),
        vec![
            Call::Generate(RecordKind::Need),
            Call::Create(GENERATED.into()),
            Call::Post(
                format!("{SEED}/needsForType/:{GENERATED}"),
                serde_json::to_value(filter()).unwrap()
            ),
            Call::Subscribe(GENERATED.into()),
        ]
    );
}

#[tokio::test]
async fn generated_bids_topic_is_provisioned_once() {
    let (coordinator, journal, _) = coordinator(FakeLog::default(), FakeRegistrar::default());

    drain(coordinator.bids(None).await.unwrap()).await;

    assert_eq!(
        journal.calls(),
        vec![
            Call::Generate(RecordKind::Bid),
            Call::Create(GENERATED.into()),
            Call::Subscribe(GENERATED.into()),
        ]
    );
}

#[tokio::test]
async fn generated_topic_is_provisioned_before_publish() {
    let (coordinator, journal, _) = coordinator(FakeLog::default(), FakeRegistrar::default());

    coordinator.publish_need(need_params("parking")).await.unwrap();

    let calls = journal.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0], Call::Generate(RecordKind::Need));
    assert_eq!(calls[1], Call::Create(GENERATED.into()));
    assert!(matches!(&calls[2], Call::Post(..)));
}

// ═══════════════════════════════════════════════════════════════
//  Provisioning failures
// ═══════════════════════════════════════════════════════════════

fn failing_log() -> FakeLog {
    FakeLog { create_error: Some(LogError::broker("broker down")), ..Default::default() }
}

#[tokio::test]
async fn provisioning_failure_stops_publish() {
    let (coordinator, journal, _) = coordinator(failing_log(), FakeRegistrar::default());

    let err = coordinator.publish_need(need_params("parking")).await.unwrap_err();

    assert!(matches!(err, CoordinatorError::TopicProvisioning(_)));
    assert_eq!(err.to_string(), "Topic registration failed: broker down");
    assert!(!journal.calls().iter().any(|c| matches!(c, Call::Post(..))));
}

#[tokio::test]
async fn provisioning_failure_stops_streaming_registration() {
    let (coordinator, journal, _) = coordinator(failing_log(), FakeRegistrar::default());

    let err = coordinator.needs_for_type(filter(), None).await.unwrap_err();
    assert_eq!(err.to_string(), "Topic registration failed: broker down");

    let err = coordinator.missions(None).await.unwrap_err();
    assert_eq!(err.to_string(), "Topic registration failed: broker down");

    tokio::task::yield_now().await;
    assert!(journal
        .calls()
        .iter()
        .all(|c| matches!(c, Call::Generate(_) | Call::Create(_))));
}

// ═══════════════════════════════════════════════════════════════
//  Registration
// ═══════════════════════════════════════════════════════════════

#[tokio::test]
async fn publish_need_posts_to_registrar_and_returns_record() {
    let (coordinator, journal, config) =
        coordinator(FakeLog::default(), FakeRegistrar::default());
    let params = need_params("parking");

    let need = coordinator.publish_need(params.clone()).await.unwrap();

    assert_eq!(need, Need::new(GENERATED.into(), params.clone(), config));
    assert_eq!(
        journal.calls().last(),
        Some(&Call::Post(
            format!("{SEED}/publishNeed/:{GENERATED}"),
            serde_json::to_value(&params).unwrap()
        ))
    );
}

#[tokio::test]
async fn publish_bid_uses_bid_endpoint() {
    let (coordinator, journal, _) = coordinator(FakeLog::default(), FakeRegistrar::default());
    let params =
        BidParams { need_id: "need-1".into(), price: "42".into(), eta_secs: Some(60), ttl: None };

    let bid: Bid = coordinator.publish_bid(params.clone()).await.unwrap();

    assert_eq!(bid.params(), &params);
    assert_eq!(journal.calls()[0], Call::Generate(RecordKind::Bid));
    assert!(matches!(
        journal.calls().last(),
        Some(Call::Post(url, _)) if url == &format!("{SEED}/publishBid/:{GENERATED}")
    ));
}

#[tokio::test]
async fn registrar_failure_keeps_transport_error_as_source() {
    let cause = RegistrarError::Transport("connection reset".into());
    let registrar = FakeRegistrar { error: Some(cause.clone()), ..Default::default() };
    let (coordinator, _, _) = coordinator(FakeLog::default(), registrar);

    let err = coordinator.publish_need(need_params("parking")).await.unwrap_err();

    assert_eq!(err.registrar_error(), Some(&cause));
    assert_eq!(err.to_string(), "Need registration failed: connection reset");
}

#[tokio::test]
async fn rejected_filter_never_opens_a_subscription() {
    let cause = RegistrarError::Status { status: 400, body: "bad filter".into() };
    let registrar = FakeRegistrar { error: Some(cause.clone()), ..Default::default() };
    let (coordinator, journal, _) = coordinator(FakeLog::default(), registrar);

    let err = coordinator.needs_for_type(filter(), None).await.unwrap_err();

    assert_eq!(err.registrar_error(), Some(&cause));
    assert!(err.to_string().starts_with("Needs registration failed: "));
    tokio::task::yield_now().await;
    assert!(!journal.calls().iter().any(|c| matches!(c, Call::Subscribe(_))));
}

// ═══════════════════════════════════════════════════════════════
//  Hydrated streams
// ═══════════════════════════════════════════════════════════════

#[tokio::test]
async fn streamed_records_keep_arrival_order_then_complete() {
    let mut log = FakeLog::default();
    for n in 1..=3 {
        log.queue(&mission_params(n));
    }
    let (coordinator, _, config) = coordinator(log, FakeRegistrar::default());

    let stream = coordinator.missions(None).await.unwrap();
    let items = drain(stream).await;

    let expected: Vec<Result<Mission, LogError>> = (1..=3)
        .map(|n| Ok(Mission::new(GENERATED.into(), mission_params(n), config.clone())))
        .collect();
    assert_eq!(items, expected);
}

#[tokio::test]
async fn open_failure_is_the_only_stream_event() {
    let error = LogError::closed("consumer group rebalancing");
    let log = FakeLog { open_error: Some(error.clone()), ..Default::default() };
    let (coordinator, _, _) = coordinator(log, FakeRegistrar::default());

    let stream = coordinator.messages(Some("chat".into())).await.unwrap();
    let items = drain(stream).await;

    assert_eq!(items, vec![Err(error)]);
}

#[tokio::test]
async fn mid_stream_failure_ends_the_stream() {
    let error = LogError::broker("partition offline");
    let mut log = FakeLog::default();
    log.queue(&mission_params(1));
    log.queued.push(Err(error.clone()));
    log.queue(&mission_params(3));
    let (coordinator, _, config) = coordinator(log, FakeRegistrar::default());

    let items = drain(coordinator.missions(None).await.unwrap()).await;

    assert_eq!(
        items,
        vec![Ok(Mission::new(GENERATED.into(), mission_params(1), config)), Err(error)]
    );
}

#[tokio::test]
async fn undecodable_payload_surfaces_as_decode_error() {
    let mut log = FakeLog::default();
    log.queued.push(Ok(serde_json::json!({ "unexpected": true })));
    let (coordinator, _, _) = coordinator(log, FakeRegistrar::default());

    let items = drain(coordinator.bids(Some("b".into())).await.unwrap()).await;

    assert_eq!(items.len(), 1);
    let err = items[0].as_ref().unwrap_err();
    assert_eq!(err.kind(), dav_api::LogErrorKind::Decode);
}

// ═══════════════════════════════════════════════════════════════
//  Local construction and sends
// ═══════════════════════════════════════════════════════════════

#[tokio::test]
async fn local_constructors_make_no_calls() {
    let (coordinator, journal, config) =
        coordinator(FakeLog::default(), FakeRegistrar::default());

    let need = coordinator.need("N".into(), need_params("parking"));
    let bid_params =
        BidParams { need_id: "N".into(), price: "5".into(), eta_secs: None, ttl: None };
    let bid = coordinator.bid("B".into(), bid_params.clone());
    let mission = coordinator.mission("M".into(), mission_params(1));

    assert_eq!(need, Need::new("N".into(), need_params("parking"), config.clone()));
    assert_eq!(bid, Bid::new("B".into(), bid_params, config.clone()));
    assert_eq!(mission, Mission::new("M".into(), mission_params(1), Arc::clone(&config)));
    assert!(journal.calls().is_empty());
}

#[tokio::test]
async fn send_message_goes_to_the_log_only() {
    let (coordinator, journal, _) = coordinator(FakeLog::default(), FakeRegistrar::default());
    let params = MessageParams { message_type: "eta".into(), body: serde_json::json!(30) };

    coordinator.send_message(&"chat".into(), &params).await.unwrap();
    let message: Message = coordinator.message("chat".into(), params);

    assert_eq!(message.topic(), &TopicId::new("chat"));
    assert_eq!(journal.calls(), vec![Call::Send("chat".into())]);
}

#[tokio::test]
async fn send_failure_is_reported_as_send_error() {
    let cause = LogError::not_found("topic 'gone' not found");
    let log = FakeLog { send_error: Some(cause.clone()), ..Default::default() };
    let (coordinator, journal, _) = coordinator(log, FakeRegistrar::default());
    let params = MessageParams { message_type: "eta".into(), body: serde_json::json!(30) };

    let err = coordinator.send_message(&"gone".into(), &params).await.unwrap_err();

    assert!(matches!(&err, CoordinatorError::Send(e) if e == &cause));
    assert_eq!(err.to_string(), "message send failed: topic 'gone' not found");
    assert_eq!(journal.calls(), vec![Call::Send("gone".into())]);
}
