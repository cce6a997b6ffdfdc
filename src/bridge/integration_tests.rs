//! End-to-end pipeline scenarios over in-memory store and channel doubles

use super::{DropReason, EventPublisher, Outcome, PublishError, SnapshotBridge, EXTERNAL_TWIN_MODEL};
use crate::event::{
    RawEvent, RELATIONSHIP_CREATE_TAG, TWIN_CREATE_TAG, TWIN_DELETE_TAG, TWIN_UPDATE_TAG,
};
use crate::graph::{EntityId, EntitySnapshot, GraphClient, GraphError, ModelId, Relationship};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// === Test doubles ===

/// In-memory twin store.
#[derive(Default)]
struct FakeGraphClient {
    twins: HashMap<String, Value>,
    relationships: HashMap<String, Vec<Value>>,
    unavailable: bool,
}

impl FakeGraphClient {
    fn with_twin(mut self, id: &str, twin: Value) -> Self {
        self.twins.insert(id.to_string(), twin);
        self
    }

    fn with_relationships(mut self, id: &str, relationships: Vec<Value>) -> Self {
        self.relationships.insert(id.to_string(), relationships);
        self
    }

    fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl GraphClient for FakeGraphClient {
    async fn entity_snapshot(&self, id: &EntityId) -> Result<EntitySnapshot, GraphError> {
        if self.unavailable {
            return Err(GraphError::Unavailable("store offline".to_string()));
        }
        let twin = self
            .twins
            .get(id.as_str())
            .ok_or_else(|| GraphError::NotFound(id.clone()))?;
        serde_json::from_value(twin.clone()).map_err(|e| GraphError::Decode(e.to_string()))
    }

    async fn outgoing_relationships(
        &self,
        id: &EntityId,
    ) -> Result<Vec<Relationship>, GraphError> {
        if self.unavailable {
            return Err(GraphError::Unavailable("store offline".to_string()));
        }
        self.relationships
            .get(id.as_str())
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|r| serde_json::from_value(r).map_err(|e| GraphError::Decode(e.to_string())))
            .collect()
    }

    async fn entity_model(&self, id: &EntityId) -> Result<ModelId, GraphError> {
        let snapshot = self.entity_snapshot(id).await?;
        snapshot
            .model()
            .ok_or_else(|| GraphError::Decode(format!("twin {} has no model", id)))
    }
}

/// Publisher that records every (target, payload) pair.
#[derive(Default)]
struct RecordingPublisher {
    messages: Mutex<Vec<(String, String)>>,
}

impl RecordingPublisher {
    fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, target: &str, payload: &str) -> Result<(), PublishError> {
        self.messages
            .lock()
            .unwrap()
            .push((target.to_string(), payload.to_string()));
        Ok(())
    }
}

/// Publisher whose channel is down.
struct FailingPublisher;

#[async_trait]
impl EventPublisher for FailingPublisher {
    async fn publish(&self, _target: &str, _payload: &str) -> Result<(), PublishError> {
        Err(PublishError::Unavailable("channel offline".to_string()))
    }
}

// === Fixtures ===

const LAMP_MODEL: &str = "dtmi:example:Lamp;1";
const ROOM_MODEL: &str = "dtmi:example:Room;1";
const EVENT_TIME: &str = "2024-03-01T10:15:00Z";

fn lamp_twin() -> Value {
    json!({
        "$dtId": "lamp-1",
        "$etag": "W/\"abc\"",
        "$metadata": {"$model": LAMP_MODEL},
        "on": true,
        "luminosity": 80
    })
}

fn raw(tag: &str, subject: Option<&str>, data: Value) -> RawEvent {
    RawEvent {
        event_type: tag.to_string(),
        subject: subject.map(String::from),
        time: EVENT_TIME.parse().unwrap(),
        data,
    }
}

fn twin_create(subject: &str, model: &str) -> RawEvent {
    raw(
        TWIN_CREATE_TAG,
        Some(subject),
        json!({"data": {"$metadata": {"$model": model}}}),
    )
}

fn twin_update(subject: &str, model: &str) -> RawEvent {
    raw(
        TWIN_UPDATE_TAG,
        Some(subject),
        json!({"data": {"modelId": model, "patch": []}}),
    )
}

fn bridge(
    graph: FakeGraphClient,
    publisher: Arc<dyn EventPublisher>,
) -> SnapshotBridge {
    SnapshotBridge::new(Arc::new(graph), publisher)
}

// === Scenario: native twin creation is snapshotted and published ===

#[tokio::test]
async fn twin_create_publishes_full_snapshot() {
    let graph = FakeGraphClient::default()
        .with_twin("lamp-1", lamp_twin())
        .with_relationships("lamp-1", vec![]);
    let publisher = Arc::new(RecordingPublisher::default());
    let bridge = bridge(graph, publisher.clone());

    let outcome = bridge.handle(&twin_create("lamp-1", LAMP_MODEL)).await.unwrap();
    assert!(matches!(outcome, Outcome::Published(_)));

    let messages = publisher.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, super::UPDATE_TARGET);

    let payload: Value = serde_json::from_str(&messages[0].1).unwrap();
    assert_eq!(payload["dtId"], json!("lamp-1"));
    assert_eq!(payload["eventType"], json!("CREATE"));
    assert_eq!(payload["properties"], json!({"on": true, "luminosity": 80}));
    assert_eq!(payload["relationships"], json!([]));
}

// === Scenario: external-shadow twin events are filtered, never published ===

#[tokio::test]
async fn external_twin_event_is_filtered() {
    let publisher = Arc::new(RecordingPublisher::default());
    let bridge = bridge(FakeGraphClient::default(), publisher.clone());

    let outcome = bridge
        .handle(&twin_create("shadow-1", EXTERNAL_TWIN_MODEL))
        .await
        .unwrap();

    assert!(matches!(outcome, Outcome::Filtered { .. }));
    assert!(publisher.messages().is_empty());
}

// === Scenario: update snapshot strips bookkeeping and resolves relationships ===

#[tokio::test]
async fn twin_update_resolves_internal_and_external_relationships() {
    let graph = FakeGraphClient::default()
        .with_twin("lamp-1", lamp_twin())
        .with_twin(
            "room-7",
            json!({
                "$dtId": "room-7",
                "$metadata": {"$model": ROOM_MODEL}
            }),
        )
        .with_twin(
            "shadow-1",
            json!({
                "$dtId": "shadow-1",
                "$metadata": {"$model": EXTERNAL_TWIN_MODEL},
                "uri": "https://other.example/shadow-1"
            }),
        )
        .with_relationships(
            "lamp-1",
            vec![
                json!({
                    "$relationshipId": "rel-1",
                    "$etag": "W/\"r1\"",
                    "$relationshipName": "isIn",
                    "$targetId": "room-7"
                }),
                json!({
                    "$relationshipId": "rel-2",
                    "$etag": "W/\"r2\"",
                    "$relationshipName": "mirrors",
                    "$targetId": "shadow-1"
                }),
            ],
        );
    let publisher = Arc::new(RecordingPublisher::default());
    let bridge = bridge(graph, publisher.clone());

    bridge.handle(&twin_update("lamp-1", LAMP_MODEL)).await.unwrap();

    let payload: Value = serde_json::from_str(&publisher.messages()[0].1).unwrap();
    assert_eq!(payload["eventType"], json!("UPDATE"));
    // Reserved keys stripped from properties.
    assert!(payload["properties"].get("$dtId").is_none());
    assert!(payload["properties"].get("$etag").is_none());
    assert!(payload["properties"].get("$metadata").is_none());

    let relationships = payload["relationships"].as_array().unwrap();
    assert_eq!(relationships.len(), 2);

    // Internal target: raw id preserved, external false.
    assert_eq!(relationships[0]["$targetId"], json!("room-7"));
    assert_eq!(relationships[0]["external"], json!(false));
    assert!(relationships[0].get("$relationshipId").is_none());
    assert!(relationships[0].get("$etag").is_none());

    // External target: id substituted with the target's public URI.
    assert_eq!(
        relationships[1]["$targetId"],
        json!("https://other.example/shadow-1")
    );
    assert_eq!(relationships[1]["external"], json!(true));
}

// === Scenario: relationship records without a target are omitted ===

#[tokio::test]
async fn relationship_without_target_is_silently_omitted() {
    let graph = FakeGraphClient::default()
        .with_twin("lamp-1", lamp_twin())
        .with_twin("room-7", json!({"$metadata": {"$model": ROOM_MODEL}}))
        .with_relationships(
            "lamp-1",
            vec![
                json!({"$relationshipName": "dangling"}),
                json!({"$relationshipName": "isIn", "$targetId": "room-7"}),
            ],
        );
    let publisher = Arc::new(RecordingPublisher::default());
    let bridge = bridge(graph, publisher.clone());

    let outcome = bridge.handle(&twin_update("lamp-1", LAMP_MODEL)).await.unwrap();
    assert!(matches!(outcome, Outcome::Published(_)));

    let payload: Value = serde_json::from_str(&publisher.messages()[0].1).unwrap();
    let relationships = payload["relationships"].as_array().unwrap();
    assert_eq!(relationships.len(), 1);
    assert_eq!(relationships[0]["$targetId"], json!("room-7"));
}

// === Scenario: deletes carry metadata only and need no store access ===

#[tokio::test]
async fn twin_delete_publishes_bare_event_without_store_access() {
    // Store is offline; a delete must still go out.
    let publisher = Arc::new(RecordingPublisher::default());
    let bridge = bridge(FakeGraphClient::unavailable(), publisher.clone());

    let event = raw(
        TWIN_DELETE_TAG,
        Some("lamp-1"),
        json!({"data": {"$metadata": {"$model": LAMP_MODEL}}}),
    );
    let outcome = bridge.handle(&event).await.unwrap();
    assert!(matches!(outcome, Outcome::Published(_)));

    let payload: Value = serde_json::from_str(&publisher.messages()[0].1).unwrap();
    assert_eq!(payload["eventType"], json!("DELETE"));
    assert!(payload.get("properties").is_none());
    assert!(payload.get("relationships").is_none());
}

// === Scenario: relationship events re-snapshot the source entity as UPDATE ===

#[tokio::test]
async fn relationship_create_surfaces_as_source_update() {
    let graph = FakeGraphClient::default()
        .with_twin("lamp-1", lamp_twin())
        .with_twin("room-7", json!({"$metadata": {"$model": ROOM_MODEL}}))
        .with_relationships("lamp-1", vec![json!({"$targetId": "room-7"})]);
    let publisher = Arc::new(RecordingPublisher::default());
    let bridge = bridge(graph, publisher.clone());

    let event = raw(
        RELATIONSHIP_CREATE_TAG,
        None,
        json!({"data": {"$sourceId": "lamp-1", "$targetId": "room-7"}}),
    );
    let outcome = bridge.handle(&event).await.unwrap();
    assert!(matches!(outcome, Outcome::Published(_)));

    let payload: Value = serde_json::from_str(&publisher.messages()[0].1).unwrap();
    assert_eq!(payload["dtId"], json!("lamp-1"));
    assert_eq!(payload["eventType"], json!("UPDATE"));
    assert_eq!(payload["relationships"][0]["external"], json!(false));
}

// === Scenario: unrecognized and malformed events drop without publishing ===

#[tokio::test]
async fn unknown_event_tag_is_dropped() {
    let publisher = Arc::new(RecordingPublisher::default());
    let bridge = bridge(FakeGraphClient::default(), publisher.clone());

    let event = raw("Microsoft.Storage.BlobCreated", Some("blob-1"), json!({}));
    let outcome = bridge.handle(&event).await.unwrap();

    assert!(matches!(
        outcome,
        Outcome::Dropped(DropReason::Unclassifiable(_))
    ));
    assert!(publisher.messages().is_empty());
}

// === Scenario: store failure during assembly drops the whole event ===

#[tokio::test]
async fn store_failure_drops_event_without_partial_publish() {
    // Classification succeeds (model is inline); assembly cannot.
    let publisher = Arc::new(RecordingPublisher::default());
    let bridge = bridge(FakeGraphClient::unavailable(), publisher.clone());

    let outcome = bridge.handle(&twin_update("lamp-1", LAMP_MODEL)).await.unwrap();
    assert!(matches!(
        outcome,
        Outcome::Dropped(DropReason::StoreLookupFailed(GraphError::Unavailable(_)))
    ));
    assert!(publisher.messages().is_empty());
}

#[tokio::test]
async fn missing_twin_drops_event() {
    let publisher = Arc::new(RecordingPublisher::default());
    let bridge = bridge(FakeGraphClient::default(), publisher.clone());

    let outcome = bridge.handle(&twin_update("ghost-1", LAMP_MODEL)).await.unwrap();
    assert!(matches!(
        outcome,
        Outcome::Dropped(DropReason::StoreLookupFailed(GraphError::NotFound(_)))
    ));
    assert!(publisher.messages().is_empty());
}

// === Scenario: an external target without a URI breaches the contract ===

#[tokio::test]
async fn external_target_without_uri_drops_event() {
    let graph = FakeGraphClient::default()
        .with_twin("lamp-1", lamp_twin())
        .with_twin("shadow-1", json!({"$metadata": {"$model": EXTERNAL_TWIN_MODEL}}))
        .with_relationships("lamp-1", vec![json!({"$targetId": "shadow-1"})]);
    let publisher = Arc::new(RecordingPublisher::default());
    let bridge = bridge(graph, publisher.clone());

    let outcome = bridge.handle(&twin_update("lamp-1", LAMP_MODEL)).await.unwrap();
    assert!(matches!(
        outcome,
        Outcome::Dropped(DropReason::StoreLookupFailed(GraphError::Decode(_)))
    ));
    assert!(publisher.messages().is_empty());
}

// === Scenario: publish failure surfaces to the caller ===

#[tokio::test]
async fn publish_failure_propagates() {
    let graph = FakeGraphClient::default()
        .with_twin("lamp-1", lamp_twin())
        .with_relationships("lamp-1", vec![]);
    let bridge = bridge(graph, Arc::new(FailingPublisher));

    let result = bridge.handle(&twin_update("lamp-1", LAMP_MODEL)).await;
    assert!(matches!(result, Err(PublishError::Unavailable(_))));
}

// === Scenario: identical input and store state produce identical output ===

#[tokio::test]
async fn reprocessing_is_idempotent() {
    let graph = FakeGraphClient::default()
        .with_twin("lamp-1", lamp_twin())
        .with_twin("room-7", json!({"$metadata": {"$model": ROOM_MODEL}}))
        .with_relationships("lamp-1", vec![json!({"$targetId": "room-7"})]);
    let publisher = Arc::new(RecordingPublisher::default());
    let bridge = bridge(graph, publisher.clone());

    let event = twin_update("lamp-1", LAMP_MODEL);
    bridge.handle(&event).await.unwrap();
    bridge.handle(&event).await.unwrap();

    let messages = publisher.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].1, messages[1].1);
}
