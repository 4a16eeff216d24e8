mod common;

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use serde::Deserialize;
use serde_json::json;

use common::*;
use kafka_avro::{AvroDecoder, AvroError, HeaderName, header_value};

fn b64(id: u32, value: &serde_json::Value) -> String {
    STANDARD.encode(mock_encoded(id, value))
}

#[tokio::test]
async fn decodes_key_and_payload() {
    let registry = Arc::new(MockRegistry::new());
    let decoder = AvroDecoder::new(registry.clone());

    let key = b64(KEY_ID, &json!({"id": 1}));
    let payload = b64(VALUE_ID, &json!({"name": "x"}));

    let decoded = decoder.decode_message(&key, Some(payload.as_str())).await.unwrap();
    assert_eq!(decoded.key, json!({"id": 1}));
    assert_eq!(decoded.payload, Some(json!({"name": "x"})));
    assert_eq!(registry.decodes(), 2);
}

#[tokio::test]
async fn missing_payload_decodes_key_only() {
    let registry = Arc::new(MockRegistry::new());
    let decoder = AvroDecoder::new(registry.clone());

    let decoded = decoder
        .decode_message(&b64(KEY_ID, &json!("k")), None)
        .await
        .unwrap();

    assert_eq!(decoded.key, json!("k"));
    assert_eq!(decoded.payload, None);
    assert_eq!(registry.decodes(), 1);
}

#[tokio::test]
async fn unpadded_base64_is_accepted() {
    let registry = Arc::new(MockRegistry::new());
    let decoder = AvroDecoder::new(registry);

    let key = STANDARD_NO_PAD.encode(mock_encoded(KEY_ID, &json!([1, 2])));
    let decoded = decoder.decode_message(&key, None).await.unwrap();
    assert_eq!(decoded.key, json!([1, 2]));
}

#[tokio::test]
async fn invalid_base64_names_the_part() {
    let registry = Arc::new(MockRegistry::new());
    let decoder = AvroDecoder::new(registry.clone());

    let err = decoder
        .decode_message(&b64(KEY_ID, &json!(1)), Some("%%%"))
        .await
        .unwrap_err();

    match err {
        AvroError::Base64 { part, .. } => assert_eq!(part, "payload"),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(registry.decodes(), 0);
}

#[tokio::test]
async fn registry_decode_failure_propagates() {
    let registry = Arc::new(MockRegistry::new());
    let decoder = AvroDecoder::new(registry);

    let err = decoder
        .decode_raw(b"no prefix here", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AvroError::Registry(_)));
}

#[derive(Debug, Deserialize, PartialEq)]
struct Key {
    id: u64,
}

#[derive(Debug, Deserialize, PartialEq)]
struct User {
    name: String,
}

#[tokio::test]
async fn decoded_message_projects_onto_types() {
    let decoder = AvroDecoder::new(Arc::new(MockRegistry::new()));

    let key = mock_encoded(KEY_ID, &json!({"id": 5}));
    let payload = mock_encoded(VALUE_ID, &json!({"name": "ann"}));
    let decoded = decoder
        .decode_raw(&key, Some(&payload[..]))
        .await
        .unwrap();

    let (key, user) = decoded.decode_as::<Key, User>().unwrap();
    assert_eq!(key, Key { id: 5 });
    assert_eq!(
        user,
        Some(User {
            name: "ann".into()
        })
    );
}

#[tokio::test]
async fn produced_envelope_decodes_back() {
    let registry = Arc::new(test_registry());
    let broker = MockBroker::new();
    let producer = producer_with(registry.clone(), &broker, vec![test_topic()]);

    let mut headers = kafka_avro::MessageHeaders::new();
    headers.insert(HeaderName::Action.to_string(), "create".into());

    producer
        .produce_message(
            &json!({"id": 1}),
            Some(&json!({"name": "x"})),
            "test-topic",
            Some(headers),
        )
        .await
        .unwrap();

    let sent = broker.state.last_batch().messages.remove(0);
    let decoded = AvroDecoder::new(registry)
        .decode_raw(&sent.key, sent.value.as_deref())
        .await
        .unwrap();

    assert_eq!(decoded.key, json!({"id": 1}));
    assert_eq!(decoded.payload, Some(json!({"name": "x"})));

    let sent_headers = sent.headers.unwrap();
    assert_eq!(
        header_value(&[&sent_headers], HeaderName::Action),
        Some("create".to_string())
    );
}
