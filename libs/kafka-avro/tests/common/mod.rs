//! Recording registry and broker doubles shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use serde_json::Value;

use kafka_avro::{
    AvroProducer, BrokerClient, BrokerError, BrokerProducer, DeliveryAck, ProducerBatch,
    ProducerConfig, RegistryError, SchemaId, SchemaRegistry, TopicAvroSettings,
};

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Encodes `value` as `"{id}:{json}"`, decodes it back the same way.
#[derive(Default)]
pub struct MockRegistry {
    latest_ids: HashMap<String, SchemaId>,
    pinned_ids: HashMap<(String, u32), SchemaId>,
    fail_encode_for: Option<SchemaId>,

    pub latest_calls: AtomicUsize,
    pub schema_id_calls: AtomicUsize,
    pub encode_calls: AtomicUsize,
    pub decode_calls: AtomicUsize,
    pub encoded: Mutex<Vec<(SchemaId, Value)>>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latest(mut self, subject: &str, id: SchemaId) -> Self {
        self.latest_ids.insert(subject.to_string(), id);
        self
    }

    pub fn with_version(mut self, subject: &str, version: u32, id: SchemaId) -> Self {
        self.pinned_ids.insert((subject.to_string(), version), id);
        self
    }

    pub fn failing_encode_for(mut self, id: SchemaId) -> Self {
        self.fail_encode_for = Some(id);
        self
    }

    pub fn latest(&self) -> usize {
        self.latest_calls.load(Ordering::SeqCst)
    }

    pub fn pinned(&self) -> usize {
        self.schema_id_calls.load(Ordering::SeqCst)
    }

    pub fn encodes(&self) -> usize {
        self.encode_calls.load(Ordering::SeqCst)
    }

    pub fn decodes(&self) -> usize {
        self.decode_calls.load(Ordering::SeqCst)
    }

    pub fn encodes_with(&self, id: SchemaId) -> usize {
        self.encoded
            .lock()
            .unwrap()
            .iter()
            .filter(|(i, _)| *i == id)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.latest() + self.pinned() + self.encodes() + self.decodes()
    }
}

/// Wire form used by [`MockRegistry`].
pub fn mock_encoded(id: SchemaId, value: &Value) -> Bytes {
    Bytes::from(format!("{id}:{value}"))
}

impl SchemaRegistry for MockRegistry {
    fn latest_schema_id(
        &self,
        subject: &str,
    ) -> Pin<Box<dyn Future<Output = Result<SchemaId, RegistryError>> + Send + '_>> {
        let subject = subject.to_string();
        Box::pin(async move {
            self.latest_calls.fetch_add(1, Ordering::SeqCst);
            self.latest_ids
                .get(&subject)
                .copied()
                .ok_or_else(|| RegistryError::resolve(format!("subject not found: {subject}")))
        })
    }

    fn schema_id(
        &self,
        subject: &str,
        version: u32,
    ) -> Pin<Box<dyn Future<Output = Result<SchemaId, RegistryError>> + Send + '_>> {
        let subject = subject.to_string();
        Box::pin(async move {
            self.schema_id_calls.fetch_add(1, Ordering::SeqCst);
            self.pinned_ids
                .get(&(subject.clone(), version))
                .copied()
                .ok_or_else(|| {
                    RegistryError::resolve(format!("version {version} not found: {subject}"))
                })
        })
    }

    fn encode(
        &self,
        id: SchemaId,
        value: &Value,
    ) -> Pin<Box<dyn Future<Output = Result<Bytes, RegistryError>> + Send + '_>> {
        let value = value.clone();
        Box::pin(async move {
            self.encode_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_encode_for == Some(id) {
                return Err(RegistryError::encode(format!("value does not match schema {id}")));
            }
            let bytes = mock_encoded(id, &value);
            self.encoded.lock().unwrap().push((id, value));
            Ok(bytes)
        })
    }

    fn decode(
        &self,
        data: &[u8],
    ) -> Pin<Box<dyn Future<Output = Result<Value, RegistryError>> + Send + '_>> {
        let data = data.to_vec();
        Box::pin(async move {
            self.decode_calls.fetch_add(1, Ordering::SeqCst);
            let text = String::from_utf8(data)
                .map_err(|e| RegistryError::decode(format!("not utf-8: {e}")))?;
            let (_, json) = text
                .split_once(':')
                .ok_or_else(|| RegistryError::decode("missing schema id prefix"))?;
            serde_json::from_str(json).map_err(|e| RegistryError::decode(e.to_string()))
        })
    }
}

// ---------------------------------------------------------------------------
// Broker
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct BrokerState {
    pub configs: Mutex<Vec<ProducerConfig>>,
    pub batches: Mutex<Vec<ProducerBatch>>,
    pub connects: AtomicUsize,
    pub disconnects: AtomicUsize,
    pub fail_send: AtomicBool,
}

impl BrokerState {
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn disconnects(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }

    pub fn sends(&self) -> usize {
        self.batches.lock().unwrap().len()
    }

    pub fn last_batch(&self) -> ProducerBatch {
        self.batches
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no batch sent")
    }

    pub fn total_calls(&self) -> usize {
        self.connects() + self.disconnects() + self.sends()
    }
}

/// Broker client whose producers record into one shared [`BrokerState`].
#[derive(Default, Clone)]
pub struct MockBroker {
    pub state: Arc<BrokerState>,
}

impl MockBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_sends(&self) {
        self.state.fail_send.store(true, Ordering::SeqCst);
    }
}

impl BrokerClient for MockBroker {
    fn producer(&self, config: &ProducerConfig) -> Box<dyn BrokerProducer> {
        self.state.configs.lock().unwrap().push(config.clone());
        Box::new(MockProducer {
            state: Arc::clone(&self.state),
        })
    }
}

struct MockProducer {
    state: Arc<BrokerState>,
}

impl BrokerProducer for MockProducer {
    fn connect(&self) -> Pin<Box<dyn Future<Output = Result<(), BrokerError>> + Send + '_>> {
        Box::pin(async move {
            self.state.connects.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    fn disconnect(&self) -> Pin<Box<dyn Future<Output = Result<(), BrokerError>> + Send + '_>> {
        Box::pin(async move {
            self.state.disconnects.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    fn send(
        &self,
        batch: ProducerBatch,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<DeliveryAck>, BrokerError>> + Send + '_>> {
        Box::pin(async move {
            if self.state.fail_send.load(Ordering::SeqCst) {
                return Err(BrokerError::send("leader not available"));
            }
            let ack = DeliveryAck::new(batch.topic.clone(), 0)
                .with_offset(self.state.sends().to_string());
            self.state.batches.lock().unwrap().push(batch);
            Ok(vec![ack])
        })
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub const KEY_ID: SchemaId = 1;
pub const VALUE_ID: SchemaId = 2;

pub fn test_topic() -> TopicAvroSettings {
    TopicAvroSettings::new("test-topic", "test-key-subject", "test-value-subject")
}

pub fn test_registry() -> MockRegistry {
    MockRegistry::new()
        .with_latest("test-key-subject", KEY_ID)
        .with_latest("test-value-subject", VALUE_ID)
}

pub fn producer_with(
    registry: Arc<MockRegistry>,
    broker: &MockBroker,
    topics: Vec<TopicAvroSettings>,
) -> AvroProducer {
    AvroProducer::builder()
        .broker(Arc::new(broker.clone()))
        .registry(registry)
        .topics(topics)
        .build()
        .expect("producer builds")
}
