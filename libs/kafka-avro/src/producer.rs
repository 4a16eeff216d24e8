use std::sync::Arc;

use serde::Serialize;

use kafka_avro_api::{
    BrokerClient, BrokerProducer, DeliveryAck, MessageEnvelope, MessageHeaders, OutgoingMessage,
    ProducerBatch, ProducerConfig, SchemaRegistry,
};

use crate::cache::{SchemaIdCache, SimpleSchemaIdCache};
use crate::codec::{envelope, MessageEncoder};
use crate::config::KafkaAvroConfig;
use crate::error::AvroError;
use crate::topic::{TopicAvroSettings, TopicSettingsTable};

/// Avro-aware producer: topic settings → schema ids → encoded envelopes →
/// one broker `send`.
///
/// The broker producer handle is created once, at build time, and shared by
/// every call. `connect` runs before each send (it is idempotent on the broker
/// side); `disconnect` is left to the caller except in
/// [`produce_single_message`](Self::produce_single_message).
pub struct AvroProducer {
    producer: Box<dyn BrokerProducer>,
    encoder: MessageEncoder,
    topics: TopicSettingsTable,
    config: ProducerConfig,
}

impl std::fmt::Debug for AvroProducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvroProducer")
            .field("topics", &self.topics)
            .field("config", &self.config)
            .finish()
    }
}

impl AvroProducer {
    pub fn builder() -> AvroProducerBuilder {
        AvroProducerBuilder::default()
    }

    /// Wire a producer from explicit parts. [`AvroProducer::builder`] fills in
    /// the defaults.
    pub fn new(
        broker: &dyn BrokerClient,
        registry: Arc<dyn SchemaRegistry>,
        topics: TopicSettingsTable,
        config: ProducerConfig,
        cache: Arc<dyn SchemaIdCache>,
    ) -> Self {
        let producer = broker.producer(&config);
        tracing::info!(
            topics = topics.len(),
            partitioner = ?config.partitioner,
            idempotent = config.idempotent,
            "avro producer created"
        );
        Self {
            producer,
            encoder: MessageEncoder::new(registry, cache),
            topics,
            config,
        }
    }

    /// Encode and send one message.
    ///
    /// Fails with [`AvroError::UnknownTopic`] before any registry or broker
    /// call when `topic_name` has no settings.
    pub async fn produce_message(
        &self,
        key: &serde_json::Value,
        payload: Option<&serde_json::Value>,
        topic_name: &str,
        headers: Option<MessageHeaders>,
    ) -> Result<Vec<DeliveryAck>, AvroError> {
        let settings = self.topics.lookup(topic_name)?;
        let (key, value) = self.encoder.encode_single(key, payload, settings).await?;

        self.producer.connect().await?;
        self.send(settings, vec![envelope(key, value, headers)]).await
    }

    /// Encode a batch and send it in a single broker call.
    pub async fn produce_messages(
        &self,
        topic_name: &str,
        messages: &[OutgoingMessage],
    ) -> Result<Vec<DeliveryAck>, AvroError> {
        let settings = self.topics.lookup(topic_name)?;
        let envelopes = self.encoder.encode_batch(messages, settings).await?;

        self.producer.connect().await?;
        self.send(settings, envelopes).await
    }

    /// [`produce_message`](Self::produce_message) followed by
    /// [`disconnect`](Self::disconnect), for call sites that are not
    /// long-lived producers.
    ///
    /// The disconnect runs even if the send failed; the send error is the one
    /// returned.
    pub async fn produce_single_message(
        &self,
        key: &serde_json::Value,
        payload: Option<&serde_json::Value>,
        topic_name: &str,
        headers: Option<MessageHeaders>,
    ) -> Result<Vec<DeliveryAck>, AvroError> {
        self.topics.lookup(topic_name)?;

        let result = self.produce_message(key, payload, topic_name, headers).await;
        let disconnected = self.disconnect().await;

        let acks = result?;
        disconnected?;
        Ok(acks)
    }

    /// Typed front for [`produce_message`](Self::produce_message).
    pub async fn produce_serialized<K, V>(
        &self,
        key: &K,
        payload: Option<&V>,
        topic_name: &str,
        headers: Option<MessageHeaders>,
    ) -> Result<Vec<DeliveryAck>, AvroError>
    where
        K: Serialize + ?Sized,
        V: Serialize + ?Sized,
    {
        self.topics.lookup(topic_name)?;

        let key = serde_json::to_value(key)?;
        let payload = payload.map(serde_json::to_value).transpose()?;
        self.produce_message(&key, payload.as_ref(), topic_name, headers)
            .await
    }

    /// Release the broker connection. Safe to call repeatedly.
    pub async fn disconnect(&self) -> Result<(), AvroError> {
        self.producer.disconnect().await?;
        tracing::info!("avro producer disconnected");
        Ok(())
    }

    pub fn settings(&self, topic_name: &str) -> Option<&TopicAvroSettings> {
        self.topics.get(topic_name)
    }

    /// Configured topic names, in configuration order.
    pub fn topics(&self) -> Vec<String> {
        self.topics.topic_names()
    }

    pub fn producer_config(&self) -> &ProducerConfig {
        &self.config
    }

    pub fn encoder(&self) -> &MessageEncoder {
        &self.encoder
    }

    async fn send(
        &self,
        settings: &TopicAvroSettings,
        messages: Vec<MessageEnvelope>,
    ) -> Result<Vec<DeliveryAck>, AvroError> {
        let count = messages.len();
        let batch = ProducerBatch {
            topic: settings.topic_name.clone(),
            compression: settings.effective_compression(),
            messages,
        };
        let compression = batch.compression;

        let acks = self.producer.send(batch).await?;
        tracing::debug!(
            topic = %settings.topic_name,
            %compression,
            messages = count,
            acks = acks.len(),
            "sent to broker"
        );
        Ok(acks)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for [`AvroProducer`].
///
/// Defaults: `ProducerConfig::default()` (deterministic partitioner,
/// idempotent delivery) and a [`SimpleSchemaIdCache`].
#[derive(Default)]
pub struct AvroProducerBuilder {
    broker: Option<Arc<dyn BrokerClient>>,
    registry: Option<Arc<dyn SchemaRegistry>>,
    topics: Vec<TopicAvroSettings>,
    config: Option<ProducerConfig>,
    cache: Option<Arc<dyn SchemaIdCache>>,
}

impl AvroProducerBuilder {
    pub fn broker(mut self, broker: Arc<dyn BrokerClient>) -> Self {
        self.broker = Some(broker);
        self
    }

    pub fn registry(mut self, registry: Arc<dyn SchemaRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn topic(mut self, settings: TopicAvroSettings) -> Self {
        self.topics.push(settings);
        self
    }

    pub fn topics(mut self, settings: impl IntoIterator<Item = TopicAvroSettings>) -> Self {
        self.topics.extend(settings);
        self
    }

    pub fn producer_config(mut self, config: ProducerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Substitute the schema id cache (no-op, shared, externally backed, ...).
    pub fn cache(mut self, cache: Arc<dyn SchemaIdCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Take producer settings and topics from a parsed configuration file.
    pub fn with_config(self, config: &KafkaAvroConfig) -> Self {
        self.producer_config(config.producer.clone())
            .topics(config.topics.iter().cloned())
    }

    pub fn build(self) -> Result<AvroProducer, AvroError> {
        let broker = self
            .broker
            .ok_or_else(|| AvroError::Config("avro producer: broker client is required".into()))?;
        let registry = self
            .registry
            .ok_or_else(|| AvroError::Config("avro producer: schema registry is required".into()))?;
        let topics = TopicSettingsTable::new(self.topics)?;
        let config = self.config.unwrap_or_default();
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(SimpleSchemaIdCache::new()));

        Ok(AvroProducer::new(
            broker.as_ref(),
            registry,
            topics,
            config,
            cache,
        ))
    }
}
