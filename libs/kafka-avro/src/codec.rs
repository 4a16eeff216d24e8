use std::sync::Arc;

use bytes::Bytes;
use futures::future::try_join_all;

use kafka_avro_api::{
    MessageEnvelope, MessageHeaders, OutgoingMessage, SchemaId, SchemaRegistry, SchemaVersion,
};

use crate::cache::SchemaIdCache;
use crate::error::AvroError;
use crate::topic::TopicAvroSettings;

/// Key and payload schema ids of one topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaIds {
    pub key: SchemaId,
    pub payload: SchemaId,
}

/// Encode side of the codec: object → schema id → binary.
///
/// Independent registry calls (key vs payload id, key vs payload encode,
/// messages of a batch) are issued concurrently and joined before returning.
pub struct MessageEncoder {
    registry: Arc<dyn SchemaRegistry>,
    cache: Arc<dyn SchemaIdCache>,
}

impl MessageEncoder {
    pub fn new(registry: Arc<dyn SchemaRegistry>, cache: Arc<dyn SchemaIdCache>) -> Self {
        Self { registry, cache }
    }

    /// Resolve one subject's schema id, consulting the cache first.
    ///
    /// An explicit version is always resolved as that version, never as
    /// latest. A pinned-version miss populates the cache; `Latest` always asks
    /// the registry and is never cached.
    pub async fn resolve_schema_id(
        &self,
        subject: &str,
        version: SchemaVersion,
    ) -> Result<SchemaId, AvroError> {
        if let Some(id) = self.cache.get(subject, version) {
            tracing::debug!(subject, %version, id, "schema id cache hit");
            return Ok(id);
        }

        let id = match version {
            SchemaVersion::Number(v) => {
                let id = self.registry.schema_id(subject, v).await?;
                self.cache.set(subject, version, id);
                id
            }
            SchemaVersion::Latest => self.registry.latest_schema_id(subject).await?,
        };
        tracing::debug!(subject, %version, id, "schema id resolved by registry");
        Ok(id)
    }

    /// Resolve key and payload ids of a topic concurrently.
    pub async fn resolve_schema_ids(
        &self,
        settings: &TopicAvroSettings,
    ) -> Result<SchemaIds, AvroError> {
        let (key, payload) = tokio::try_join!(
            self.resolve_schema_id(&settings.key_subject, settings.key_schema_version()),
            self.resolve_schema_id(&settings.payload_subject, settings.payload_schema_version()),
        )?;
        Ok(SchemaIds { key, payload })
    }

    /// Encode one key/payload pair. A `None` payload is never sent to the
    /// registry and comes back as `None`.
    pub async fn encode_single(
        &self,
        key: &serde_json::Value,
        payload: Option<&serde_json::Value>,
        settings: &TopicAvroSettings,
    ) -> Result<(Bytes, Option<Bytes>), AvroError> {
        let ids = self.resolve_schema_ids(settings).await?;
        self.encode_pair(ids, key, payload).await
    }

    /// Encode a batch, resolving the topic's schema ids once for all messages.
    ///
    /// Output order matches input order. Each message keeps its own headers
    /// and its own `None` value.
    pub async fn encode_batch(
        &self,
        messages: &[OutgoingMessage],
        settings: &TopicAvroSettings,
    ) -> Result<Vec<MessageEnvelope>, AvroError> {
        let ids = self.resolve_schema_ids(settings).await?;

        let encoded = messages.iter().map(|message| async move {
            let (key, value) = self
                .encode_pair(ids, &message.key, message.value.as_ref())
                .await?;
            Ok::<_, AvroError>(envelope(key, value, message.headers.clone()))
        });
        let envelopes = try_join_all(encoded).await?;

        tracing::debug!(
            topic = %settings.topic_name,
            messages = envelopes.len(),
            tombstones = envelopes.iter().filter(|e| e.value.is_none()).count(),
            "encoded batch"
        );
        Ok(envelopes)
    }

    async fn encode_pair(
        &self,
        ids: SchemaIds,
        key: &serde_json::Value,
        payload: Option<&serde_json::Value>,
    ) -> Result<(Bytes, Option<Bytes>), AvroError> {
        match payload {
            None => {
                let key = self.registry.encode(ids.key, key).await?;
                Ok((key, None))
            }
            Some(payload) => {
                let (key, value) = tokio::try_join!(
                    self.registry.encode(ids.key, key),
                    self.registry.encode(ids.payload, payload),
                )?;
                Ok((key, Some(value)))
            }
        }
    }
}

/// Wrap encoded parts for the broker. `headers` is carried only when given.
pub fn envelope(key: Bytes, value: Option<Bytes>, headers: Option<MessageHeaders>) -> MessageEnvelope {
    MessageEnvelope { key, value, headers }
}
