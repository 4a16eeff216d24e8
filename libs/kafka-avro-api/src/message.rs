use std::collections::HashMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Per-message metadata: header name → raw bytes.
///
/// Well-known names live in [`HeaderName`](crate::headers::HeaderName), but any
/// string key is allowed.
pub type MessageHeaders = HashMap<String, Bytes>;

/// Application-level structured object. Encoded against the subject's schema
/// by the registry collaborator.
pub type MessagePayload = serde_json::Value;

/// One logical message before encoding.
///
/// `value = None` is a key-only message (tombstone on compacted topics).
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMessage {
    pub key: serde_json::Value,
    pub value: Option<MessagePayload>,
    pub headers: Option<MessageHeaders>,
}

impl OutgoingMessage {
    pub fn new(key: impl Into<serde_json::Value>, value: Option<MessagePayload>) -> Self {
        Self {
            key: key.into(),
            value,
            headers: None,
        }
    }

    /// Key-only message.
    pub fn tombstone(key: impl Into<serde_json::Value>) -> Self {
        Self::new(key, None)
    }

    pub fn with_headers(mut self, headers: MessageHeaders) -> Self {
        self.headers = Some(headers);
        self
    }
}

/// Encoded key/value/headers unit handed to the broker.
///
/// `headers` stays `None` when the caller supplied none; it is never replaced
/// by an empty map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEnvelope {
    pub key: Bytes,
    pub value: Option<Bytes>,
    pub headers: Option<MessageHeaders>,
}

/// Broker acknowledgement for one partition of a send.
///
/// Passed back to the caller exactly as the broker produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAck {
    pub topic_name: String,
    pub partition: i32,
    pub error_code: i16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_offset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_append_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_start_offset: Option<String>,
}

impl DeliveryAck {
    pub fn new(topic_name: impl Into<String>, partition: i32) -> Self {
        Self {
            topic_name: topic_name.into(),
            partition,
            error_code: 0,
            offset: None,
            timestamp: None,
            base_offset: None,
            log_append_time: None,
            log_start_offset: None,
        }
    }

    pub fn with_offset(mut self, offset: impl Into<String>) -> Self {
        self.offset = Some(offset.into());
        self
    }
}

/// Decoded `(key, payload)` pair. `payload` is `None` for key-only messages.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMessage {
    pub key: serde_json::Value,
    pub payload: Option<serde_json::Value>,
}

impl DecodedMessage {
    /// Project the structured values onto caller-chosen types.
    ///
    /// The registry decides the shape at runtime, so the caller picks `K`/`V`
    /// from the subject it consumed.
    pub fn decode_as<K, V>(&self) -> Result<(K, Option<V>), serde_json::Error>
    where
        K: serde::de::DeserializeOwned,
        V: serde::de::DeserializeOwned,
    {
        let key = K::deserialize(&self.key)?;
        let payload = match &self.payload {
            Some(p) => Some(V::deserialize(p)?),
            None => None,
        };
        Ok((key, payload))
    }

    pub fn into_parts(self) -> (serde_json::Value, Option<serde_json::Value>) {
        (self.key, self.payload)
    }
}
