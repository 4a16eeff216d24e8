use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use kafka_avro_api::{Compression, SchemaVersion};

use crate::error::AvroError;

/// Avro subjects and schema versions used for one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicAvroSettings {
    pub topic_name: String,
    pub key_subject: String,
    pub payload_subject: String,
    /// Pinned key schema version; `None` resolves latest on every send.
    #[serde(default)]
    pub key_version: Option<u32>,
    /// Pinned payload schema version; `None` resolves latest on every send.
    #[serde(default)]
    pub payload_version: Option<u32>,
    #[serde(default)]
    pub compression: Option<Compression>,
}

impl TopicAvroSettings {
    pub fn new(
        topic_name: impl Into<String>,
        key_subject: impl Into<String>,
        payload_subject: impl Into<String>,
    ) -> Self {
        Self {
            topic_name: topic_name.into(),
            key_subject: key_subject.into(),
            payload_subject: payload_subject.into(),
            key_version: None,
            payload_version: None,
            compression: None,
        }
    }

    pub fn with_key_version(mut self, version: u32) -> Self {
        self.key_version = Some(version);
        self
    }

    pub fn with_payload_version(mut self, version: u32) -> Self {
        self.payload_version = Some(version);
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn key_schema_version(&self) -> SchemaVersion {
        self.key_version.into()
    }

    pub fn payload_schema_version(&self) -> SchemaVersion {
        self.payload_version.into()
    }

    /// Compression sent to the broker: the topic's own, else gzip.
    pub fn effective_compression(&self) -> Compression {
        self.compression.unwrap_or(Compression::DEFAULT)
    }
}

/// Immutable topic name → settings table, built once per producer.
#[derive(Debug, Clone, Default)]
pub struct TopicSettingsTable {
    settings: Vec<TopicAvroSettings>,
    index: HashMap<String, usize>,
}

impl TopicSettingsTable {
    /// Build the table. Topic names must be unique and pinned versions
    /// positive.
    pub fn new(settings: Vec<TopicAvroSettings>) -> Result<Self, AvroError> {
        let mut index = HashMap::with_capacity(settings.len());
        for (i, s) in settings.iter().enumerate() {
            if s.topic_name.is_empty() {
                return Err(AvroError::Config(format!("topic #{i}: empty topic_name")));
            }
            let versions = [("key_version", s.key_version), ("payload_version", s.payload_version)];
            for (field, version) in versions {
                if version == Some(0) {
                    return Err(AvroError::Config(format!(
                        "topic {}: {field} must be positive",
                        s.topic_name
                    )));
                }
            }
            if index.insert(s.topic_name.clone(), i).is_some() {
                return Err(AvroError::Config(format!(
                    "duplicate avro settings for topic: {}",
                    s.topic_name
                )));
            }
        }
        Ok(Self { settings, index })
    }

    /// Settings for `topic`, or [`AvroError::UnknownTopic`]. Never falls back
    /// to another topic.
    pub fn lookup(&self, topic: &str) -> Result<&TopicAvroSettings, AvroError> {
        self.get(topic)
            .ok_or_else(|| AvroError::UnknownTopic(topic.to_string()))
    }

    pub fn get(&self, topic: &str) -> Option<&TopicAvroSettings> {
        self.index.get(topic).map(|&i| &self.settings[i])
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.index.contains_key(topic)
    }

    /// Topic names in configuration order.
    pub fn topic_names(&self) -> Vec<String> {
        self.settings.iter().map(|s| s.topic_name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TopicAvroSettings> {
        self.settings.iter()
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}
