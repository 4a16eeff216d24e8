use serde::Deserialize;

use kafka_avro_api::ProducerConfig;

use crate::error::AvroError;
use crate::topic::{TopicAvroSettings, TopicSettingsTable};

/// Root configuration, parsed from TOML.
///
/// ```toml
/// [producer]
/// partitioner = "default"
/// idempotent = true
///
/// [[topics]]
/// topic_name = "orders"
/// key_subject = "orders-key"
/// payload_subject = "orders-value"
/// payload_version = 3
/// compression = "zstd"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct KafkaAvroConfig {
    /// Broker producer settings. Missing section → `ProducerConfig::default()`.
    #[serde(default)]
    pub producer: ProducerConfig,

    /// Per-topic Avro settings.
    #[serde(default)]
    pub topics: Vec<TopicAvroSettings>,
}

impl KafkaAvroConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, AvroError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| AvroError::Config(format!("{path}: {e}")))?;
        Self::parse(&content).map_err(|e| e.with_context(path))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, AvroError> {
        toml::from_str(toml_str).map_err(|e| AvroError::Config(e.to_string()))
    }

    /// Validate topic settings into a lookup table.
    pub fn topic_table(&self) -> Result<TopicSettingsTable, AvroError> {
        TopicSettingsTable::new(self.topics.clone())
    }
}
