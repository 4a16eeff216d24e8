//! Schema-aware produce/decode layer over a message broker.
//!
//! Topic name → Avro subjects → schema ids (cached for pinned versions) →
//! encoded envelopes → a single broker `send`. Decoding goes the other way
//! using the schema id embedded in each payload.

pub mod cache;
pub mod codec;
pub mod config;
pub mod decoder;
pub mod error;
pub mod producer;
pub mod topic;

pub use cache::{NoopSchemaIdCache, SchemaIdCache, SimpleSchemaIdCache};
pub use codec::{envelope, MessageEncoder, SchemaIds};
pub use config::KafkaAvroConfig;
pub use decoder::AvroDecoder;
pub use error::AvroError;
pub use producer::{AvroProducer, AvroProducerBuilder};
pub use topic::{TopicAvroSettings, TopicSettingsTable};

pub use kafka_avro_api::{
    header_value, header_value_in, Action, BrokerClient, BrokerError, BrokerProducer, Compression,
    DecodedMessage, DeliveryAck, HeaderName, MessageEnvelope, MessageHeaders, MessagePayload,
    OutgoingMessage, Partitioner, ProducerBatch, ProducerConfig, RegistryError, SchemaId,
    SchemaRegistry, SchemaVersion,
};
