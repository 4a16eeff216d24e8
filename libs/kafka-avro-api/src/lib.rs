pub mod broker;
pub mod error;
pub mod headers;
pub mod message;
pub mod registry;

pub use broker::{BrokerClient, BrokerProducer, Compression, Partitioner, ProducerBatch, ProducerConfig};
pub use error::{BrokerError, BrokerErrorKind, RegistryError, RegistryErrorKind};
pub use headers::{header_value, header_value_in, Action, HeaderName};
pub use message::{
    DecodedMessage, DeliveryAck, MessageEnvelope, MessageHeaders, MessagePayload, OutgoingMessage,
};
pub use registry::{SchemaId, SchemaRegistry, SchemaVersion};
