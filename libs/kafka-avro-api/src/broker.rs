use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::BrokerError;
use crate::message::{DeliveryAck, MessageEnvelope};

/// Broker-side compression codec. Numeric codes follow the broker protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    None,
    Gzip,
    Snappy,
    Lz4,
    Zstd,
}

impl Compression {
    /// Codec used when a topic does not choose one.
    pub const DEFAULT: Compression = Compression::Gzip;

    pub fn code(&self) -> u8 {
        match self {
            Compression::None => 0,
            Compression::Gzip => 1,
            Compression::Snappy => 2,
            Compression::Lz4 => 3,
            Compression::Zstd => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Compression::None),
            1 => Some(Compression::Gzip),
            2 => Some(Compression::Snappy),
            3 => Some(Compression::Lz4),
            4 => Some(Compression::Zstd),
            _ => None,
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Compression::None => "none",
            Compression::Gzip => "gzip",
            Compression::Snappy => "snappy",
            Compression::Lz4 => "lz4",
            Compression::Zstd => "zstd",
        };
        f.write_str(name)
    }
}

/// Partition selection strategy of the broker producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partitioner {
    /// Deterministic murmur2 key hashing.
    #[default]
    Default,
    /// Hashing compatible with older client releases.
    Legacy,
    RoundRobin,
}

/// Settings handed to the broker client when the producer handle is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducerConfig {
    #[serde(default)]
    pub partitioner: Partitioner,

    /// Idempotent delivery. Together with a deterministic partitioner this is
    /// what gives retries without duplicates.
    #[serde(default = "default_idempotent")]
    pub idempotent: bool,

    #[serde(default)]
    pub max_in_flight_requests: Option<u32>,

    #[serde(default)]
    pub transactional_id: Option<String>,
}

fn default_idempotent() -> bool {
    true
}

impl Default for ProducerConfig {
    /// Deterministic partitioner with idempotent delivery.
    fn default() -> Self {
        Self {
            partitioner: Partitioner::Default,
            idempotent: true,
            max_in_flight_requests: None,
            transactional_id: None,
        }
    }
}

/// One `send` call: every message goes to `topic` in a single request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProducerBatch {
    pub topic: String,
    pub compression: Compression,
    pub messages: Vec<MessageEnvelope>,
}

/// Broker connection handle owned by a producer.
///
/// `connect` and `disconnect` must both be idempotent.
pub trait BrokerProducer: Send + Sync {
    fn connect(&self) -> Pin<Box<dyn Future<Output = Result<(), BrokerError>> + Send + '_>>;

    fn disconnect(&self) -> Pin<Box<dyn Future<Output = Result<(), BrokerError>> + Send + '_>>;

    /// Send a batch atomically; returns per-partition acknowledgements.
    fn send(
        &self,
        batch: ProducerBatch,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<DeliveryAck>, BrokerError>> + Send + '_>>;
}

/// Broker client: factory for producer handles.
pub trait BrokerClient: Send + Sync {
    fn producer(&self, config: &ProducerConfig) -> Box<dyn BrokerProducer>;
}
