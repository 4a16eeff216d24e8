use kafka_avro_api::{BrokerError, RegistryError};

#[derive(Debug, thiserror::Error)]
pub enum AvroError {
    #[error("No avro settings for topic: {0}")]
    UnknownTopic(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Broker(#[from] BrokerError),

    #[error("invalid base64 in encoded {part}: {source}")]
    Base64 {
        part: &'static str,
        #[source]
        source: base64::DecodeError,
    },

    #[error("serialize: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl AvroError {
    /// Add context to the error.
    ///
    /// Collaborator errors get the context on their own message so their kind
    /// survives; config errors get it prepended. Other variants are returned
    /// unchanged.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            AvroError::Registry(e) => AvroError::Registry(e.with_context(ctx)),
            AvroError::Broker(e) => AvroError::Broker(e.with_context(ctx)),
            AvroError::Config(msg) => AvroError::Config(format!("{ctx}: {msg}")),
            other => other,
        }
    }

    /// True for the only failure this crate originates at produce time.
    pub fn is_unknown_topic(&self) -> bool {
        matches!(self, AvroError::UnknownTopic(_))
    }
}
