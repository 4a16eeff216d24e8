use std::fmt;

/// What a schema registry call was doing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryErrorKind {
    /// Subject/version could not be resolved to a schema id.
    Resolve,
    /// Value does not fit the schema.
    Encode,
    /// Bytes are not a valid payload for the embedded schema id.
    Decode,
    /// Transport to the registry failed.
    Io,
}

/// Error returned by every [`SchemaRegistry`](crate::registry::SchemaRegistry) method.
#[derive(Debug)]
pub struct RegistryError {
    pub kind: RegistryErrorKind,
    pub message: String,
}

impl RegistryError {
    pub fn resolve(msg: impl Into<String>) -> Self {
        Self { kind: RegistryErrorKind::Resolve, message: msg.into() }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self { kind: RegistryErrorKind::Encode, message: msg.into() }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self { kind: RegistryErrorKind::Decode, message: msg.into() }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { kind: RegistryErrorKind::Io, message: msg.into() }
    }

    /// Add context to the error, preserving the original kind.
    ///
    /// Produces: `"context: original message"`.
    pub fn with_context(self, ctx: impl fmt::Display) -> Self {
        Self {
            kind: self.kind,
            message: format!("{ctx}: {}", self.message),
        }
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "registry {:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for RegistryError {}

/// What a broker call was doing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerErrorKind {
    Connect,
    Send,
    Disconnect,
}

/// Error returned by every [`BrokerProducer`](crate::broker::BrokerProducer) method.
#[derive(Debug)]
pub struct BrokerError {
    pub kind: BrokerErrorKind,
    pub message: String,
}

impl BrokerError {
    pub fn connect(msg: impl Into<String>) -> Self {
        Self { kind: BrokerErrorKind::Connect, message: msg.into() }
    }

    pub fn send(msg: impl Into<String>) -> Self {
        Self { kind: BrokerErrorKind::Send, message: msg.into() }
    }

    pub fn disconnect(msg: impl Into<String>) -> Self {
        Self { kind: BrokerErrorKind::Disconnect, message: msg.into() }
    }

    pub fn with_context(self, ctx: impl fmt::Display) -> Self {
        Self {
            kind: self.kind,
            message: format!("{ctx}: {}", self.message),
        }
    }
}

impl fmt::Display for BrokerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "broker {:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for BrokerError {}
