use std::fmt;
use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use crate::error::RegistryError;

/// Registry-assigned id of one concrete schema version.
pub type SchemaId = u32;

/// Which version of a subject to resolve.
///
/// Only `Number(n)` with `n > 0` is a pinned version; `Latest` may point to a
/// different schema on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SchemaVersion {
    #[default]
    Latest,
    Number(u32),
}

impl SchemaVersion {
    /// The pinned version number, if this is one.
    pub fn pinned(&self) -> Option<u32> {
        match self {
            SchemaVersion::Number(n) if *n > 0 => Some(*n),
            _ => None,
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned().is_some()
    }
}

impl From<Option<u32>> for SchemaVersion {
    fn from(version: Option<u32>) -> Self {
        match version {
            Some(n) => SchemaVersion::Number(n),
            None => SchemaVersion::Latest,
        }
    }
}

impl From<u32> for SchemaVersion {
    fn from(version: u32) -> Self {
        SchemaVersion::Number(version)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaVersion::Latest => f.write_str("latest"),
            SchemaVersion::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Schema registry client.
///
/// The encoded bytes carry the schema id in their prefix, so `decode` needs
/// no side channel. The envelope layout belongs to the implementation.
pub trait SchemaRegistry: Send + Sync {
    /// Id of the current latest version of `subject`.
    fn latest_schema_id(
        &self,
        subject: &str,
    ) -> Pin<Box<dyn Future<Output = Result<SchemaId, RegistryError>> + Send + '_>>;

    /// Id of `subject` at a fixed `version`.
    fn schema_id(
        &self,
        subject: &str,
        version: u32,
    ) -> Pin<Box<dyn Future<Output = Result<SchemaId, RegistryError>> + Send + '_>>;

    /// Encode `value` against schema `id`.
    fn encode(
        &self,
        id: SchemaId,
        value: &serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<Bytes, RegistryError>> + Send + '_>>;

    /// Decode self-describing bytes into a structured value.
    fn decode(
        &self,
        data: &[u8],
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, RegistryError>> + Send + '_>>;
}
