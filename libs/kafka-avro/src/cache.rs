use std::collections::HashMap;
use std::sync::RwLock;

use kafka_avro_api::{SchemaId, SchemaVersion};

/// Subject + version → schema id lookup.
///
/// Only pinned versions are ever stored: for `Latest` (or version 0) `set` is a
/// no-op and `get`/`has` report absent, because the registry's notion of
/// latest can move between calls.
pub trait SchemaIdCache: Send + Sync {
    fn set(&self, subject: &str, version: SchemaVersion, id: SchemaId);
    fn get(&self, subject: &str, version: SchemaVersion) -> Option<SchemaId>;
    fn has(&self, subject: &str, version: SchemaVersion) -> bool;
}

type SubjectIds = HashMap<String, HashMap<u32, SchemaId>>;

/// Process-local cache. Purely additive: a pinned subject version maps to the
/// same id for the lifetime of the process, so there is no eviction and
/// concurrent writers racing on one key write the same value.
///
/// Keyed subject first so lookups borrow the subject instead of allocating.
#[derive(Debug, Default)]
pub struct SimpleSchemaIdCache {
    ids: RwLock<SubjectIds>,
}

impl SimpleSchemaIdCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.read().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SubjectIds> {
        match self.ids.read() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("schema id cache read lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}

impl SchemaIdCache for SimpleSchemaIdCache {
    fn set(&self, subject: &str, version: SchemaVersion, id: SchemaId) {
        let Some(version) = version.pinned() else {
            return;
        };
        let mut guard = match self.ids.write() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("schema id cache write lock was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        match guard.get_mut(subject) {
            Some(versions) => {
                versions.insert(version, id);
            }
            None => {
                guard.insert(subject.to_string(), HashMap::from([(version, id)]));
            }
        }
    }

    fn get(&self, subject: &str, version: SchemaVersion) -> Option<SchemaId> {
        let version = version.pinned()?;
        self.read().get(subject)?.get(&version).copied()
    }

    fn has(&self, subject: &str, version: SchemaVersion) -> bool {
        self.get(subject, version).is_some()
    }
}

/// Cache that never stores anything: every lookup goes to the registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSchemaIdCache;

impl SchemaIdCache for NoopSchemaIdCache {
    fn set(&self, _subject: &str, _version: SchemaVersion, _id: SchemaId) {}

    fn get(&self, _subject: &str, _version: SchemaVersion) -> Option<SchemaId> {
        None
    }

    fn has(&self, _subject: &str, _version: SchemaVersion) -> bool {
        false
    }
}
