//! In-process document store.
//!
//! Used when no database URL is configured, and as the substitute store in
//! tests. Documents live only as long as the process.

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde_json::Value;
use uuid::Uuid;

use super::{DocumentStore, ID_FIELD, RawDocument, StoreFilter};
use crate::error::ServiceResult;

/// Collections keyed by kind, each in insertion order
#[derive(Default)]
pub struct MemoryStore {
    name: Option<String>,
    collections: RwLock<BTreeMap<String, Vec<RawDocument>>>,
}

impl MemoryStore {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            collections: RwLock::new(BTreeMap::new()),
        }
    }
}

impl DocumentStore for MemoryStore {
    fn create_document(&self, kind: &str, mut payload: RawDocument) -> ServiceResult<String> {
        let id = Uuid::new_v4().to_string();
        payload.insert(ID_FIELD.to_string(), Value::String(id.clone()));

        let mut collections = self.collections.write().unwrap();
        collections
            .entry(kind.to_string())
            .or_default()
            .push(payload);

        Ok(id)
    }

    fn get_documents(
        &self,
        kind: &str,
        filter: &StoreFilter,
        limit: usize,
    ) -> ServiceResult<Vec<RawDocument>> {
        let collections = self.collections.read().unwrap();

        Ok(collections
            .get(kind)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| filter.matches(doc))
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn list_collections(&self) -> ServiceResult<Vec<String>> {
        let collections = self.collections.read().unwrap();
        Ok(collections.keys().cloned().collect())
    }

    fn is_persistent(&self) -> bool {
        false
    }
}
