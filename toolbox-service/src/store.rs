//! Document store gateway.
//!
//! Handlers never talk to a concrete database. They go through the
//! [`DocumentStore`] trait, which is implemented by the SQLite-backed
//! [`crate::db::Database`] and by the in-process [`MemoryStore`].

mod memory;

pub use memory::MemoryStore;

use serde_json::Value;

use crate::error::ServiceResult;

/// Field under which a store exposes the identifier it assigned
pub const ID_FIELD: &str = "_id";

/// A loosely typed stored document
pub type RawDocument = serde_json::Map<String, Value>;

/// One condition of a store-level filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterClause {
    /// The sequence field contains `value` (exact, case-sensitive)
    Contains { field: &'static str, value: String },
    /// The string field equals `value` exactly
    Equals { field: &'static str, value: String },
}

impl FilterClause {
    pub fn field(&self) -> &'static str {
        match self {
            FilterClause::Contains { field, .. } | FilterClause::Equals { field, .. } => field,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            FilterClause::Contains { value, .. } | FilterClause::Equals { value, .. } => value,
        }
    }

    /// Evaluate the clause against a document held in memory
    pub fn matches(&self, doc: &RawDocument) -> bool {
        match self {
            FilterClause::Contains { field, value } => {
                doc.get(*field).and_then(Value::as_array).is_some_and(|items| {
                    items
                        .iter()
                        .any(|item| item.as_str() == Some(value.as_str()))
                })
            }
            FilterClause::Equals { field, value } => {
                doc.get(*field).and_then(Value::as_str) == Some(value.as_str())
            }
        }
    }
}

/// Conjunction of [`FilterClause`]s. The empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreFilter {
    clauses: Vec<FilterClause>,
}

impl StoreFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, clause: FilterClause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn matches(&self, doc: &RawDocument) -> bool {
        self.clauses.iter().all(|clause| clause.matches(doc))
    }
}

/// Gateway to the external document store.
///
/// Calls are synchronous round-trips; implementations do their own locking.
pub trait DocumentStore: Send + Sync {
    /// Persist `payload` under `kind` and return the identifier the store assigned.
    fn create_document(&self, kind: &str, payload: RawDocument) -> ServiceResult<String>;

    /// Fetch up to `limit` documents of `kind` matching `filter`, in insertion
    /// order. Every returned document carries its identifier under [`ID_FIELD`].
    fn get_documents(
        &self,
        kind: &str,
        filter: &StoreFilter,
        limit: usize,
    ) -> ServiceResult<Vec<RawDocument>>;

    /// Logical database name, when the store has one
    fn name(&self) -> Option<&str>;

    /// Names of all collections (document kinds) currently holding documents
    fn list_collections(&self) -> ServiceResult<Vec<String>>;

    /// Whether documents outlive the process
    fn is_persistent(&self) -> bool {
        true
    }
}
