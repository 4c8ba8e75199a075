//! Tool record model.
//!
//! A [`Tool`] is the only entity in the catalog. Stores hand back loosely
//! typed JSON documents; [`Tool::from_document`] is the single place where
//! those are turned into typed records.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ToolError;
use crate::store::{ID_FIELD, RawDocument};

/// Document kind (collection name) under which tools are stored
pub const TOOL_KIND: &str = "tool";

/// A cataloged AI tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub categories: Vec<String>,
    /// Pricing tier, e.g. "free", "freemium", "paid", "open-source"
    pub pricing: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub use_cases: Vec<String>,
}

impl Tool {
    /// Rebuild a tool from a stored document, dropping the store-assigned id.
    pub fn from_document(mut doc: RawDocument) -> Result<Self, ToolError> {
        doc.remove(ID_FIELD);

        let tool: Tool = serde_json::from_value(serde_json::Value::Object(doc))
            .map_err(ToolError::Malformed)?;
        tool.validate()?;

        Ok(tool)
    }

    /// Convert into the document shape handed to a store
    pub fn to_document(&self) -> Result<RawDocument, ToolError> {
        match serde_json::to_value(self).map_err(ToolError::Malformed)? {
            serde_json::Value::Object(map) => Ok(map),
            _ => Err(ToolError::NotAnObject),
        }
    }

    /// Field checks serde cannot express
    pub fn validate(&self) -> Result<(), ToolError> {
        if self.name.is_empty() {
            return Err(ToolError::EmptyName);
        }
        Ok(())
    }
}

/// Treat an explicit `null` the same as a missing sequence
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
