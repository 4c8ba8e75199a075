//! Store connectivity report for the `/test` endpoint.
//!
//! Probing never fails: problems end up as status strings in the report.

use serde::Serialize;
use tracing::warn;

use crate::config::ServiceConfig;
use crate::store::DocumentStore;

/// Maximum characters of an error message copied into the report
const MAX_ERROR_CHARS: usize = 50;

/// Maximum collection names listed
const MAX_COLLECTIONS: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

fn truncate_chars(message: &str, max: usize) -> String {
    message.chars().take(max).collect()
}

fn presence(configured: bool) -> String {
    let label = if configured { "✅ Set" } else { "❌ Not Set" };
    label.to_string()
}

impl Diagnostics {
    pub fn probe(store: &dyn DocumentStore, config: &ServiceConfig) -> Self {
        let mut report = Self {
            backend: "✅ Running".to_string(),
            database: "⚠️  Available but not initialized".to_string(),
            database_url: presence(config.database_url.is_some()),
            database_name: presence(config.database_name.is_some()),
            connection_status: "Not Connected".to_string(),
            collections: Vec::new(),
        };

        // A process-local store is not a database connection
        if !store.is_persistent() {
            return report;
        }

        report.connection_status = "Connected".to_string();
        report.database = match store.list_collections() {
            Ok(names) => {
                report.collections = names.into_iter().take(MAX_COLLECTIONS).collect();
                "✅ Connected & Working".to_string()
            }
            Err(e) => {
                warn!(error = %e, "Store diagnostics failed");
                format!(
                    "⚠️  Connected but Error: {}",
                    truncate_chars(&e.to_string(), MAX_ERROR_CHARS)
                )
            }
        };

        report
    }
}
