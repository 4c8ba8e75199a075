mod diagnostics;

pub use diagnostics::Diagnostics;

use std::sync::Arc;
use tracing::{debug, info};

use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::recommend::{RECOMMEND_SAMPLE_SIZE, RecommendRequest, Recommender};
use crate::search::{build_filter, filter_by_query};
use crate::store::{DocumentStore, StoreFilter};
use crate::tools::{TOOL_KIND, Tool};

/// Smallest accepted `limit` for listing tools
pub const MIN_LIST_LIMIT: usize = 1;

/// Largest accepted `limit` for listing tools
pub const MAX_LIST_LIMIT: usize = 200;

/// `limit` used when the client does not send one
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Main service coordinator.
///
/// Owns the store handle created at startup; every handler goes through here.
pub struct ToolboxService {
    pub config: Arc<ServiceConfig>,
    store: Arc<dyn DocumentStore>,
    recommender: Recommender,
}

impl ToolboxService {
    pub fn new(store: Arc<dyn DocumentStore>, config: Arc<ServiceConfig>) -> Self {
        Self {
            config,
            store,
            recommender: Recommender::default(),
        }
    }

    /// Validate and persist a new tool, returning the store-assigned id
    pub fn create_tool(&self, tool: Tool) -> ServiceResult<String> {
        tool.validate().map_err(|e| ServiceError::Validation {
            message: e.to_string(),
        })?;

        let document = tool.to_document()?;
        let id = self.store.create_document(TOOL_KIND, document)?;

        info!(id = %id, name = %tool.name, "Created tool");
        Ok(id)
    }

    /// List tools matching the category/pricing filter, then narrow by free text.
    ///
    /// The store applies `limit` before the text query runs.
    pub fn list_tools(
        &self,
        query: Option<&str>,
        category: Option<&str>,
        pricing: Option<&str>,
        limit: usize,
    ) -> ServiceResult<Vec<Tool>> {
        if !(MIN_LIST_LIMIT..=MAX_LIST_LIMIT).contains(&limit) {
            return Err(ServiceError::Validation {
                message: format!(
                    "limit must be between {} and {}, got {}",
                    MIN_LIST_LIMIT, MAX_LIST_LIMIT, limit
                ),
            });
        }

        let filter = build_filter(category, pricing);
        let tools = self.fetch_tools(&filter, limit)?;
        let fetched = tools.len();

        let tools = filter_by_query(tools, query);
        debug!(fetched, matched = tools.len(), "Listed tools");

        Ok(tools)
    }

    /// Rank a sample of the catalog against a task description
    pub fn recommend(&self, request: &RecommendRequest) -> ServiceResult<Vec<Tool>> {
        let tools = self.fetch_tools(&StoreFilter::new(), RECOMMEND_SAMPLE_SIZE)?;
        let sampled = tools.len();

        let ranked = self.recommender.rank(tools, request);

        if let Some(top) = ranked.first() {
            debug!(
                sampled,
                top = %top.name,
                breakdown = ?self.recommender.breakdown(top, request),
                "Ranked recommendations"
            );
        }

        Ok(ranked)
    }

    /// Probe the store for the diagnostics endpoint. Never fails.
    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics::probe(self.store.as_ref(), &self.config)
    }

    fn fetch_tools(&self, filter: &StoreFilter, limit: usize) -> ServiceResult<Vec<Tool>> {
        self.store
            .get_documents(TOOL_KIND, filter, limit)?
            .into_iter()
            .map(|doc| Tool::from_document(doc).map_err(ServiceError::from))
            .collect()
    }
}
