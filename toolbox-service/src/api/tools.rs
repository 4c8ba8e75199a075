//! Tool API endpoints.
//!
//! Handlers for creating, listing and recommending tools.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ServiceError;
use crate::recommend::RecommendRequest;
use crate::service::DEFAULT_LIST_LIMIT;
use crate::tools::Tool;

use super::AppState;

/// List tools query parameters
#[derive(Deserialize)]
pub struct ListToolsParams {
    /// Free text matched against name, description and tags
    pub q: Option<String>,
    pub category: Option<String>,
    pub pricing: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIST_LIMIT
}

/// Recommendation query parameters. `categories` may repeat.
#[derive(Deserialize)]
pub struct RecommendParams {
    pub task: String,
    #[serde(default)]
    pub categories: Vec<String>,
    pub budget: Option<String>,
}

/// Response for tool creation
#[derive(Serialize)]
pub struct CreateToolResponse {
    pub id: String,
}

/// Add a tool to the catalog
pub async fn create_tool_handler(
    State(state): State<Arc<AppState>>,
    Json(tool): Json<Tool>,
) -> Result<Json<CreateToolResponse>, ServiceError> {
    let id = state.service.create_tool(tool)?;
    Ok(Json(CreateToolResponse { id }))
}

/// List tools, optionally filtered by category, pricing and free text
pub async fn list_tools_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListToolsParams>,
) -> Result<Json<Vec<Tool>>, ServiceError> {
    let tools = state.service.list_tools(
        params.q.as_deref(),
        params.category.as_deref(),
        params.pricing.as_deref(),
        params.limit,
    )?;
    Ok(Json(tools))
}

/// Recommend up to ten tools for a task
pub async fn recommend_handler(
    State(state): State<Arc<AppState>>,
    axum_extra::extract::Query(params): axum_extra::extract::Query<RecommendParams>,
) -> Result<Json<Vec<Tool>>, ServiceError> {
    let request = RecommendRequest {
        task: params.task,
        categories: params.categories,
        budget: params.budget,
    };
    let tools = state.service.recommend(&request)?;
    Ok(Json(tools))
}
