//! Catalog filtering.
//!
//! Two stages: [`build_filter`] turns `category`/`pricing` query values into a
//! store-level filter, and [`filter_by_query`] narrows the fetched tools by
//! free text.
//!
//! The text stage only sees what the store returned under `limit`, so a page
//! that is truncated before text filtering can undercount true matches.
//! Callers wanting more matches have to raise `limit`.

use crate::store::{FilterClause, StoreFilter};
use crate::tools::Tool;

/// Build the store filter for the list endpoint.
///
/// Empty strings count as absent.
pub fn build_filter(category: Option<&str>, pricing: Option<&str>) -> StoreFilter {
    let mut filter = StoreFilter::new();

    if let Some(category) = category.filter(|c| !c.is_empty()) {
        filter = filter.with(FilterClause::Contains {
            field: "categories",
            value: category.to_string(),
        });
    }

    if let Some(pricing) = pricing.filter(|p| !p.is_empty()) {
        filter = filter.with(FilterClause::Equals {
            field: "pricing",
            value: pricing.to_string(),
        });
    }

    filter
}

/// Case-insensitive substring match over name, description and tags.
///
/// `needle` must already be lower-cased.
fn matches_query(tool: &Tool, needle: &str) -> bool {
    tool.name.to_lowercase().contains(needle)
        || tool.description.to_lowercase().contains(needle)
        || tool
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

/// Keep only tools matching the free-text query, preserving order
pub fn filter_by_query(tools: Vec<Tool>, query: Option<&str>) -> Vec<Tool> {
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return tools;
    };

    let needle = query.to_lowercase();
    tools
        .into_iter()
        .filter(|tool| matches_query(tool, &needle))
        .collect()
}
