//! Tool recommendation.
//!
//! Tools are ranked against a free-text task with an ordered list of
//! [`ScoringRule`]s. Each rule contributes a signed amount to a tool's score;
//! the total decides the ranking. Ties keep the order the store returned.

use std::collections::BTreeSet;

use crate::tools::Tool;

/// How many tools are pulled from the store before ranking
pub const RECOMMEND_SAMPLE_SIZE: usize = 200;

/// How many ranked tools are returned
pub const MAX_RECOMMENDATIONS: usize = 10;

/// Task words this short or shorter are ignored
const MIN_TOKEN_CHARS: usize = 2;

/// Inputs for a recommendation
#[derive(Debug, Clone, Default)]
pub struct RecommendRequest {
    pub task: String,
    pub categories: Vec<String>,
    pub budget: Option<String>,
}

/// What a rule looks at and how much it is worth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// `weight` for every distinct task word found anywhere in the tool's text
    KeywordOverlap { weight: i64 },
    /// `boost` if any requested category matches (case-insensitive), else `-penalty`.
    /// Inactive when no categories were requested.
    CategoryMatch { boost: i64, penalty: i64 },
    /// `weight` if the budget equals the tool's pricing exactly.
    /// Inactive when no budget was given.
    BudgetMatch { weight: i64 },
}

/// A named, weighted scoring rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringRule {
    pub name: &'static str,
    pub kind: RuleKind,
}

/// A request normalized once, then applied to every tool
struct PreparedRequest<'a> {
    tokens: BTreeSet<String>,
    categories: Vec<String>,
    budget: Option<&'a str>,
}

impl<'a> PreparedRequest<'a> {
    fn new(request: &'a RecommendRequest) -> Self {
        let tokens = request
            .task
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let categories = request
            .categories
            .iter()
            .map(|c| c.to_lowercase())
            .collect();

        Self {
            tokens,
            categories,
            budget: request.budget.as_deref().filter(|b| !b.is_empty()),
        }
    }
}

/// Lower-cased text a task is matched against
fn haystack(tool: &Tool) -> String {
    format!(
        "{} {} {} {}",
        tool.name,
        tool.description,
        tool.tags.join(" "),
        tool.use_cases.join(" ")
    )
    .to_lowercase()
}

impl ScoringRule {
    fn contribution(&self, tool: &Tool, haystack: &str, request: &PreparedRequest<'_>) -> i64 {
        match self.kind {
            RuleKind::KeywordOverlap { weight } => {
                let hits = request
                    .tokens
                    .iter()
                    .filter(|word| word.chars().count() > MIN_TOKEN_CHARS)
                    .filter(|word| haystack.contains(word.as_str()))
                    .count();
                weight * hits as i64
            }
            RuleKind::CategoryMatch { boost, penalty } => {
                if request.categories.is_empty() {
                    return 0;
                }
                let matched = tool.categories.iter().any(|category| {
                    let category = category.to_lowercase();
                    request.categories.iter().any(|wanted| *wanted == category)
                });
                if matched { boost } else { -penalty }
            }
            RuleKind::BudgetMatch { weight } => match request.budget {
                Some(budget) if budget == tool.pricing => weight,
                _ => 0,
            },
        }
    }
}

/// Ranks tools with an ordered rule set
#[derive(Debug, Clone)]
pub struct Recommender {
    rules: Vec<ScoringRule>,
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new(vec![
            ScoringRule {
                name: "keyword_overlap",
                kind: RuleKind::KeywordOverlap { weight: 2 },
            },
            ScoringRule {
                name: "category_match",
                kind: RuleKind::CategoryMatch {
                    boost: 3,
                    penalty: 1,
                },
            },
            ScoringRule {
                name: "budget_match",
                kind: RuleKind::BudgetMatch { weight: 2 },
            },
        ])
    }
}

impl Recommender {
    pub fn new(rules: Vec<ScoringRule>) -> Self {
        Self { rules }
    }

    /// Per-rule contributions for one tool, in rule order
    pub fn breakdown(&self, tool: &Tool, request: &RecommendRequest) -> Vec<(&'static str, i64)> {
        let prepared = PreparedRequest::new(request);
        let haystack = haystack(tool);
        self.rules
            .iter()
            .map(|rule| (rule.name, rule.contribution(tool, &haystack, &prepared)))
            .collect()
    }

    fn total(&self, tool: &Tool, prepared: &PreparedRequest<'_>) -> i64 {
        let haystack = haystack(tool);
        self.rules
            .iter()
            .map(|rule| rule.contribution(tool, &haystack, prepared))
            .sum()
    }

    /// Rank `tools` by score, highest first, and keep the best
    /// [`MAX_RECOMMENDATIONS`]. Negative scores are not filtered out.
    pub fn rank(&self, tools: Vec<Tool>, request: &RecommendRequest) -> Vec<Tool> {
        let prepared = PreparedRequest::new(request);

        let mut scored: Vec<(i64, Tool)> = tools
            .into_iter()
            .map(|tool| (self.total(&tool, &prepared), tool))
            .collect();

        // Stable: equal scores keep fetch order
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        scored
            .into_iter()
            .take(MAX_RECOMMENDATIONS)
            .map(|(_, tool)| tool)
            .collect()
    }
}
