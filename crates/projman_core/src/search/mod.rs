//! Project quick-pick search.
//!
//! # Responsibility
//! - Flatten every project leaf into hits with breadcrumb context.
//! - Filter by an optional case-insensitive pattern.
//!
//! # Invariants
//! - Hits come back in depth-first display order.
//! - Folders never appear as hits.

use crate::model::forest::Forest;
use crate::model::node::{NodeId, NodePayload};
use crate::projection::breadcrumb;
use regex::{Regex, RegexBuilder};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type for search APIs.
pub type SearchResult<T> = Result<T, SearchError>;

/// Search-layer error for query parsing.
#[derive(Debug)]
pub enum SearchError {
    /// User-provided pattern is not a valid regular expression.
    InvalidPattern { pattern: String, message: String },
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPattern { pattern, message } => {
                write!(f, "invalid search pattern `{pattern}`: {message}")
            }
        }
    }
}

impl Error for SearchError {}

/// Filter over the flattened project list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Case-insensitive regex matched against project name and root
    /// directory. `None` or blank matches every project.
    pub pattern: Option<String>,
}

/// One project leaf hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectHit {
    pub id: NodeId,
    pub name: String,
    pub root_dir: String,
    /// `/`-joined path from the fixed root, for pick details.
    pub breadcrumb: String,
}

/// Lists project leaves matching `query` in display order.
pub fn search_projects(forest: &Forest, query: &SearchQuery) -> SearchResult<Vec<ProjectHit>> {
    let matcher = compile(query)?;
    let mut hits = Vec::new();
    collect(forest, None, matcher.as_ref(), &mut hits);
    Ok(hits)
}

fn compile(query: &SearchQuery) -> SearchResult<Option<Regex>> {
    let pattern = match query.pattern.as_deref().map(str::trim) {
        None | Some("") => return Ok(None),
        Some(pattern) => pattern,
    };
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|err| SearchError::InvalidPattern {
            pattern: pattern.to_string(),
            message: err.to_string(),
        })
}

fn collect(
    forest: &Forest,
    parent: Option<NodeId>,
    matcher: Option<&Regex>,
    hits: &mut Vec<ProjectHit>,
) {
    for id in forest.children(parent) {
        if let Some(node) = forest.node(*id) {
            match &node.payload {
                NodePayload::Folder { .. } => collect(forest, Some(node.id), matcher, hits),
                NodePayload::Project { root_dir } => {
                    let matched = matcher
                        .map(|re| re.is_match(&node.name) || re.is_match(root_dir))
                        .unwrap_or(true);
                    if matched {
                        hits.push(ProjectHit {
                            id: node.id,
                            name: node.name.clone(),
                            root_dir: root_dir.clone(),
                            breadcrumb: breadcrumb(forest, node.id).unwrap_or_default(),
                        });
                    }
                }
            }
        }
    }
}
