//! Embeddable project-manager forest core.
//!
//! This crate is the single source of truth for tree invariants: stable
//! runtime ids, folders-before-projects sibling order, and a sanitized
//! JSON document on disk.

pub mod logging;
pub mod model;
pub mod projection;
pub mod search;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::forest::{Forest, ForestError, MoveOutcome};
pub use model::node::{Node, NodeId, NodeKind, NodePayload};
pub use projection::{breadcrumb, DisplayItem, ForestProjection, IconKind, BREADCRUMB_ROOT};
pub use search::{search_projects, ProjectHit, SearchError, SearchQuery, SearchResult};
pub use service::project_tree::{ProjectTreeService, RefreshEvent, RefreshScope, TreeError};
pub use store::json_file::JsonFileStore;
pub use store::{ForestStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
