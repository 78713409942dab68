//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate forest mutations into persisted, observable operations.
//! - Keep host and CLI layers decoupled from storage and eventing details.

pub mod project_tree;
