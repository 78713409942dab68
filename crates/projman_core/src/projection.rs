//! Host tree-view projection of the forest.
//!
//! # Responsibility
//! - Serve the tree-view callback contract: children, parent, display item.
//! - Build labels, tooltips and collapse state on demand; hold no state.
//!
//! # Invariants
//! - Children are served in the forest's display order.
//! - Only folders are collapsible.

use crate::model::forest::Forest;
use crate::model::node::{Node, NodeId, NodeKind};

/// Breadcrumb prefix shown as the tree root in tooltips and search details.
pub const BREADCRUMB_ROOT: &str = "Project Manager";

/// Icon family a host should render for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    Folder,
    Project,
}

/// Render-ready view of one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub id: NodeId,
    /// Upper-cased display name.
    pub label: String,
    /// Breadcrumb from the fixed root to this node, `/`-joined.
    pub tooltip: String,
    /// True iff the node is a folder.
    pub collapsible: bool,
    pub icon: IconKind,
}

/// Read-only adapter between one forest snapshot and a tree-view host.
pub struct ForestProjection<'a> {
    forest: &'a Forest,
}

impl<'a> ForestProjection<'a> {
    pub fn new(forest: &'a Forest) -> Self {
        Self { forest }
    }

    /// `getChildren`: roots for `None`, ordered children otherwise.
    pub fn children(&self, parent: Option<NodeId>) -> Vec<&'a Node> {
        self.forest
            .children(parent)
            .iter()
            .filter_map(|id| self.forest.node(*id))
            .collect()
    }

    /// `getParent`: the owning node, `None` for roots and unknown ids.
    pub fn parent(&self, id: NodeId) -> Option<&'a Node> {
        let parent_id = self.forest.node(id)?.parent?;
        self.forest.node(parent_id)
    }

    /// `getTreeItem`: display data for one node.
    pub fn item(&self, id: NodeId) -> Option<DisplayItem> {
        let node = self.forest.node(id)?;
        let is_folder = node.kind() == NodeKind::Folder;
        Some(DisplayItem {
            id: node.id,
            label: node.name.to_uppercase(),
            tooltip: breadcrumb(self.forest, id)?,
            collapsible: is_folder,
            icon: if is_folder {
                IconKind::Folder
            } else {
                IconKind::Project
            },
        })
    }
}

/// Path from the fixed root to `id`, names joined with `/`.
///
/// `None` when `id` is not in the forest.
pub fn breadcrumb(forest: &Forest, id: NodeId) -> Option<String> {
    let node = forest.node(id)?;
    let mut segments = vec![BREADCRUMB_ROOT.to_string()];
    for ancestor_id in forest.ancestors(id).iter().rev() {
        if let Some(ancestor) = forest.node(*ancestor_id) {
            segments.push(ancestor.name.clone());
        }
    }
    segments.push(node.name.clone());
    Some(segments.join("/"))
}
