//! Project-manager node model.
//!
//! # Responsibility
//! - Define the canonical node shape shared by mutation, persistence and
//!   projection layers.
//! - Keep folder/project discrimination explicit instead of inferred from
//!   field presence.
//!
//! # Invariants
//! - `id` is stable for a node's runtime lifetime and never reused.
//! - `parent` mirrors exactly one owning sibling list at all times.
//! - A node never changes kind after creation.

use uuid::Uuid;

/// Stable identifier for every node in the forest.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NodeId = Uuid;

/// Node category used for icons, collapse state and sibling ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Grouping node that owns an ordered child list.
    Folder,
    /// Leaf node carrying a project root directory.
    Project,
}

impl NodeKind {
    /// Sibling sort key: folders list before projects at the same level.
    pub fn sort_index(self) -> u8 {
        match self {
            Self::Folder => 0,
            Self::Project => 1,
        }
    }
}

/// Kind-specific node data.
///
/// An explicit tagged union: an empty folder and a project leaf are distinct
/// variants, not a field-presence convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodePayload {
    /// Ordered child ids, owned by this folder.
    Folder { children: Vec<NodeId> },
    /// Project root directory as entered by the user. May be empty.
    Project { root_dir: String },
}

/// One node of the project-manager forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Runtime id, re-minted on every document load.
    pub id: NodeId,
    /// Owning node id. `None` means root-level node.
    pub parent: Option<NodeId>,
    /// User-facing label. Non-blank, enforced on create and rename.
    pub name: String,
    /// Folder/project specific data.
    pub payload: NodePayload,
}

impl Node {
    /// Returns the node category.
    pub fn kind(&self) -> NodeKind {
        match self.payload {
            NodePayload::Folder { .. } => NodeKind::Folder,
            NodePayload::Project { .. } => NodeKind::Project,
        }
    }

    /// Returns the child id list for folders, `None` for projects.
    pub fn children(&self) -> Option<&[NodeId]> {
        match &self.payload {
            NodePayload::Folder { children } => Some(children),
            NodePayload::Project { .. } => None,
        }
    }

    /// Returns the project root directory, `None` for folders.
    pub fn root_dir(&self) -> Option<&str> {
        match &self.payload {
            NodePayload::Folder { .. } => None,
            NodePayload::Project { root_dir } => Some(root_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Node, NodeKind, NodePayload};
    use uuid::Uuid;

    #[test]
    fn folders_sort_before_projects() {
        assert!(NodeKind::Folder.sort_index() < NodeKind::Project.sort_index());
    }

    #[test]
    fn kind_follows_payload_variant() {
        let folder = Node {
            id: Uuid::new_v4(),
            parent: None,
            name: "Clients".to_string(),
            payload: NodePayload::Folder {
                children: Vec::new(),
            },
        };
        assert_eq!(folder.kind(), NodeKind::Folder);
        assert_eq!(folder.children(), Some(&[][..]));
        assert_eq!(folder.root_dir(), None);

        let project = Node {
            id: Uuid::new_v4(),
            parent: None,
            name: "Gateway".to_string(),
            payload: NodePayload::Project {
                root_dir: "/srv/gateway".to_string(),
            },
        };
        assert_eq!(project.kind(), NodeKind::Project);
        assert_eq!(project.children(), None);
        assert_eq!(project.root_dir(), Some("/srv/gateway"));
    }
}
