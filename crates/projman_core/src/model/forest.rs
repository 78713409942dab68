//! Arena-backed ordered forest and its mutation primitives.
//!
//! # Responsibility
//! - Own every node in an id-indexed arena with an explicit root list.
//! - Provide the structural mutations behind the project-manager commands:
//!   insert, remove-subtree, reparent-on-drop, rename.
//!
//! # Invariants
//! - Each live node id appears in exactly one sibling list (a folder's
//!   children or the root list).
//! - `Node::parent` always names the list owner, `None` for roots.
//! - Every sibling list is stably sorted folders-first after a mutation.

use crate::model::node::{Node, NodeId, NodeKind, NodePayload};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Errors from structural forest mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForestError {
    /// Requested parent id is not in the forest.
    ParentNotFound(NodeId),
    /// Requested parent exists but is a project leaf.
    ParentNotFolder(NodeId),
}

impl Display for ForestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParentNotFound(id) => write!(f, "parent node not found: {id}"),
            Self::ParentNotFolder(id) => write!(f, "parent node is not a folder: {id}"),
        }
    }
}

impl Error for ForestError {}

/// Result of a drop-style move request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Local roots were re-attached under the target.
    Moved {
        /// Former parent slots of the moved local roots, deduplicated.
        /// `None` entries mean the root list.
        old_parents: Vec<Option<NodeId>>,
    },
    /// Nothing movable, or the target cannot accept the drop. Tree untouched.
    Skipped,
}

/// Ordered forest of project-manager nodes.
///
/// Structure is owned by each parent's child list plus `roots`; the id map
/// exists for O(1) lookup. `Node::parent` is the derived back-reference.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    nodes: HashMap<NodeId, Node>,
    roots: Vec<NodeId>,
}

impl Forest {
    /// Creates an empty forest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes in the whole forest.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true when the forest holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root-level node ids in display order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Looks up one node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Returns true when `id` names a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Child ids under `parent` in display order; the root list for `None`.
    ///
    /// Projects and unknown ids have no children.
    pub fn children(&self, parent: Option<NodeId>) -> &[NodeId] {
        match parent {
            None => self.roots.as_slice(),
            Some(id) => self
                .nodes
                .get(&id)
                .and_then(Node::children)
                .unwrap_or(&[]),
        }
    }

    /// Walks parent links from `id` (exclusive) towards a root, nearest
    /// ancestor first.
    ///
    /// The visited guard keeps a corrupted parent chain from looping.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = self.nodes.get(&id).and_then(|node| node.parent);
        while let Some(current) = cursor {
            if !seen.insert(current) {
                break;
            }
            chain.push(current);
            cursor = self.nodes.get(&current).and_then(|node| node.parent);
        }
        chain
    }

    /// Inserts a new node at the end of the target sibling list, then
    /// re-sorts that list. Returns the minted id.
    pub fn insert(
        &mut self,
        parent: Option<NodeId>,
        name: impl Into<String>,
        payload: NodePayload,
    ) -> Result<NodeId, ForestError> {
        if let Some(parent_id) = parent {
            match self.nodes.get(&parent_id) {
                None => return Err(ForestError::ParentNotFound(parent_id)),
                Some(node) if node.kind() != NodeKind::Folder => {
                    return Err(ForestError::ParentNotFolder(parent_id));
                }
                Some(_) => {}
            }
        }

        let id = self.append_node(parent, name.into(), payload);
        self.sort_list(parent);
        Ok(id)
    }

    /// Renames a node in place. Returns `false` when `id` is absent.
    pub fn rename(&mut self, id: NodeId, name: impl Into<String>) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Detaches `id` and drops its whole subtree from the arena.
    ///
    /// Returns the former parent slot for refresh bookkeeping, or `None`
    /// when `id` was not present (callers treat that as a no-op).
    pub fn remove_subtree(&mut self, id: NodeId) -> Option<Option<NodeId>> {
        if !self.nodes.contains_key(&id) {
            return None;
        }
        let old_parent = self.detach(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                if let NodePayload::Folder { children } = node.payload {
                    stack.extend(children);
                }
            }
        }
        Some(old_parent)
    }

    /// Applies a drop of `ids` onto `target` (`None` = root list).
    ///
    /// Only local roots move: an id whose current parent is also in `ids`
    /// travels implicitly with its ancestor. The drop is skipped when the
    /// target is absent, is a project, is itself being moved, or sits inside
    /// a moved subtree.
    pub fn reparent(&mut self, ids: &[NodeId], target: Option<NodeId>) -> MoveOutcome {
        let moved: HashSet<NodeId> = ids
            .iter()
            .copied()
            .filter(|id| self.nodes.contains_key(id))
            .collect();
        if moved.is_empty() {
            return MoveOutcome::Skipped;
        }

        if let Some(target_id) = target {
            let accepts_drop = self
                .nodes
                .get(&target_id)
                .map(|node| node.kind() == NodeKind::Folder)
                .unwrap_or(false);
            if !accepts_drop || moved.contains(&target_id) {
                return MoveOutcome::Skipped;
            }
            if self
                .ancestors(target_id)
                .iter()
                .any(|ancestor| moved.contains(ancestor))
            {
                return MoveOutcome::Skipped;
            }
        }

        let mut local_roots = Vec::new();
        let mut picked = HashSet::new();
        for id in ids.iter().copied() {
            if !moved.contains(&id) || !picked.insert(id) {
                continue;
            }
            let parent_also_moved = self
                .nodes
                .get(&id)
                .and_then(|node| node.parent)
                .map(|parent| moved.contains(&parent))
                .unwrap_or(false);
            if !parent_also_moved {
                local_roots.push(id);
            }
        }
        if local_roots.is_empty() {
            return MoveOutcome::Skipped;
        }

        let mut old_parents = Vec::new();
        for id in &local_roots {
            let old_parent = self.detach(*id);
            if !old_parents.contains(&old_parent) {
                old_parents.push(old_parent);
            }
            if let Some(node) = self.nodes.get_mut(id) {
                node.parent = target;
            }
            self.push_into_list(target, *id);
        }
        self.sort_list(target);
        MoveOutcome::Moved { old_parents }
    }

    /// Re-sorts every sibling list folders-first, stable within kinds.
    pub fn normalize_ordering(&mut self) {
        let mut roots = std::mem::take(&mut self.roots);
        Self::sort_ids(&self.nodes, &mut roots);
        self.roots = roots;

        let folder_ids: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|node| node.kind() == NodeKind::Folder)
            .map(|node| node.id)
            .collect();
        for folder_id in folder_ids {
            self.sort_list(Some(folder_id));
        }
    }

    /// Appends an already-validated node without sorting. Loader-side
    /// primitive; the parent, when given, must be a folder in the arena.
    pub(crate) fn append_node(
        &mut self,
        parent: Option<NodeId>,
        name: String,
        payload: NodePayload,
    ) -> NodeId {
        let id = Uuid::new_v4();
        self.nodes.insert(
            id,
            Node {
                id,
                parent,
                name,
                payload,
            },
        );
        self.push_into_list(parent, id);
        id
    }

    fn detach(&mut self, id: NodeId) -> Option<NodeId> {
        let old_parent = self.nodes.get(&id).and_then(|node| node.parent);
        match old_parent {
            None => self.roots.retain(|root| *root != id),
            Some(parent_id) => {
                if let Some(Node {
                    payload: NodePayload::Folder { children },
                    ..
                }) = self.nodes.get_mut(&parent_id)
                {
                    children.retain(|child| *child != id);
                }
            }
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = None;
        }
        old_parent
    }

    fn push_into_list(&mut self, parent: Option<NodeId>, id: NodeId) {
        match parent {
            None => self.roots.push(id),
            Some(parent_id) => {
                if let Some(Node {
                    payload: NodePayload::Folder { children },
                    ..
                }) = self.nodes.get_mut(&parent_id)
                {
                    children.push(id);
                }
            }
        }
    }

    fn sort_list(&mut self, parent: Option<NodeId>) {
        match parent {
            None => {
                let mut roots = std::mem::take(&mut self.roots);
                Self::sort_ids(&self.nodes, &mut roots);
                self.roots = roots;
            }
            Some(parent_id) => {
                let mut list = match self.nodes.get_mut(&parent_id) {
                    Some(Node {
                        payload: NodePayload::Folder { children },
                        ..
                    }) => std::mem::take(children),
                    _ => return,
                };
                Self::sort_ids(&self.nodes, &mut list);
                if let Some(Node {
                    payload: NodePayload::Folder { children },
                    ..
                }) = self.nodes.get_mut(&parent_id)
                {
                    *children = list;
                }
            }
        }
    }

    fn sort_ids(nodes: &HashMap<NodeId, Node>, list: &mut [NodeId]) {
        list.sort_by_key(|id| {
            nodes
                .get(id)
                .map(|node| node.kind().sort_index())
                .unwrap_or(0)
        });
    }
}
