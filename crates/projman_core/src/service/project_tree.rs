//! Project tree use-case service.
//!
//! # Responsibility
//! - Validate names and drop targets above the forest primitives.
//! - Persist every applied mutation and notify subscribers with the
//!   affected parent slots.
//!
//! # Invariants
//! - A failed save leaves the in-memory forest unchanged.
//! - Lenient mutations (rename/remove/reparent on an absent id, rejected
//!   drops) write nothing and fire no event.
//! - Operations run to completion on the calling thread; there is no
//!   partial mutation to observe.

use crate::model::forest::{Forest, ForestError, MoveOutcome};
use crate::model::node::{NodeId, NodePayload};
use crate::store::{ForestStore, StoreError};
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Region of the tree a subscriber should redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshScope {
    /// The root-level sibling list changed, or everything did on reload.
    Root,
    /// The named folder's child list or a direct child's label changed.
    Node(NodeId),
}

impl RefreshScope {
    fn from_parent(parent: Option<NodeId>) -> Self {
        match parent {
            None => Self::Root,
            Some(id) => Self::Node(id),
        }
    }
}

/// Change notification fired after every applied mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshEvent {
    /// Parent slots whose child lists need redrawing, deduplicated.
    pub scopes: Vec<RefreshScope>,
}

/// Errors from project tree operations.
#[derive(Debug)]
pub enum TreeError {
    /// Display name is blank after trim.
    InvalidName,
    /// Requested parent does not exist.
    ParentNotFound(NodeId),
    /// Requested parent exists but is a project leaf.
    ParentMustBeFolder(NodeId),
    /// Persistence failure; the in-memory forest was left unchanged.
    Store(StoreError),
}

impl Display for TreeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "display name must not be blank"),
            Self::ParentNotFound(id) => write!(f, "parent node not found: {id}"),
            Self::ParentMustBeFolder(id) => write!(f, "parent node must be a folder: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TreeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ForestError> for TreeError {
    fn from(value: ForestError) -> Self {
        match value {
            ForestError::ParentNotFound(id) => Self::ParentNotFound(id),
            ForestError::ParentNotFolder(id) => Self::ParentMustBeFolder(id),
        }
    }
}

impl From<StoreError> for TreeError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Project-manager tree facade over one persisted document.
pub struct ProjectTreeService<S: ForestStore> {
    store: S,
    forest: Forest,
    subscribers: Vec<Sender<RefreshEvent>>,
}

impl<S: ForestStore> ProjectTreeService<S> {
    /// Loads the persisted forest and wraps it in a service.
    pub fn load(store: S) -> Result<Self, TreeError> {
        let forest = store.load()?;
        Ok(Self {
            store,
            forest,
            subscribers: Vec::new(),
        })
    }

    /// Current in-memory forest.
    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    /// Registers a refresh listener.
    ///
    /// Dropped receivers are pruned on the next notification.
    pub fn subscribe(&mut self) -> Receiver<RefreshEvent> {
        let (sender, receiver) = unbounded();
        self.subscribers.push(sender);
        receiver
    }

    /// Creates a folder under `parent` (`None` = root level).
    pub fn add_folder(
        &mut self,
        parent: Option<NodeId>,
        name: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        self.add_node(
            parent,
            name.into(),
            NodePayload::Folder {
                children: Vec::new(),
            },
        )
    }

    /// Creates a project leaf under `parent` (`None` = root level).
    pub fn add_project(
        &mut self,
        parent: Option<NodeId>,
        name: impl Into<String>,
        root_dir: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        self.add_node(
            parent,
            name.into(),
            NodePayload::Project {
                root_dir: root_dir.into(),
            },
        )
    }

    /// Renames a node. Absent ids are a silent no-op (`Ok(false)`).
    pub fn rename(&mut self, id: NodeId, name: impl Into<String>) -> Result<bool, TreeError> {
        let name = normalize_name(name.into())?;
        let parent = match self.forest.node(id) {
            None => {
                debug!("event=tree_rename module=service status=skip reason=not_found node={id}");
                return Ok(false);
            }
            Some(node) => node.parent,
        };
        let mut next = self.forest.clone();
        next.rename(id, name);
        self.commit(next, vec![RefreshScope::from_parent(parent)])?;
        info!("event=tree_rename module=service status=ok node={id}");
        Ok(true)
    }

    /// Deletes a subtree. Absent ids are a silent no-op (`Ok(false)`).
    ///
    /// Confirmation for destructive flows belongs to the caller and must
    /// happen before this is invoked.
    pub fn remove(&mut self, id: NodeId) -> Result<bool, TreeError> {
        let mut next = self.forest.clone();
        match next.remove_subtree(id) {
            None => {
                debug!("event=tree_remove module=service status=skip reason=not_found node={id}");
                Ok(false)
            }
            Some(old_parent) => {
                self.commit(next, vec![RefreshScope::from_parent(old_parent)])?;
                info!("event=tree_remove module=service status=ok node={id}");
                Ok(true)
            }
        }
    }

    /// Applies a drag-and-drop move of `ids` onto `target`.
    ///
    /// Returns `Ok(false)` without side effects when the drop is rejected:
    /// unknown ids, a project target, or a target inside the moved
    /// set/subtree.
    pub fn reparent(
        &mut self,
        ids: &[NodeId],
        target: Option<NodeId>,
    ) -> Result<bool, TreeError> {
        let mut next = self.forest.clone();
        match next.reparent(ids, target) {
            MoveOutcome::Skipped => {
                debug!("event=tree_move module=service status=skip reason=rejected_drop");
                Ok(false)
            }
            MoveOutcome::Moved { old_parents } => {
                let mut scopes: Vec<RefreshScope> = old_parents
                    .into_iter()
                    .map(RefreshScope::from_parent)
                    .collect();
                let new_scope = RefreshScope::from_parent(target);
                if !scopes.contains(&new_scope) {
                    scopes.push(new_scope);
                }
                self.commit(next, scopes)?;
                info!("event=tree_move module=service status=ok sources={}", ids.len());
                Ok(true)
            }
        }
    }

    /// Re-reads the persisted document, replacing the in-memory forest.
    pub fn reload(&mut self) -> Result<(), TreeError> {
        self.forest = self.store.load()?;
        self.notify(vec![RefreshScope::Root]);
        info!(
            "event=tree_reload module=service status=ok nodes={}",
            self.forest.len()
        );
        Ok(())
    }

    fn add_node(
        &mut self,
        parent: Option<NodeId>,
        name: String,
        payload: NodePayload,
    ) -> Result<NodeId, TreeError> {
        let name = normalize_name(name)?;
        let mut next = self.forest.clone();
        let id = next.insert(parent, name, payload)?;
        self.commit(next, vec![RefreshScope::from_parent(parent)])?;
        info!("event=tree_add module=service status=ok node={id}");
        Ok(id)
    }

    fn commit(&mut self, next: Forest, scopes: Vec<RefreshScope>) -> Result<(), TreeError> {
        self.store.save(&next)?;
        self.forest = next;
        self.notify(scopes);
        Ok(())
    }

    fn notify(&mut self, scopes: Vec<RefreshScope>) {
        let event = RefreshEvent { scopes };
        self.subscribers
            .retain(|sender| sender.send(event.clone()).is_ok());
    }
}

fn normalize_name(value: String) -> Result<String, TreeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TreeError::InvalidName);
    }
    Ok(trimmed.to_string())
}
