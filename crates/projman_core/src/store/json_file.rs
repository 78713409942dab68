//! JSON document store for the project-manager forest.
//!
//! # Responsibility
//! - Decode `projects.json` (an array of `{name, rootDir?, child?}` objects)
//!   into the arena forest, minting runtime ids and parent links.
//! - Encode the sanitized forest back as pretty-printed 4-space JSON.
//!
//! # Invariants
//! - Runtime fields (id, parent link, sort index) never reach the document.
//! - `load(save(F))` reproduces the shape of `F`; ids are re-minted.
//! - An entry is a folder iff it carries `child`.

use crate::model::forest::Forest;
use crate::model::node::{NodeId, NodePayload};
use crate::store::{ForestStore, StoreError, StoreResult};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Wire shape of one persisted entry.
///
/// `child` presence decides folder-ness; a stray `rootDir` on a folder is
/// legal in documents written by older tools and is dropped on the next
/// save. Unknown fields (stale `id`, `parentId`, `index`) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawNode {
    #[serde(default)]
    name: String,
    #[serde(rename = "rootDir", default, skip_serializing_if = "Option::is_none")]
    root_dir: Option<String>,
    #[serde(rename = "child", default, skip_serializing_if = "Option::is_none")]
    child: Option<Vec<RawNode>>,
}

/// File-backed store over one `projects.json` document.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store over `path`. The file is created on first load.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Document location this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> StoreResult<String> {
        if !self.path.exists() {
            self.write_document(encode_pretty(&[])?)?;
            info!(
                "event=store_bootstrap module=store status=ok path={}",
                self.path.display()
            );
        }
        fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn write_document(&self, contents: Vec<u8>) -> StoreResult<()> {
        let tmp_path = sibling_tmp_path(&self.path);
        fs::write(&tmp_path, contents).map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl ForestStore for JsonFileStore {
    fn load(&self) -> StoreResult<Forest> {
        let text = self.read_document()?;
        let raw: Vec<RawNode> =
            serde_json::from_str(&text).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;

        let mut forest = Forest::new();
        assign_identities(&mut forest, None, raw);
        forest.normalize_ordering();
        info!(
            "event=store_load module=store status=ok path={} nodes={}",
            self.path.display(),
            forest.len()
        );
        Ok(forest)
    }

    fn save(&self, forest: &Forest) -> StoreResult<()> {
        let sanitized = sanitize(forest, None);
        self.write_document(encode_pretty(&sanitized)?)?;
        info!(
            "event=store_save module=store status=ok path={} nodes={}",
            self.path.display(),
            forest.len()
        );
        Ok(())
    }
}

/// Decorates one raw sibling list into the arena: mints an id per entry,
/// records the parent link, recurses into folders. Entries without a name
/// are dropped together with their subtrees.
fn assign_identities(forest: &mut Forest, parent: Option<NodeId>, raw: Vec<RawNode>) {
    for entry in raw {
        if entry.name.is_empty() {
            warn!("event=store_load module=store status=skip reason=unnamed_entry");
            continue;
        }
        match entry.child {
            Some(children) => {
                let id = forest.append_node(
                    parent,
                    entry.name,
                    NodePayload::Folder {
                        children: Vec::new(),
                    },
                );
                assign_identities(forest, Some(id), children);
            }
            None => {
                forest.append_node(
                    parent,
                    entry.name,
                    NodePayload::Project {
                        root_dir: entry.root_dir.unwrap_or_default(),
                    },
                );
            }
        }
    }
}

/// Builds the sanitized wire tree for one sibling list.
fn sanitize(forest: &Forest, parent: Option<NodeId>) -> Vec<RawNode> {
    forest
        .children(parent)
        .iter()
        .filter_map(|id| forest.node(*id))
        .map(|node| match &node.payload {
            NodePayload::Folder { .. } => RawNode {
                name: node.name.clone(),
                root_dir: None,
                child: Some(sanitize(forest, Some(node.id))),
            },
            NodePayload::Project { root_dir } => RawNode {
                name: node.name.clone(),
                root_dir: Some(root_dir.clone()),
                child: None,
            },
        })
        .collect()
}

fn encode_pretty(raw: &[RawNode]) -> StoreResult<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    raw.serialize(&mut serializer).map_err(StoreError::Encode)?;
    Ok(buf)
}

fn sibling_tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::{assign_identities, encode_pretty, sanitize, RawNode};
    use crate::model::forest::Forest;
    use crate::model::node::NodeKind;

    fn raw(text: &str) -> Vec<RawNode> {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn unnamed_entries_are_dropped_with_their_subtrees() {
        let mut forest = Forest::new();
        assign_identities(
            &mut forest,
            None,
            raw(r#"[{"name": "A", "child": []}, {"child": [{"name": "Lost"}]}, {"name": ""}]"#),
        );
        assert_eq!(forest.len(), 1);
        let root = forest.node(forest.roots()[0]).unwrap();
        assert_eq!(root.name, "A");
    }

    #[test]
    fn child_presence_wins_over_stray_root_dir() {
        let mut forest = Forest::new();
        assign_identities(
            &mut forest,
            None,
            raw(r#"[{"name": "SMB", "rootDir": "", "child": [{"name": "P", "rootDir": "/x"}]}]"#),
        );
        let root = forest.node(forest.roots()[0]).unwrap();
        assert_eq!(root.kind(), NodeKind::Folder);

        let sanitized = sanitize(&forest, None);
        assert!(sanitized[0].root_dir.is_none());
        assert_eq!(sanitized[0].child.as_ref().unwrap()[0].root_dir.as_deref(), Some("/x"));
    }

    #[test]
    fn stale_runtime_fields_are_ignored_on_load() {
        let mut forest = Forest::new();
        assign_identities(
            &mut forest,
            None,
            raw(r#"[{"name": "P", "rootDir": "/x", "id": "old", "parentId": "gone", "index": 1}]"#),
        );
        assert_eq!(forest.len(), 1);
    }

    #[test]
    fn pretty_output_uses_four_space_indent() {
        let encoded = encode_pretty(&raw(r#"[{"name": "P", "rootDir": "/x"}]"#)).unwrap();
        let text = String::from_utf8(encoded).unwrap();
        assert!(text.contains("\n    {"));
        assert!(text.contains("\n        \"name\": \"P\""));
    }
}
