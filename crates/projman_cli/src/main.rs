//! Command-line host for the project-manager core.
//!
//! # Responsibility
//! - Drive the tree service end-to-end against one `projects.json`.
//! - Own the user-facing confirmation flow for destructive commands.
//!
//! Nodes are addressed by `/`-joined name paths (`Clients/Acme/gateway`);
//! runtime ids are re-minted on every load and cannot cross invocations.

use clap::{Parser, Subcommand};
use projman_core::{
    default_log_level, init_logging, search_projects, Forest, JsonFileStore, NodeId, NodeKind,
    ProjectTreeService, SearchQuery,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "projman",
    about = "Project-manager tree over a projects.json document",
    version
)]
struct Cli {
    /// Path of the persisted project document.
    #[arg(long, default_value = "projects.json")]
    file: PathBuf,
    /// Absolute directory for rolling log files; logging stays off when unset.
    #[arg(long)]
    log_dir: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the whole tree.
    List,
    /// Create a folder.
    AddFolder {
        name: String,
        /// Parent folder path; root level when omitted.
        #[arg(long)]
        parent: Option<String>,
    },
    /// Create a project leaf carrying a root directory.
    AddProject {
        name: String,
        root_dir: String,
        /// Parent folder path; root level when omitted.
        #[arg(long)]
        parent: Option<String>,
    },
    /// Rename the node at PATH.
    Rename { path: String, new_name: String },
    /// Move nodes onto a destination folder (root level when omitted).
    Move {
        #[arg(required = true)]
        paths: Vec<String>,
        /// Destination folder path.
        #[arg(long)]
        dest: Option<String>,
    },
    /// Delete the subtree at PATH after confirmation.
    Remove {
        path: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// List projects matching an optional case-insensitive pattern.
    Search { pattern: Option<String> },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        if let Err(message) = init_logging(default_log_level(), log_dir) {
            eprintln!("warning: {message}");
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let store = JsonFileStore::new(&cli.file);
    let mut service = ProjectTreeService::load(store).map_err(|err| err.to_string())?;

    match cli.command {
        Command::List => {
            print_tree(service.forest(), None, 0);
            Ok(())
        }
        Command::AddFolder { name, parent } => {
            let parent = resolve_parent(service.forest(), parent.as_deref())?;
            service
                .add_folder(parent, name)
                .map_err(|err| err.to_string())?;
            Ok(())
        }
        Command::AddProject {
            name,
            root_dir,
            parent,
        } => {
            let parent = resolve_parent(service.forest(), parent.as_deref())?;
            service
                .add_project(parent, name, root_dir)
                .map_err(|err| err.to_string())?;
            Ok(())
        }
        Command::Rename { path, new_name } => {
            let id = resolve_path(service.forest(), &path)
                .ok_or_else(|| format!("no node at `{path}`"))?;
            service.rename(id, new_name).map_err(|err| err.to_string())?;
            Ok(())
        }
        Command::Move { paths, dest } => {
            let ids = paths
                .iter()
                .map(|path| {
                    resolve_path(service.forest(), path)
                        .ok_or_else(|| format!("no node at `{path}`"))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let target = resolve_parent(service.forest(), dest.as_deref())?;
            let applied = service
                .reparent(&ids, target)
                .map_err(|err| err.to_string())?;
            if !applied {
                eprintln!("move skipped: the destination cannot accept that drop");
            }
            Ok(())
        }
        Command::Remove { path, yes } => {
            let id = resolve_path(service.forest(), &path)
                .ok_or_else(|| format!("no node at `{path}`"))?;
            let (kind, name) = {
                let node = service
                    .forest()
                    .node(id)
                    .ok_or_else(|| format!("no node at `{path}`"))?;
                (node.kind(), node.name.clone())
            };
            if !yes && !confirm_delete(kind, &name)? {
                println!("aborted");
                return Ok(());
            }
            service.remove(id).map_err(|err| err.to_string())?;
            Ok(())
        }
        Command::Search { pattern } => {
            let hits = search_projects(service.forest(), &SearchQuery { pattern })
                .map_err(|err| err.to_string())?;
            for hit in hits {
                println!("{}  {}  ({})", hit.name, hit.root_dir, hit.breadcrumb);
            }
            Ok(())
        }
    }
}

/// Resolves a `/`-joined name path to a node id. First match wins among
/// same-named siblings.
fn resolve_path(forest: &Forest, path: &str) -> Option<NodeId> {
    let mut cursor: Option<NodeId> = None;
    for segment in path.split('/').filter(|segment| !segment.is_empty()) {
        let next = forest.children(cursor).iter().copied().find(|id| {
            forest
                .node(*id)
                .map(|node| node.name == segment)
                .unwrap_or(false)
        })?;
        cursor = Some(next);
    }
    cursor
}

fn resolve_parent(forest: &Forest, path: Option<&str>) -> Result<Option<NodeId>, String> {
    match path {
        None => Ok(None),
        Some(path) => resolve_path(forest, path)
            .map(Some)
            .ok_or_else(|| format!("no folder at `{path}`")),
    }
}

fn confirm_delete(kind: NodeKind, name: &str) -> Result<bool, String> {
    let noun = match kind {
        NodeKind::Folder => "folder",
        NodeKind::Project => "project",
    };
    print!("Delete {noun} \"{name}\"? [y/N] ");
    io::stdout().flush().map_err(|err| err.to_string())?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|err| err.to_string())?;
    let answer = line.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn print_tree(forest: &Forest, parent: Option<NodeId>, depth: usize) {
    let indent = "  ".repeat(depth);
    for id in forest.children(parent) {
        if let Some(node) = forest.node(*id) {
            match node.root_dir() {
                None => println!("{indent}{}/", node.name),
                Some(root_dir) => println!("{indent}{}  ({root_dir})", node.name),
            }
            print_tree(forest, Some(node.id), depth + 1);
        }
    }
}
