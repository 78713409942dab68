use projman_core::{Forest, ForestStore, JsonFileStore, NodeId, ProjectTreeService, StoreError};
use std::fs;
use tempfile::TempDir;

fn render(forest: &Forest) -> Vec<String> {
    fn walk(forest: &Forest, parent: Option<NodeId>, depth: usize, out: &mut Vec<String>) {
        for id in forest.children(parent) {
            let node = forest.node(*id).unwrap();
            match node.root_dir() {
                None => out.push(format!("{depth}:folder:{}", node.name)),
                Some(root_dir) => {
                    out.push(format!("{depth}:project:{}:{root_dir}", node.name));
                }
            }
            walk(forest, Some(node.id), depth + 1, out);
        }
    }
    let mut out = Vec::new();
    walk(forest, None, 0, &mut out);
    out
}

#[test]
fn load_missing_file_bootstraps_empty_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("projects.json");
    let store = JsonFileStore::new(&path);

    let forest = store.load().unwrap();
    assert!(forest.is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
}

#[test]
fn save_then_load_preserves_shape_with_fresh_ids() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("projects.json");

    let mut service = ProjectTreeService::load(JsonFileStore::new(&path)).unwrap();
    let smb = service.add_folder(None, "SMB").unwrap();
    let smb2 = service.add_folder(Some(smb), "SMB2").unwrap();
    service
        .add_project(Some(smb2), "SMB3", "/d/Project/SMB/gateway")
        .unwrap();
    service.add_project(None, "awal", "").unwrap();
    let before = render(service.forest());

    let reloaded = JsonFileStore::new(&path).load().unwrap();
    assert_eq!(render(&reloaded), before);
    assert_eq!(reloaded.len(), service.forest().len());
    // Runtime ids are re-minted on load; only the shape survives.
    assert!(!reloaded.contains(smb));
}

#[test]
fn legacy_runtime_fields_are_dropped_on_next_save() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("projects.json");
    fs::write(
        &path,
        r#"[
    {"name": "zeta", "rootDir": "/z", "id": "stale-id", "index": 1},
    {"name": "alpha", "rootDir": "", "child": [
        {"name": ""},
        {"name": "inner", "rootDir": "/i", "parentId": "stale-parent"}
    ]}
]"#,
    )
    .unwrap();

    let store = JsonFileStore::new(&path);
    let forest = store.load().unwrap();
    // The unnamed entry is dropped; the folder with a stray rootDir stays a
    // folder; root order is normalized folders-first.
    assert_eq!(
        render(&forest),
        vec![
            "0:folder:alpha".to_string(),
            "1:project:inner:/i".to_string(),
            "0:project:zeta:/z".to_string(),
        ]
    );

    store.save(&forest).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(!text.contains("\"id\""));
    assert!(!text.contains("\"parentId\""));
    assert!(!text.contains("\"index\""));
    assert!(!text.contains("\"rootDir\": \"\""));
    assert!(text.contains("\n    {"));
}

#[test]
fn empty_root_dir_round_trips_for_projects() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("projects.json");

    let mut service = ProjectTreeService::load(JsonFileStore::new(&path)).unwrap();
    service.add_project(None, "blank", "").unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"rootDir\": \"\""));

    let reloaded = JsonFileStore::new(&path).load().unwrap();
    let root = reloaded.node(reloaded.roots()[0]).unwrap();
    assert_eq!(root.root_dir(), Some(""));
}

#[test]
fn unreadable_document_surfaces_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("projects.json");
    fs::write(&path, "not a json array").unwrap();

    let err = JsonFileStore::new(&path).load().unwrap_err();
    assert!(matches!(err, StoreError::Parse { .. }));
}
