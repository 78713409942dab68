use projman_core::{search_projects, Forest, NodePayload, SearchError, SearchQuery};

fn folder() -> NodePayload {
    NodePayload::Folder {
        children: Vec::new(),
    }
}

fn project(root_dir: &str) -> NodePayload {
    NodePayload::Project {
        root_dir: root_dir.to_string(),
    }
}

fn sample() -> Forest {
    let mut forest = Forest::new();
    let clients = forest.insert(None, "Clients", folder()).unwrap();
    let acme = forest.insert(Some(clients), "Acme", folder()).unwrap();
    forest
        .insert(Some(acme), "gateway", project("/srv/gateway"))
        .unwrap();
    forest
        .insert(Some(clients), "billing", project("/srv/billing"))
        .unwrap();
    forest
        .insert(None, "scratch", project("/tmp/scratch"))
        .unwrap();
    forest
}

#[test]
fn blank_query_lists_every_project_in_display_order() {
    let forest = sample();
    let hits = search_projects(&forest, &SearchQuery::default()).unwrap();

    let names: Vec<&str> = hits.iter().map(|hit| hit.name.as_str()).collect();
    assert_eq!(names, vec!["gateway", "billing", "scratch"]);
    assert_eq!(hits[0].breadcrumb, "Project Manager/Clients/Acme/gateway");
    assert_eq!(hits[2].breadcrumb, "Project Manager/scratch");
}

#[test]
fn pattern_matches_name_and_root_dir_case_insensitively() {
    let forest = sample();

    let by_name = search_projects(
        &forest,
        &SearchQuery {
            pattern: Some("GATE".to_string()),
        },
    )
    .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].name, "gateway");

    let by_dir = search_projects(
        &forest,
        &SearchQuery {
            pattern: Some("srv".to_string()),
        },
    )
    .unwrap();
    let names: Vec<&str> = by_dir.iter().map(|hit| hit.name.as_str()).collect();
    assert_eq!(names, vec!["gateway", "billing"]);
}

#[test]
fn folder_names_never_produce_hits() {
    let forest = sample();
    let hits = search_projects(
        &forest,
        &SearchQuery {
            pattern: Some("Clients".to_string()),
        },
    )
    .unwrap();
    assert!(hits.is_empty());
}

#[test]
fn invalid_pattern_is_reported() {
    let forest = sample();
    let err = search_projects(
        &forest,
        &SearchQuery {
            pattern: Some("[".to_string()),
        },
    )
    .unwrap_err();
    assert!(matches!(err, SearchError::InvalidPattern { pattern, .. } if pattern == "["));
}
