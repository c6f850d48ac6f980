use arbor_core::{Accessor, Error, HierarchyOptions, NodeAccessor, build_hierarchy};
use serde_json::json;

fn by_path() -> HierarchyOptions {
    HierarchyOptions::default().path(Accessor::field("path"))
}

#[test]
fn path_mode_links_rows_by_prefix() {
    let data = json!([
        {"path": "/root"},
        {"path": "/root/a"},
        {"path": "/root/b"},
        {"path": "/root/a/x"}
    ]);
    let h = build_hierarchy(&data, &by_path()).unwrap();

    // The imputed `/` has a single child and is collapsed away.
    assert_eq!(h.len(), 4);
    assert_eq!(h.node(h.root()).id(), Some("/root"));
    assert!(h.node(h.root()).data().is_some());
    let children: Vec<_> = h
        .node(h.root())
        .children()
        .iter()
        .map(|&c| h.node(c).id().unwrap())
        .collect();
    assert_eq!(children, vec!["/root/a", "/root/b"]);
    assert_eq!(h.height(), 2);
}

#[test]
fn path_mode_imputes_missing_ancestors() {
    let data = json!([
        {"path": "org/eng/web"},
        {"path": "org/eng/infra"},
        {"path": "org/sales"}
    ]);
    let h = build_hierarchy(&data, &by_path()).unwrap();

    // `/org` and `/org/eng` are imputed; `/` collapses into `/org`.
    assert_eq!(h.len(), 5);
    let root = h.node(h.root());
    assert_eq!(root.id(), Some("/org"));
    assert!(root.data().is_none());

    let label = NodeAccessor::basename();
    let mut names: Vec<String> = h
        .descendants()
        .into_iter()
        .filter_map(|n| label.get(h.node(n)))
        .collect();
    names.sort();
    assert_eq!(names, vec!["eng", "infra", "org", "sales", "web"]);
}

#[test]
fn path_mode_keeps_imputed_root_with_several_children() {
    let data = json!([
        {"path": "a"},
        {"path": "b"}
    ]);
    let h = build_hierarchy(&data, &by_path()).unwrap();
    assert_eq!(h.len(), 3);
    assert_eq!(h.node(h.root()).id(), Some("/"));
    assert!(h.node(h.root()).data().is_none());
}

#[test]
fn path_mode_without_imputation_reports_missing_parent() {
    let data = json!([
        {"path": "/a"},
        {"path": "/a/b/c"}
    ]);
    let err = build_hierarchy(&data, &by_path().impute_missing(false)).unwrap_err();
    match err {
        Error::MissingParent { parent_id, .. } => assert_eq!(parent_id, "/"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn path_mode_without_imputation_accepts_complete_paths() {
    let data = json!([
        {"path": "/"},
        {"path": "/a"},
        {"path": "/a/b"}
    ]);
    let h = build_hierarchy(&data, &by_path().impute_missing(false)).unwrap();
    assert_eq!(h.len(), 3);
    assert_eq!(h.node(h.root()).id(), Some("/"));
}

#[test]
fn path_mode_rejects_rows_without_path() {
    let data = json!([{"path": "/a"}, {"name": "x"}]);
    let err = build_hierarchy(&data, &by_path()).unwrap_err();
    assert!(matches!(err, Error::UnaddressableRow { row: 1, .. }), "{err}");
}

#[test]
fn path_mode_takes_precedence_over_id_parent() {
    let data = json!([
        {"path": "/r", "id": "x"},
        {"path": "/r/c", "id": "y", "parentId": "missing"}
    ]);
    let options = by_path().id_parent(Accessor::field("id"), Accessor::field("parentId"));
    let h = build_hierarchy(&data, &options).unwrap();
    assert_eq!(h.node(h.root()).id(), Some("/r"));
    assert_eq!(h.len(), 2);
}
