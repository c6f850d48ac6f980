use arbor_core::{Hierarchy, HierarchyOptions, NodeId, Point, build_hierarchy};
use arbor_layout::{Algorithm, Error, NodeSize, Separation, Tidy, TreeLayout, layout};
use serde_json::{Value, json};

fn find(h: &Hierarchy<'_>, name: &str) -> NodeId {
    h.iter()
        .find(|(_, n)| n.data().and_then(|d| d.get("name")).and_then(Value::as_str) == Some(name))
        .map(|(id, _)| id)
        .unwrap()
}

fn pos(h: &Hierarchy<'_>, name: &str) -> Point {
    h.node(find(h, name)).position().unwrap()
}

fn assert_close(actual: Point, x: f64, y: f64) {
    assert!(
        (actual.x - x).abs() < 1e-9 && (actual.y - y).abs() < 1e-9,
        "expected ({x}, {y}), got ({}, {})",
        actual.x,
        actual.y
    );
}

#[test]
fn small_tree_matches_hand_computed_positions() {
    let data = json!({
        "name": "root",
        "children": [
            {"name": "a", "children": [{"name": "a1"}, {"name": "a2"}]},
            {"name": "b"}
        ]
    });
    let mut h = build_hierarchy(&data, &HierarchyOptions::default()).unwrap();
    layout(&mut h, Algorithm::Tidy, NodeSize::new(10.0, 100.0)).unwrap();

    assert_close(pos(&h, "root"), 0.0, 0.0);
    assert_close(pos(&h, "a"), -5.0, 100.0);
    assert_close(pos(&h, "b"), 5.0, 100.0);
    assert_close(pos(&h, "a1"), -10.0, 200.0);
    assert_close(pos(&h, "a2"), 0.0, 200.0);
}

#[test]
fn cousins_are_two_units_apart() {
    let data = json!({
        "name": "root",
        "children": [
            {"name": "a", "children": [{"name": "a1"}]},
            {"name": "b", "children": [{"name": "b1"}]}
        ]
    });
    let mut h = build_hierarchy(&data, &HierarchyOptions::default()).unwrap();
    layout(&mut h, Algorithm::Tidy, NodeSize::new(10.0, 50.0)).unwrap();

    assert_close(pos(&h, "a1"), -10.0, 100.0);
    assert_close(pos(&h, "b1"), 10.0, 100.0);
    assert_close(pos(&h, "a"), -10.0, 50.0);
    assert_close(pos(&h, "b"), 10.0, 50.0);
}

fn wide_tree() -> Value {
    json!({
        "name": "r",
        "children": [
            {"name": "a", "children": [
                {"name": "a1", "children": [{"name": "a11"}, {"name": "a12"}, {"name": "a13"}]},
                {"name": "a2"}
            ]},
            {"name": "b"},
            {"name": "c", "children": [
                {"name": "c1"},
                {"name": "c2", "children": [{"name": "c21"}, {"name": "c22"}]},
                {"name": "c3"}
            ]},
            {"name": "d"}
        ]
    })
}

#[test]
fn layout_is_tidy() {
    let data = wide_tree();
    let mut h = build_hierarchy(&data, &HierarchyOptions::default()).unwrap();
    let dx = 10.0;
    let dy = 80.0;
    layout(&mut h, Algorithm::Tidy, NodeSize::new(dx, dy)).unwrap();

    assert!(h.is_laid_out());
    assert_eq!(h.node(h.root()).position().unwrap().x, 0.0);

    for (_, n) in h.iter() {
        let p = n.position().unwrap();
        assert!((p.y - n.depth() as f64 * dy).abs() < 1e-9);

        if n.has_children() {
            let first = h.node(n.children()[0]).position().unwrap();
            let last = h.node(*n.children().last().unwrap()).position().unwrap();
            assert!((p.x - (first.x + last.x) / 2.0).abs() < 1e-9);
        }
    }

    // No two nodes on the same level overlap, and level order follows sibling order.
    let mut by_depth: Vec<Vec<f64>> = vec![Vec::new(); h.height() + 1];
    for id in h.descendants() {
        let n = h.node(id);
        by_depth[n.depth()].push(n.position().unwrap().x);
    }
    for level in by_depth {
        for pair in level.windows(2) {
            assert!(pair[1] - pair[0] >= dx - 1e-9, "{level:?}");
        }
    }
}

#[test]
fn single_node_sits_at_origin() {
    let data = json!({"name": "only"});
    let mut h = build_hierarchy(&data, &HierarchyOptions::default()).unwrap();
    Tidy::default()
        .assign_coordinates(&mut h, NodeSize::new(10.0, 10.0))
        .unwrap();
    assert_close(pos(&h, "only"), 0.0, 0.0);
}

#[test]
fn custom_separation_widens_siblings() {
    let data = json!({"name": "r", "children": [{"name": "x"}, {"name": "y"}]});
    let mut h = build_hierarchy(&data, &HierarchyOptions::default()).unwrap();
    Tidy::with_separation(Separation::new(|_, _| 3.0))
        .assign_coordinates(&mut h, NodeSize::new(10.0, 10.0))
        .unwrap();
    assert_close(pos(&h, "x"), -15.0, 10.0);
    assert_close(pos(&h, "y"), 15.0, 10.0);
}

#[test]
fn uniform_separation_packs_cousins_like_siblings() {
    let data = json!({
        "name": "root",
        "children": [
            {"name": "a", "children": [{"name": "a1"}]},
            {"name": "b", "children": [{"name": "b1"}]}
        ]
    });
    let mut h = build_hierarchy(&data, &HierarchyOptions::default()).unwrap();
    Tidy::with_separation(Separation::uniform())
        .assign_coordinates(&mut h, NodeSize::new(10.0, 50.0))
        .unwrap();

    assert_close(pos(&h, "a1"), -5.0, 100.0);
    assert_close(pos(&h, "b1"), 5.0, 100.0);
    assert_close(pos(&h, "a"), -5.0, 50.0);
    assert_close(pos(&h, "b"), 5.0, 50.0);
}

#[test]
fn rejects_degenerate_node_size() {
    let data = json!({"name": "r"});
    let mut h = build_hierarchy(&data, &HierarchyOptions::default()).unwrap();
    for (dx, dy) in [(0.0, 1.0), (1.0, -2.0), (f64::NAN, 1.0), (1.0, f64::INFINITY)] {
        let err = layout(&mut h, Algorithm::Tidy, NodeSize::new(dx, dy)).unwrap_err();
        assert!(matches!(err, Error::InvalidNodeSize { .. }));
    }
    assert!(!h.is_laid_out());
}

#[test]
fn algorithm_names_parse() {
    assert_eq!("tidy".parse::<Algorithm>().unwrap(), Algorithm::Tidy);
    assert_eq!(" Cluster ".parse::<Algorithm>().unwrap(), Algorithm::Cluster);
    assert_eq!("dendrogram".parse::<Algorithm>().unwrap(), Algorithm::Cluster);
    assert!(matches!(
        "radial".parse::<Algorithm>(),
        Err(Error::UnknownAlgorithm { .. })
    ));
    assert_eq!(Algorithm::default().build().name(), "tidy");
}
