use arbor_core::{Hierarchy, HierarchyOptions, NodeId, Point, build_hierarchy};
use arbor_layout::{Algorithm, NodeSize, layout};
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

#[test]
fn leaves_share_the_deepest_level() {
    let data = json!({
        "name": "root",
        "children": [
            {"name": "a", "children": [{"name": "a1"}, {"name": "a2"}]},
            {"name": "b"}
        ]
    });
    let mut h = build_hierarchy(&data, &HierarchyOptions::default()).unwrap();
    layout(&mut h, Algorithm::Cluster, NodeSize::new(10.0, 100.0)).unwrap();

    assert_eq!(pos(&h, "root"), Point::new(0.0, 0.0));
    assert_eq!(pos(&h, "a"), Point::new(-12.5, 100.0));
    assert_eq!(pos(&h, "a1"), Point::new(-17.5, 200.0));
    assert_eq!(pos(&h, "a2"), Point::new(-7.5, 200.0));
    assert_eq!(pos(&h, "b"), Point::new(12.5, 200.0));
}

#[test]
fn parents_are_centred_on_their_children() {
    let data = json!({
        "name": "r",
        "children": [
            {"name": "x", "children": [{"name": "x1"}, {"name": "x2"}, {"name": "x3"}]},
            {"name": "y", "children": [{"name": "y1"}]}
        ]
    });
    let mut h = build_hierarchy(&data, &HierarchyOptions::default()).unwrap();
    layout(&mut h, Algorithm::Cluster, NodeSize::new(4.0, 4.0)).unwrap();

    for (_, n) in h.iter() {
        if n.has_children() {
            let mean = n
                .children()
                .iter()
                .map(|&c| h.node(c).position().unwrap().x)
                .sum::<f64>()
                / n.children().len() as f64;
            assert!((n.position().unwrap().x - mean).abs() < 1e-9);
        }
    }
    let leaves = h.leaves();
    assert_eq!(leaves.len(), 4);
    for id in leaves {
        assert_eq!(h.node(id).position().unwrap().y, 8.0);
    }
}
