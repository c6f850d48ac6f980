use arbor_core::{
    Accessor, ChildrenAccessor, Comparator, ErrorKind, Hierarchy, HierarchyOptions, NodeId, build_hierarchy,
};
use serde_json::{Value, json};

fn name(h: &Hierarchy<'_>, id: NodeId) -> String {
    h.node(id)
        .data()
        .and_then(|d| d.get("name"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn names(h: &Hierarchy<'_>, ids: &[NodeId]) -> Vec<String> {
    ids.iter().map(|&id| name(h, id)).collect()
}

fn sample() -> Value {
    json!({
        "name": "root",
        "children": [
            {"name": "c", "size": 3, "children": [{"name": "c2"}, {"name": "c1"}]},
            {"name": "a", "size": 1},
            {"name": "b", "size": 2, "children": [{"name": "b1"}]}
        ]
    })
}

#[test]
fn nested_hierarchy_has_single_root_and_reaches_every_node() {
    let data = sample();
    let h = build_hierarchy(&data, &HierarchyOptions::default()).unwrap();

    assert_eq!(h.len(), 7);
    let roots: Vec<_> = h.iter().filter(|(_, n)| n.parent().is_none()).collect();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].0, h.root());
    assert!(std::ptr::eq(h.node(h.root()).data().unwrap(), &data));

    for (id, _) in h.iter() {
        let chain = h.ancestors(id);
        assert_eq!(*chain.last().unwrap(), h.root());
        assert_eq!(chain.len(), h.node(id).depth() + 1);
    }
}

#[test]
fn nested_hierarchy_preserves_input_order() {
    let data = sample();
    let h = build_hierarchy(&data, &HierarchyOptions::default()).unwrap();
    assert_eq!(
        names(&h, &h.descendants()),
        vec!["root", "c", "a", "b", "c2", "c1", "b1"]
    );
    assert_eq!(
        names(&h, &h.each_before()),
        vec!["root", "c", "c2", "c1", "a", "b", "b1"]
    );
    assert_eq!(
        names(&h, &h.each_after()),
        vec!["c2", "c1", "c", "a", "b1", "b", "root"]
    );
    assert_eq!(names(&h, &h.leaves()), vec!["c2", "c1", "a", "b1"]);
}

#[test]
fn nested_hierarchy_computes_depth_and_height() {
    let data = sample();
    let h = build_hierarchy(&data, &HierarchyOptions::default()).unwrap();
    assert_eq!(h.height(), 2);
    for (_, n) in h.iter() {
        if n.is_leaf() {
            assert_eq!(n.height(), 0);
        }
    }
    let c = h.node(h.root()).children()[0];
    assert_eq!(h.node(c).height(), 1);
    assert_eq!(h.node(c).depth(), 1);
}

#[test]
fn links_pair_every_child_with_its_parent() {
    let data = sample();
    let h = build_hierarchy(&data, &HierarchyOptions::default()).unwrap();
    let links = h.links();
    assert_eq!(links.len(), h.len() - 1);
    for link in links {
        assert_eq!(h.node(link.target).parent(), Some(link.source));
    }
}

#[test]
fn custom_children_accessor_is_used() {
    let data = json!({"name": "r", "kids": [{"name": "x"}, {"name": "y"}]});
    let options = HierarchyOptions::default().children(ChildrenAccessor::field("kids"));
    let h = build_hierarchy(&data, &options).unwrap();
    assert_eq!(names(&h, &h.descendants()), vec!["r", "x", "y"]);

    let h = build_hierarchy(&data, &HierarchyOptions::default()).unwrap();
    assert_eq!(h.len(), 1);
}

#[test]
fn closure_children_accessor_can_borrow_from_the_record() {
    let data = json!({"name": "r", "left": {"name": "l"}, "right": {"name": "rr"}});
    let options = HierarchyOptions::default().children(ChildrenAccessor::new(|v| {
        ["left", "right"]
            .iter()
            .filter_map(|k| v.get(*k))
            .collect()
    }));
    let h = build_hierarchy(&data, &options).unwrap();
    assert_eq!(names(&h, &h.descendants()), vec!["r", "l", "rr"]);
}

#[test]
fn single_node_tree_is_valid() {
    let data = json!({"name": "alone"});
    let h = build_hierarchy(&data, &HierarchyOptions::default()).unwrap();
    assert_eq!(h.len(), 1);
    assert_eq!(h.height(), 0);
    assert!(h.links().is_empty());
    assert!(h.node(h.root()).is_leaf());
}

#[test]
fn nested_mode_rejects_arrays_and_null() {
    let err = build_hierarchy(&json!([{"name": "a"}]), &HierarchyOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    let err = build_hierarchy(&Value::Null, &HierarchyOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DegenerateInput);
}

fn assert_sorted_everywhere(h: &Hierarchy<'_>, cmp: &Comparator) {
    for (_, n) in h.iter() {
        for pair in n.children().windows(2) {
            assert_ne!(
                cmp.compare(h.node(pair[0]), h.node(pair[1])),
                std::cmp::Ordering::Greater
            );
        }
    }
}

#[test]
fn sort_orders_every_sibling_group() {
    let data = sample();
    let cmp = Comparator::by_field("name");
    let h = build_hierarchy(&data, &HierarchyOptions::default().sort(cmp.clone())).unwrap();
    assert_sorted_everywhere(&h, &cmp);
    assert_eq!(
        names(&h, &h.each_before()),
        vec!["root", "a", "b", "b1", "c", "c1", "c2"]
    );
}

#[test]
fn sort_is_stable_and_supports_composition() {
    let data = json!({
        "name": "root",
        "children": [
            {"name": "x", "rank": 2},
            {"name": "y", "rank": 1},
            {"name": "z", "rank": 2},
            {"name": "w"}
        ]
    });
    let cmp = Comparator::by_field("rank");
    let h = build_hierarchy(&data, &HierarchyOptions::default().sort(cmp)).unwrap();
    // Missing ranks sort last; equal ranks keep input order.
    assert_eq!(
        names(&h, h.node(h.root()).children()),
        vec!["y", "x", "z", "w"]
    );

    let cmp = Comparator::by_field("rank")
        .reverse()
        .then(Comparator::by_field("name").reverse());
    let h = build_hierarchy(&data, &HierarchyOptions::default().sort(cmp)).unwrap();
    assert_eq!(
        names(&h, h.node(h.root()).children()),
        vec!["w", "z", "x", "y"]
    );
}

#[test]
fn sort_by_height_descending() {
    let data = sample();
    let cmp = Comparator::by_height().reverse();
    let h = build_hierarchy(&data, &HierarchyOptions::default().sort(cmp)).unwrap();
    assert_eq!(
        names(&h, h.node(h.root()).children()),
        vec!["c", "b", "a"]
    );
}

#[test]
fn snapshot_lists_nodes_by_index() {
    let data = json!({"name": "r", "children": [{"name": "x"}]});
    let h = build_hierarchy(&data, &HierarchyOptions::default()).unwrap();
    let v = serde_json::to_value(h.snapshot()).unwrap();
    assert_eq!(v["root"], json!(0));
    let root = &v["nodes"][0];
    assert_eq!(root["depth"], json!(0));
    assert_eq!(root["height"], json!(1));
    assert_eq!(root["children"], json!([1]));
    assert!(root.get("parent").is_none());
    assert!(root.get("position").is_none());
    let child = &v["nodes"][1];
    assert_eq!(child["parent"], json!(0));
    assert_eq!(child["data"]["name"], json!("x"));
    assert!(child.get("children").is_none());
}

#[test]
fn snapshot_of_deep_chain_serializes() {
    let depth = 100_000usize;
    let rows: Vec<Value> = (0..depth)
        .map(|i| {
            if i == 0 {
                json!({"id": i})
            } else {
                json!({"id": i, "parentId": i - 1})
            }
        })
        .collect();
    let data = Value::Array(rows);
    let options = HierarchyOptions::default()
        .id_parent(Accessor::field("id"), Accessor::field("parentId"));
    let h = build_hierarchy(&data, &options).unwrap();
    assert_eq!(h.height(), depth - 1);

    let text = serde_json::to_string(&h.snapshot()).unwrap();
    let v: Value = serde_json::from_str(&text).unwrap();
    let nodes = v["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), depth);
    assert_eq!(nodes[depth - 1]["depth"], json!(depth - 1));
    assert_eq!(nodes[depth - 1]["id"], json!((depth - 1).to_string()));
}
