use super::*;
use std::collections::HashSet;

fn reference_layers() -> Vec<LayerSpec> {
    vec![
        LayerSpec::new("1", 1000),
        LayerSpec::new("2", 2),
        LayerSpec::new("3", 4),
        LayerSpec::new("4", 1),
    ]
}

#[test]
fn test_reference_layers_produce_19000_nodes() {
    let layers = reference_layers();
    let tree = generate_tree(&layers);

    assert_eq!(tree.len(), 1000);
    assert_eq!(flatten(&tree).len(), 19000);
    assert_eq!(node_count(&layers), 19000);
}

#[test]
fn test_ids_are_non_empty_and_unique() {
    let tree = generate_tree(&reference_layers());
    let nodes = flatten(&tree);

    let mut seen = HashSet::with_capacity(nodes.len());
    for node in &nodes {
        assert!(node.elem_id().is_ok(), "invalid id {:?}", node.id);
        assert!(seen.insert(node.id.as_str()), "duplicate id {}", node.id);
    }
}

#[test]
fn test_names_encode_layer_and_position() {
    let layers = vec![LayerSpec::new("A", 2), LayerSpec::new("B", 3)];
    let tree = generate_tree(&layers);

    assert_eq!(tree[0].name, "Layer A - Node 1");
    assert_eq!(tree[1].name, "Layer A - Node 2");

    let child_names: Vec<_> = tree[1].children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        child_names,
        ["Layer B - Node 1", "Layer B - Node 2", "Layer B - Node 3"]
    );
}

#[test]
fn test_last_layer_has_no_children() {
    let tree = generate_tree(&[LayerSpec::new("1", 2), LayerSpec::new("2", 1)]);

    for root in &tree {
        assert_eq!(root.children.len(), 1);
        assert!(root.children[0].children.is_empty());
    }
}

#[test]
fn test_flatten_is_pre_order() {
    let tree = generate_tree(&[LayerSpec::new("1", 2), LayerSpec::new("2", 2)]);
    let names: Vec<_> = flatten(&tree).iter().map(|e| e.name.as_str()).collect();

    assert_eq!(
        names,
        [
            "Layer 1 - Node 1",
            "Layer 2 - Node 1",
            "Layer 2 - Node 2",
            "Layer 1 - Node 2",
            "Layer 2 - Node 1",
            "Layer 2 - Node 2",
        ]
    );
}

#[test]
fn test_empty_layers_produce_empty_tree() {
    assert!(generate_tree(&[]).is_empty());
    assert_eq!(node_count(&[]), 0);
}

#[test]
fn test_empty_id_fails_validation() {
    let elem = TreeElem {
        id: String::new(),
        name: "orphan".to_string(),
        children: vec![],
    };
    elem.elem_id().unwrap_err();
}
