//! Synthetic element tree used as the benchmark data set.

use crate::types::id::{ElemId, ElemIdError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Anything that exposes a stable identifier usable as a store key and file stem.
pub trait HasId {
    fn id(&self) -> &str;

    /// Validates the raw identifier. Fails on empty ids.
    fn elem_id(&self) -> Result<ElemId, ElemIdError> {
        ElemId::try_from(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeElem {
    pub id: String,
    pub name: String,
    pub children: Vec<TreeElem>,
}

impl HasId for TreeElem {
    fn id(&self) -> &str {
        &self.id
    }
}

impl TreeElem {
    /// Creates an element with a fresh random id.
    pub fn new(name: String, children: Vec<TreeElem>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            children,
        }
    }
}

/// One level of the synthetic tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub name: String,
    pub node_count: usize,
}

impl LayerSpec {
    pub fn new(name: impl Into<String>, node_count: usize) -> Self {
        Self {
            name: name.into(),
            node_count,
        }
    }
}

/// Builds the tree depth-first. Every node of `layers[0]` gets its own subtree
/// built from the remaining layers, with fresh ids throughout.
pub fn generate_tree(layers: &[LayerSpec]) -> Vec<TreeElem> {
    let Some((layer, rest)) = layers.split_first() else {
        return Vec::new();
    };

    (1..=layer.node_count)
        .map(|i| {
            let name = format!("Layer {} - Node {}", layer.name, i);
            TreeElem::new(name, generate_tree(rest))
        })
        .collect()
}

/// Number of nodes `generate_tree` produces for `layers`.
pub fn node_count(layers: &[LayerSpec]) -> usize {
    let mut total = 0;
    let mut width = 1;
    for layer in layers {
        width *= layer.node_count;
        total += width;
    }
    total
}

/// Flattens the forest in pre-order.
pub fn flatten(roots: &[TreeElem]) -> Vec<&TreeElem> {
    fn visit<'a>(elem: &'a TreeElem, out: &mut Vec<&'a TreeElem>) {
        out.push(elem);
        for child in &elem.children {
            visit(child, out);
        }
    }

    let mut out = Vec::new();
    for root in roots {
        visit(root, &mut out);
    }
    out
}

#[cfg(test)]
mod tests;
