//! Canonical rooted-tree model.
//!
//! Nodes live in an arena owned by [`Hierarchy`] and are addressed by [`NodeId`]. The arena is
//! stored in pre-order, so a parent always has a smaller index than any of its descendants.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the point with both axes exchanged.
    pub fn transposed(self) -> Self {
        Self {
            x: self.y,
            y: self.x,
        }
    }
}

/// A parent -> child pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Link {
    pub source: NodeId,
    pub target: NodeId,
}

#[derive(Debug, Clone)]
pub struct HierarchyNode<'a> {
    data: Option<&'a Value>,
    id: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    depth: usize,
    height: usize,
    position: Option<Point>,
}

impl<'a> HierarchyNode<'a> {
    /// The input record. `None` only for ancestors imputed by path addressing.
    pub fn data(&self) -> Option<&'a Value> {
        self.data
    }

    /// Resolved id (tabular input); `None` for nested input.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Longest distance to a descendant leaf.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Layout coordinates; `None` until a layout ran.
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = Some(position);
    }
}

/// A node waiting to be linked into the arena.
#[derive(Debug, Clone)]
pub(crate) struct PendingNode<'a> {
    pub(crate) data: Option<&'a Value>,
    pub(crate) id: Option<String>,
    pub(crate) children: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct Hierarchy<'a> {
    nodes: Vec<HierarchyNode<'a>>,
}

impl<'a> Hierarchy<'a> {
    /// Links `pending[root]` and everything reachable from it into a pre-order arena.
    ///
    /// Returns the hierarchy together with a per-pending-node "reached" mask, which callers use to
    /// detect rows that were never attached (cycles).
    pub(crate) fn assemble(mut pending: Vec<PendingNode<'a>>, root: usize) -> (Self, Vec<bool>) {
        let mut reached = vec![false; pending.len()];
        let mut nodes: Vec<HierarchyNode<'a>> = Vec::with_capacity(pending.len());
        let mut stack: Vec<(usize, Option<NodeId>, usize)> = vec![(root, None, 0)];

        while let Some((index, parent, depth)) = stack.pop() {
            if std::mem::replace(&mut reached[index], true) {
                continue;
            }
            let id = NodeId(nodes.len());
            let entry = &mut pending[index];
            let children = std::mem::take(&mut entry.children);
            nodes.push(HierarchyNode {
                data: entry.data,
                id: entry.id.take(),
                parent,
                children: Vec::with_capacity(children.len()),
                depth,
                height: 0,
                position: None,
            });
            if let Some(p) = parent {
                nodes[p.0].children.push(id);
            }
            for &child in children.iter().rev() {
                stack.push((child, Some(id), depth + 1));
            }
        }

        // Pre-order arena: walking backwards visits every child before its parent.
        for i in (1..nodes.len()).rev() {
            let h = nodes[i].height + 1;
            if let Some(p) = nodes[i].parent {
                if nodes[p.0].height < h {
                    nodes[p.0].height = h;
                }
            }
        }

        (Self { nodes }, reached)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &HierarchyNode<'a> {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut HierarchyNode<'a> {
        &mut self.nodes[id.0]
    }

    /// Number of nodes (always at least one).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Height of the root, i.e. the number of levels below it.
    pub fn height(&self) -> usize {
        self.nodes.first().map_or(0, |n| n.height)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &HierarchyNode<'a>)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Breadth-first order, root first.
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        queue.push_back(self.root());
        while let Some(id) = queue.pop_front() {
            out.push(id);
            queue.extend(self.nodes[id.0].children.iter().copied());
        }
        out
    }

    /// Parent -> child pairs in breadth-first order of the child.
    pub fn links(&self) -> Vec<Link> {
        self.descendants()
            .into_iter()
            .filter_map(|target| {
                self.nodes[target.0]
                    .parent
                    .map(|source| Link { source, target })
            })
            .collect()
    }

    /// Pre-order (parents before children, siblings in order).
    pub fn each_before(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    /// Post-order (children before parents, siblings in order).
    pub fn each_after(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().copied());
        }
        out.reverse();
        out
    }

    /// Leaves in pre-order.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.each_before()
            .into_iter()
            .filter(|id| self.nodes[id.0].is_leaf())
            .collect()
    }

    /// `id` followed by each of its ancestors up to the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = vec![id];
        let mut cur = self.nodes[id.0].parent;
        while let Some(p) = cur {
            out.push(p);
            cur = self.nodes[p.0].parent;
        }
        out
    }

    /// Stable-sorts every sibling group independently.
    ///
    /// Sorting reorders `children` only; node ids stay valid.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&HierarchyNode<'a>, &HierarchyNode<'a>) -> Ordering,
    {
        for i in 0..self.nodes.len() {
            if self.nodes[i].children.len() < 2 {
                continue;
            }
            let mut children = std::mem::take(&mut self.nodes[i].children);
            children.sort_by(|a, b| compare(&self.nodes[a.0], &self.nodes[b.0]));
            self.nodes[i].children = children;
        }
    }

    pub fn is_laid_out(&self) -> bool {
        self.nodes.iter().all(|n| n.position.is_some())
    }

    /// Flat serializable view: one entry per node in arena (pre-order) order, root first.
    pub fn snapshot(&self) -> HierarchySnapshot<'_> {
        HierarchySnapshot {
            root: self.root(),
            nodes: self
                .iter()
                .map(|(index, n)| SnapshotNode {
                    index,
                    id: n.id.as_deref(),
                    parent: n.parent,
                    children: n.children.clone(),
                    depth: n.depth,
                    height: n.height,
                    position: n.position,
                    data: n.data,
                })
                .collect(),
        }
    }
}

/// Serializable view of a hierarchy (CLI / debugging output).
///
/// Nodes reference each other by index, so arbitrarily deep trees serialize without recursion.
#[derive(Debug, Clone, Serialize)]
pub struct HierarchySnapshot<'h> {
    pub root: NodeId,
    pub nodes: Vec<SnapshotNode<'h>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SnapshotNode<'h> {
    pub index: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'h str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeId>,
    pub depth: usize,
    pub height: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    pub data: Option<&'h Value>,
}
