//! Tidy tree layout.
//!
//! Reingold–Tilford tidy drawing, using the linear-time formulation from Buchheim, Jünger and
//! Leipert ("Improving Walker's Algorithm to Run in Linear Time", 2002):
//!
//! 1. first walk (post-order): preliminary `x` per node, merging subtree contours via threads
//!    and shifting conflicting subtrees apart (`apportion`);
//! 2. second walk (pre-order): accumulate modifiers into final `x`.
//!
//! The root lands at `x = 0`. Coordinates are scaled by the node size afterwards.

use crate::{NodeSize, Result, Separation, TreeLayout};
use arbor_core::{Hierarchy, NodeId, Point};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct Tidy {
    pub separation: Separation,
}

impl Tidy {
    pub fn with_separation(separation: Separation) -> Self {
        Self { separation }
    }
}

/// Working node. Index 0 is a sentinel parent of the root; index `k + 1` mirrors hierarchy
/// node `k`.
#[derive(Debug, Clone)]
struct WalkNode {
    parent: usize,
    children: Vec<usize>,
    /// Sibling index.
    number: usize,
    /// Default ancestor for the next `apportion` among this node's children.
    default_ancestor: Option<usize>,
    ancestor: usize,
    prelim: f64,
    modifier: f64,
    change: f64,
    shift: f64,
    thread: Option<usize>,
}

struct Walker<'h, 'a> {
    hierarchy: &'h Hierarchy<'a>,
    separation: &'h Separation,
    ids: Vec<NodeId>,
    nodes: Vec<WalkNode>,
}

impl<'h, 'a> Walker<'h, 'a> {
    fn new(hierarchy: &'h Hierarchy<'a>, separation: &'h Separation) -> Self {
        let blank = |parent: usize, ancestor: usize, children: Vec<usize>| WalkNode {
            parent,
            children,
            number: 0,
            default_ancestor: None,
            ancestor,
            prelim: 0.0,
            modifier: 0.0,
            change: 0.0,
            shift: 0.0,
            thread: None,
        };

        let ids: Vec<NodeId> = hierarchy.iter().map(|(id, _)| id).collect();
        let mut nodes = Vec::with_capacity(ids.len() + 1);
        nodes.push(blank(0, 0, vec![1]));
        for (id, node) in hierarchy.iter() {
            let parent = node.parent().map_or(0, |p| p.index() + 1);
            let children = node.children().iter().map(|c| c.index() + 1).collect();
            nodes.push(blank(parent, id.index() + 1, children));
        }
        for v in 1..nodes.len() {
            let children = std::mem::take(&mut nodes[v].children);
            for (number, &child) in children.iter().enumerate() {
                nodes[child].number = number;
            }
            nodes[v].children = children;
        }

        Self {
            hierarchy,
            separation,
            ids,
            nodes,
        }
    }

    fn separation(&self, a: usize, b: usize) -> f64 {
        self.separation.between(
            self.hierarchy.node(self.ids[a - 1]),
            self.hierarchy.node(self.ids[b - 1]),
        )
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.nodes[v].children.first().copied().or(self.nodes[v].thread)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.nodes[v].children.last().copied().or(self.nodes[v].thread)
    }

    fn next_ancestor(&self, vim: usize, v: usize, ancestor: usize) -> usize {
        let a = self.nodes[vim].ancestor;
        if self.nodes[a].parent == self.nodes[v].parent {
            a
        } else {
            ancestor
        }
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        let change = shift / (self.nodes[wp].number as f64 - self.nodes[wm].number as f64);
        self.nodes[wp].change -= change;
        self.nodes[wp].shift += shift;
        self.nodes[wm].change += change;
        self.nodes[wp].prelim += shift;
        self.nodes[wp].modifier += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        let children = std::mem::take(&mut self.nodes[v].children);
        for &w in children.iter().rev() {
            let n = &mut self.nodes[w];
            n.prelim += shift;
            n.modifier += shift;
            change += n.change;
            shift += n.shift + change;
        }
        self.nodes[v].children = children;
    }

    fn first_walk(&mut self, v: usize) {
        let parent = self.nodes[v].parent;
        let number = self.nodes[v].number;
        let w = if number > 0 {
            Some(self.nodes[parent].children[number - 1])
        } else {
            None
        };

        let children = &self.nodes[v].children;
        let bounds = children.first().copied().zip(children.last().copied());
        if let Some((first, last)) = bounds {
            self.execute_shifts(v);
            let midpoint = (self.nodes[first].prelim + self.nodes[last].prelim) / 2.0;
            match w {
                Some(w) => {
                    self.nodes[v].prelim = self.nodes[w].prelim + self.separation(v, w);
                    self.nodes[v].modifier = self.nodes[v].prelim - midpoint;
                }
                None => self.nodes[v].prelim = midpoint,
            }
        } else if let Some(w) = w {
            self.nodes[v].prelim = self.nodes[w].prelim + self.separation(v, w);
        }

        let fallback = self.nodes[parent].children[0];
        let ancestor = self.nodes[parent].default_ancestor.unwrap_or(fallback);
        let ancestor = self.apportion(v, w, ancestor);
        self.nodes[parent].default_ancestor = Some(ancestor);
    }

    fn apportion(&mut self, v: usize, w: Option<usize>, mut ancestor: usize) -> usize {
        let Some(w) = w else {
            return ancestor;
        };

        let mut vip = v;
        let mut vop = v;
        let mut vim = w;
        let mut vom = self.nodes[self.nodes[vip].parent].children[0];
        let mut sip = self.nodes[vip].modifier;
        let mut sop = self.nodes[vop].modifier;
        let mut sim = self.nodes[vim].modifier;
        let mut som = self.nodes[vom].modifier;

        let (rest_im, rest_ip) = loop {
            let (Some(next_im), Some(next_ip)) = (self.next_right(vim), self.next_left(vip)) else {
                break (self.next_right(vim), self.next_left(vip));
            };
            vim = next_im;
            vip = next_ip;
            // Both outer contours are at least as deep as the inner ones.
            vom = self.next_left(vom).unwrap_or(vom);
            vop = self.next_right(vop).unwrap_or(vop);
            self.nodes[vop].ancestor = v;

            let shift = self.nodes[vim].prelim + sim - self.nodes[vip].prelim - sip
                + self.separation(vim, vip);
            if shift > 0.0 {
                let a = self.next_ancestor(vim, v, ancestor);
                self.move_subtree(a, v, shift);
                sip += shift;
                sop += shift;
            }
            sim += self.nodes[vim].modifier;
            sip += self.nodes[vip].modifier;
            som += self.nodes[vom].modifier;
            sop += self.nodes[vop].modifier;
        };

        if let Some(im) = rest_im {
            if self.next_right(vop).is_none() {
                self.nodes[vop].thread = Some(im);
                self.nodes[vop].modifier += sim - sop;
            }
        }
        if let Some(ip) = rest_ip {
            if self.next_left(vom).is_none() {
                self.nodes[vom].thread = Some(ip);
                self.nodes[vom].modifier += sip - som;
                ancestor = v;
            }
        }
        ancestor
    }

    fn second_walk(&mut self, v: usize) -> f64 {
        let parent_modifier = self.nodes[self.nodes[v].parent].modifier;
        self.nodes[v].modifier += parent_modifier;
        self.nodes[v].prelim + parent_modifier
    }
}

impl TreeLayout for Tidy {
    fn name(&self) -> &'static str {
        "tidy"
    }

    fn assign_coordinates(&self, hierarchy: &mut Hierarchy<'_>, node_size: NodeSize) -> Result<()> {
        let NodeSize { dx, dy } = node_size.validate()?;

        let post_order = hierarchy.each_after();
        let pre_order = hierarchy.each_before();

        let xs: Vec<(NodeId, f64)> = {
            let mut walker = Walker::new(hierarchy, &self.separation);
            for id in &post_order {
                walker.first_walk(id.index() + 1);
            }
            walker.nodes[0].modifier = -walker.nodes[1].prelim;
            pre_order
                .iter()
                .map(|&id| (id, walker.second_walk(id.index() + 1)))
                .collect()
        };

        for (id, x) in xs {
            let depth = hierarchy.node(id).depth() as f64;
            hierarchy
                .node_mut(id)
                .set_position(Point::new(x * dx, depth * dy));
        }

        debug!(nodes = hierarchy.len(), dx, dy, "tidy layout assigned");
        Ok(())
    }
}
