//! Cluster (dendrogram) layout: every leaf sits on the deepest level.

use crate::{NodeSize, Result, Separation, TreeLayout};
use arbor_core::{Hierarchy, NodeId, Point};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct Cluster {
    pub separation: Separation,
}

impl Cluster {
    pub fn with_separation(separation: Separation) -> Self {
        Self { separation }
    }
}

impl TreeLayout for Cluster {
    fn name(&self) -> &'static str {
        "cluster"
    }

    fn assign_coordinates(&self, hierarchy: &mut Hierarchy<'_>, node_size: NodeSize) -> Result<()> {
        let NodeSize { dx, dy } = node_size.validate()?;

        // Leaves are spread left to right; a parent sits at the mean of its children and one
        // level above the highest of them.
        let mut raw = vec![Point::default(); hierarchy.len()];
        let mut previous: Option<NodeId> = None;
        let mut cursor = 0.0;
        for id in hierarchy.each_after() {
            let node = hierarchy.node(id);
            let children = node.children();
            raw[id.index()] = if children.is_empty() {
                if let Some(prev) = previous {
                    cursor += self.separation.between(node, hierarchy.node(prev));
                }
                previous = Some(id);
                Point::new(cursor, 0.0)
            } else {
                let sum: f64 = children.iter().map(|c| raw[c.index()].x).sum();
                let top = children
                    .iter()
                    .map(|c| raw[c.index()].y)
                    .fold(0.0_f64, f64::max);
                Point::new(sum / children.len() as f64, top + 1.0)
            };
        }

        let origin = raw[hierarchy.root().index()];
        let ids: Vec<NodeId> = hierarchy.iter().map(|(id, _)| id).collect();
        for id in ids {
            let p = raw[id.index()];
            hierarchy
                .node_mut(id)
                .set_position(Point::new((p.x - origin.x) * dx, (origin.y - p.y) * dy));
        }

        debug!(nodes = hierarchy.len(), dx, dy, "cluster layout assigned");
        Ok(())
    }
}
