use crate::options::TreeStyle;
use arbor_core::Hierarchy;
use arbor_layout::NodeSize;
use serde::Serialize;

/// Visible region of a laid-out tree, in drawing coordinates.
///
/// `min_x`/`max_x` are the extremes of the layout's sibling axis, which the chart draws
/// vertically. The view box starts half a padding to the left of the root.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Viewport {
    pub min_x: f64,
    pub max_x: f64,
    pub width: f64,
    pub height: f64,
    pub origin_x: f64,
    pub origin_y: f64,
}

impl Viewport {
    pub fn compute(hierarchy: &Hierarchy<'_>, node_size: NodeSize, style: &TreeStyle) -> Self {
        let (min_x, max_x) = hierarchy
            .iter()
            .filter_map(|(_, n)| n.position())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.x), hi.max(p.x))
            });
        let (min_x, max_x) = if min_x <= max_x {
            (min_x, max_x)
        } else {
            (0.0, 0.0)
        };

        let NodeSize { dx, dy } = node_size;
        Self {
            min_x,
            max_x,
            width: style.width,
            height: style.height.unwrap_or(max_x - min_x + 2.0 * dx),
            origin_x: -dy * style.padding / 2.0,
            origin_y: min_x - dx,
        }
    }

    pub fn view_box(&self) -> [f64; 4] {
        [self.origin_x, self.origin_y, self.width, self.height]
    }
}
