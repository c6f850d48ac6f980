#![forbid(unsafe_code)]

//! Tree chart rendering (headless).
//!
//! A render pass builds the hierarchy, lays it out, derives the viewport, and emits links and
//! node markers into a [`Scene`], which serializes to SVG. The chart grows left to right: the
//! layout's sibling axis is drawn vertically.

mod chart;
pub mod curve;
pub mod error;
pub mod options;
pub mod scene;
pub mod svg;
mod viewport;

pub use chart::{NODE_SPACING, TreeChart, draw, layout_tree};
pub use curve::Curve;
pub use error::{Error, Result};
pub use options::{TreeOptions, TreeStyle};
pub use scene::{Label, LinkLayer, LinkMark, NodeMark, Scene, TextAnchor};
pub use svg::scene_to_svg;
pub use viewport::Viewport;

use serde_json::Value;

/// One-shot render of `data` to an SVG document.
pub fn render_svg(data: &Value, options: &TreeOptions) -> Result<String> {
    TreeChart::new(options.clone()).render_svg(data)
}
