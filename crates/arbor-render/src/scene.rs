//! Drawing surface: the primitives a render pass emits, in paint order.

use crate::viewport::Viewport;
use arbor_core::{NodeId, Point};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub viewport: Viewport,
    pub links: LinkLayer,
    pub nodes: Vec<NodeMark>,
}

impl Scene {
    pub fn clear(&mut self) {
        self.viewport = Viewport::default();
        self.links.paths.clear();
        self.nodes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.links.paths.is_empty() && self.nodes.is_empty()
    }
}

/// Links share one stroke, set on their group.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkLayer {
    pub stroke: String,
    pub stroke_opacity: f64,
    pub stroke_width: f64,
    pub paths: Vec<LinkMark>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkMark {
    pub source: NodeId,
    pub target: NodeId,
    /// SVG path data.
    pub d: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMark {
    pub node: NodeId,
    /// Marker center in drawing coordinates (layout axes swapped).
    pub translate: Point,
    pub radius: f64,
    pub fill: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub text: String,
    /// Offset from the marker center along the drawing x axis.
    pub x: f64,
    pub anchor: TextAnchor,
    pub halo: String,
    pub halo_width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::End => "end",
        }
    }
}
