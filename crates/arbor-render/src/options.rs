use crate::curve::Curve;
use crate::error::{Error, Result};
use arbor_core::{HierarchyOptions, NodeAccessor};
use arbor_layout::{Algorithm, Tidy, TreeLayout};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Visual constants of a tree chart.
///
/// Deserializes from camelCase JSON; absent keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeStyle {
    pub link_target: String,
    pub width: f64,
    /// Derived from the laid-out extent when `None`.
    pub height: Option<f64>,
    /// Node marker radius.
    pub r: f64,
    /// Horizontal padding, in depth levels.
    pub padding: f64,
    /// Leaf fill.
    pub fill: String,
    /// Link stroke, also the fill of nodes with children.
    pub stroke: String,
    pub stroke_width: f64,
    pub stroke_opacity: f64,
    /// Label outline color.
    pub halo: String,
    pub halo_width: f64,
    pub curve: Curve,
}

impl Default for TreeStyle {
    fn default() -> Self {
        Self {
            link_target: "_blank".to_string(),
            width: 640.0,
            height: None,
            r: 3.0,
            padding: 1.0,
            fill: "#999".to_string(),
            stroke: "#555".to_string(),
            stroke_width: 1.5,
            stroke_opacity: 0.4,
            halo: "#fff".to_string(),
            halo_width: 3.0,
            curve: Curve::BumpX,
        }
    }
}

impl TreeStyle {
    pub fn from_json(value: &Value) -> Result<Self> {
        let style = Self::deserialize(value)?;
        style.validate()?;
        Ok(style)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(&value)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(Error::invalid("width", format!("must be positive, got {}", self.width)));
        }
        if let Some(height) = self.height {
            if !(height.is_finite() && height > 0.0) {
                return Err(Error::invalid("height", format!("must be positive, got {height}")));
            }
        }
        for (name, v) in [
            ("r", self.r),
            ("padding", self.padding),
            ("strokeWidth", self.stroke_width),
            ("haloWidth", self.halo_width),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(Error::invalid(name, format!("must be non-negative, got {v}")));
            }
        }
        if !(0.0..=1.0).contains(&self.stroke_opacity) {
            return Err(Error::invalid(
                "strokeOpacity",
                format!("must be within [0, 1], got {}", self.stroke_opacity),
            ));
        }
        Ok(())
    }
}

/// Everything a [`crate::TreeChart`] render pass needs besides the data.
#[derive(Debug, Clone)]
pub struct TreeOptions {
    pub hierarchy: HierarchyOptions,
    pub style: TreeStyle,
    pub label: Option<NodeAccessor>,
    /// Hover text.
    pub title: Option<NodeAccessor>,
    /// Hyperlink URL; nodes become `<a>` elements when it yields a value.
    pub link: Option<NodeAccessor>,
    pub layout: Arc<dyn TreeLayout>,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            hierarchy: HierarchyOptions::default(),
            style: TreeStyle::default(),
            label: None,
            title: None,
            link: None,
            layout: Arc::new(Tidy::default()),
        }
    }
}

impl TreeOptions {
    pub fn hierarchy(mut self, hierarchy: HierarchyOptions) -> Self {
        self.hierarchy = hierarchy;
        self
    }

    pub fn style(mut self, style: TreeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn label(mut self, label: NodeAccessor) -> Self {
        self.label = Some(label);
        self
    }

    pub fn title(mut self, title: NodeAccessor) -> Self {
        self.title = Some(title);
        self
    }

    pub fn link(mut self, link: NodeAccessor) -> Self {
        self.link = Some(link);
        self
    }

    pub fn layout(mut self, layout: Arc<dyn TreeLayout>) -> Self {
        self.layout = layout;
        self
    }

    pub fn algorithm(self, algorithm: Algorithm) -> Self {
        self.layout(algorithm.build())
    }

    pub fn validate(&self) -> Result<()> {
        self.style.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_json_keeps_defaults() {
        let style = TreeStyle::from_json(&json!({"width": 800, "strokeOpacity": 1, "curve": "step"}))
            .unwrap();
        assert_eq!(style.width, 800.0);
        assert_eq!(style.stroke_opacity, 1.0);
        assert_eq!(style.curve, Curve::Step);
        assert_eq!(style.fill, "#999");
        assert_eq!(style.link_target, "_blank");
        assert_eq!(style.height, None);
    }

    #[test]
    fn rejects_out_of_range_values() {
        for bad in [
            json!({"width": 0}),
            json!({"width": -5}),
            json!({"height": 0}),
            json!({"r": -1}),
            json!({"strokeOpacity": 2}),
            json!({"padding": -0.5}),
        ] {
            let err = TreeStyle::from_json(&bad).unwrap_err();
            assert!(matches!(err, Error::InvalidOption { .. }), "{bad}: {err}");
        }
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            TreeStyle::from_json_str("{\"width\": \"wide\"}"),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            TreeStyle::from_json_str("{\"curve\": \"spline\"}"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn default_layout_is_tidy() {
        assert_eq!(TreeOptions::default().layout.name(), "tidy");
        let options = TreeOptions::default().algorithm(Algorithm::Cluster);
        assert_eq!(options.layout.name(), "cluster");
    }
}
