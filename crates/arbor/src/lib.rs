#![forbid(unsafe_code)]

//! `arbor` draws tidy node-link tree diagrams, headless.
//!
//! Input is JSON: a nested object tree, `id`/`parentId` rows, or materialized-path rows. The
//! hierarchy builder is always available; layout and drawing sit behind features.
//!
//! # Features
//!
//! - `render`: tree layouts + SVG rendering (`arbor::render`)
//! - `raster`: PNG/JPG/PDF output via pure-Rust SVG rasterization/conversion

pub use arbor_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use arbor_layout::{
        Algorithm, Cluster, NodeSize, Separation, Tidy, TreeLayout, layout as layout_hierarchy,
    };
    pub use arbor_render::{
        Curve, Error as RenderError, Label, LinkLayer, LinkMark, NodeMark, Scene, TextAnchor,
        TreeChart, TreeOptions, TreeStyle, Viewport, draw, layout_tree, scene_to_svg,
    };

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error("input JSON error: {0}")]
        Json(#[from] serde_json::Error),
        #[error(transparent)]
        Render(#[from] arbor_render::Error),
    }

    impl HeadlessError {
        pub fn kind(&self) -> crate::ErrorKind {
            match self {
                HeadlessError::Json(_) => crate::ErrorKind::DegenerateInput,
                HeadlessError::Render(e) => e.kind(),
            }
        }
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Renders already-parsed JSON data to an SVG document.
    pub fn render_svg(data: &serde_json::Value, options: &TreeOptions) -> Result<String> {
        Ok(arbor_render::render_svg(data, options)?)
    }

    /// Parses `text` as JSON and renders it to an SVG document.
    pub fn render_svg_from_str(text: &str, options: &TreeOptions) -> Result<String> {
        let data: serde_json::Value = serde_json::from_str(text)?;
        render_svg(&data, options)
    }
}
