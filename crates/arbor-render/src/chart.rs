use crate::error::{Error, Result};
use crate::options::TreeOptions;
use crate::scene::{Label, LinkMark, NodeMark, Scene, TextAnchor};
use crate::svg::scene_to_svg;
use crate::viewport::Viewport;
use arbor_core::{Hierarchy, build_hierarchy};
use arbor_layout::NodeSize;
use serde_json::Value;
use tracing::{debug, trace};

/// Spacing between adjacent nodes on the sibling axis.
pub const NODE_SPACING: f64 = 10.0;

const LABEL_OFFSET: f64 = 6.0;

/// Builds the hierarchy for `data` and lays it out.
///
/// The depth spacing divides the chart width evenly between the tree levels and the padding.
pub fn layout_tree<'a>(data: &'a Value, options: &TreeOptions) -> Result<(Hierarchy<'a>, NodeSize)> {
    options.validate()?;
    let mut hierarchy = build_hierarchy(data, &options.hierarchy)?;

    let style = &options.style;
    let dy = style.width / (hierarchy.height() as f64 + style.padding);
    if !(dy.is_finite() && dy > 0.0) {
        return Err(Error::invalid(
            "padding",
            "a single-level tree needs a positive padding to derive its depth spacing",
        ));
    }
    let node_size = NodeSize::new(NODE_SPACING, dy);

    options
        .layout
        .assign_coordinates(&mut hierarchy, node_size)?;
    debug!(
        layout = options.layout.name(),
        nodes = hierarchy.len(),
        height = hierarchy.height(),
        dy,
        "tree laid out"
    );
    Ok((hierarchy, node_size))
}

/// Emits the drawing primitives of a laid-out hierarchy into `scene`.
pub fn draw(scene: &mut Scene, hierarchy: &Hierarchy<'_>, node_size: NodeSize, options: &TreeOptions) {
    let style = &options.style;
    scene.viewport = Viewport::compute(hierarchy, node_size, style);
    debug!(view_box = ?scene.viewport.view_box(), "viewport");

    let position = |id| hierarchy.node(id).position().unwrap_or_default().transposed();

    scene.links.stroke = style.stroke.clone();
    scene.links.stroke_opacity = style.stroke_opacity;
    scene.links.stroke_width = style.stroke_width;
    for link in hierarchy.links() {
        let d = style
            .curve
            .link_path(position(link.source), position(link.target));
        scene.links.paths.push(LinkMark {
            source: link.source,
            target: link.target,
            d,
        });
    }

    for id in hierarchy.descendants() {
        let node = hierarchy.node(id);
        let branch = node.has_children();
        let href = options.link.as_ref().and_then(|link| link.get(node));
        let target = href.as_ref().map(|_| style.link_target.clone());
        let label = options.label.as_ref().and_then(|label| label.get(node)).map(|text| Label {
            text,
            x: if branch { -LABEL_OFFSET } else { LABEL_OFFSET },
            anchor: if branch { TextAnchor::End } else { TextAnchor::Start },
            halo: style.halo.clone(),
            halo_width: style.halo_width,
        });
        let mark = NodeMark {
            node: id,
            translate: position(id),
            radius: style.r,
            fill: if branch { style.stroke.clone() } else { style.fill.clone() },
            href,
            target,
            title: options.title.as_ref().and_then(|title| title.get(node)),
            label,
        };
        trace!(node = id.index(), x = mark.translate.x, y = mark.translate.y, "node");
        scene.nodes.push(mark);
    }
}

/// A tree chart bound to one drawing surface.
///
/// Every [`TreeChart::render`] clears the surface and redraws it from scratch; a failed pass
/// leaves it empty rather than half drawn.
#[derive(Debug, Clone, Default)]
pub struct TreeChart {
    options: TreeOptions,
    scene: Scene,
}

impl TreeChart {
    pub fn new(options: TreeOptions) -> Self {
        Self {
            options,
            scene: Scene::default(),
        }
    }

    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: TreeOptions) {
        self.options = options;
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn render(&mut self, data: &Value) -> Result<&Scene> {
        self.scene.clear();
        let (hierarchy, node_size) = layout_tree(data, &self.options)?;
        draw(&mut self.scene, &hierarchy, node_size, &self.options);
        Ok(&self.scene)
    }

    pub fn render_svg(&mut self, data: &Value) -> Result<String> {
        let scene = self.render(data)?;
        Ok(scene_to_svg(scene))
    }
}
