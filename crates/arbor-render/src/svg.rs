//! SVG serialization of a [`Scene`].
//!
//! Output is a single-line standalone document. Element and attribute order is fixed, so equal
//! scenes always serialize to byte-identical strings.

pub(crate) mod util;

use crate::scene::{Label, LinkLayer, NodeMark, Scene};
use std::fmt::Write as _;
use util::{escape_xml, escape_xml_into, fmt};

const ROOT_STYLE: &str = "max-width: 100%; height: auto; height: intrinsic;";

pub fn scene_to_svg(scene: &Scene) -> String {
    let mut out = String::with_capacity(256 + scene.nodes.len() * 160);
    let vp = &scene.viewport;
    let [vx, vy, vw, vh] = vp.view_box();

    let _ = write!(
        &mut out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="{} {} {} {}" width="{}" height="{}" style="{ROOT_STYLE}" font-family="sans-serif" font-size="10">"#,
        fmt(vx),
        fmt(vy),
        fmt(vw),
        fmt(vh),
        fmt(vp.width),
        fmt(vp.height),
    );

    write_links(&mut out, &scene.links);

    out.push_str("<g>");
    for node in &scene.nodes {
        write_node(&mut out, node);
    }
    out.push_str("</g></svg>");
    out
}

fn write_links(out: &mut String, links: &LinkLayer) {
    let _ = write!(
        out,
        r#"<g fill="none" stroke="{}" stroke-opacity="{}" stroke-width="{}">"#,
        escape_xml(&links.stroke),
        fmt(links.stroke_opacity),
        fmt(links.stroke_width),
    );
    for link in &links.paths {
        let _ = write!(out, r#"<path d="{}"/>"#, link.d);
    }
    out.push_str("</g>");
}

fn write_node(out: &mut String, node: &NodeMark) {
    let transform = format!(
        "translate({},{})",
        fmt(node.translate.x),
        fmt(node.translate.y)
    );
    let tag = match &node.href {
        Some(href) => {
            let href = escape_xml(href);
            let _ = write!(out, r#"<a xlink:href="{href}" href="{href}""#);
            if let Some(target) = &node.target {
                out.push_str(r#" target=""#);
                escape_xml_into(out, target);
                out.push('"');
            }
            let _ = write!(out, r#" transform="{transform}">"#);
            "a"
        }
        None => {
            let _ = write!(out, r#"<g transform="{transform}">"#);
            "g"
        }
    };

    let _ = write!(
        out,
        r#"<circle fill="{}" r="{}"/>"#,
        escape_xml(&node.fill),
        fmt(node.radius)
    );
    if let Some(title) = &node.title {
        out.push_str("<title>");
        escape_xml_into(out, title);
        out.push_str("</title>");
    }
    if let Some(label) = &node.label {
        write_label(out, label);
    }
    let _ = write!(out, "</{tag}>");
}

fn write_label(out: &mut String, label: &Label) {
    let _ = write!(
        out,
        r#"<text dy="0.32em" x="{}" text-anchor="{}" paint-order="stroke" stroke="{}" stroke-width="{}">"#,
        fmt(label.x),
        label.anchor.as_str(),
        escape_xml(&label.halo),
        fmt(label.halo_width),
    );
    escape_xml_into(out, &label.text);
    out.push_str("</text>");
}
