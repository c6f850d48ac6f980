#![forbid(unsafe_code)]

use crate::render::{HeadlessError, TreeOptions};
use serde_json::Value;

/// Charts ask for `sans-serif`; pin the fallback so output is stable across machines.
const FONT_FAMILY: &str = "Arial";

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error(transparent)]
    Headless(#[from] HeadlessError),
    #[error("failed to parse SVG")]
    SvgParse,
    #[error("failed to allocate pixmap for raster rendering")]
    PixmapAlloc,
    #[error("failed to encode PNG")]
    PngEncode,
    #[error("invalid background color: {0}")]
    Background(String),
    #[error("JPG rendering requires an opaque background color (e.g. white)")]
    JpegOpaqueBackgroundRequired,
    #[error("failed to encode JPG")]
    JpegEncode,
    #[error("failed to convert SVG to PDF")]
    PdfConvert,
}

pub type Result<T> = std::result::Result<T, RasterError>;

#[derive(Debug, Clone)]
pub struct RasterOptions {
    /// Device pixels per SVG user unit.
    pub scale: f32,
    /// CSS-like color (`white`, `#rgb`, `#rrggbb`, `#rrggbbaa`); transparent when `None`.
    pub background: Option<String>,
    pub jpeg_quality: u8,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: None,
            jpeg_quality: 90,
        }
    }
}

pub fn render_png(data: &Value, options: &TreeOptions, raster: &RasterOptions) -> Result<Vec<u8>> {
    let svg = super::render_svg(data, options)?;
    svg_to_png(&svg, raster)
}

pub fn render_jpeg(data: &Value, options: &TreeOptions, raster: &RasterOptions) -> Result<Vec<u8>> {
    let svg = super::render_svg(data, options)?;
    svg_to_jpeg(&svg, raster)
}

pub fn render_pdf(data: &Value, options: &TreeOptions) -> Result<Vec<u8>> {
    let svg = super::render_svg(data, options)?;
    svg_to_pdf(&svg)
}

pub fn svg_to_png(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let background = options
        .background
        .as_deref()
        .map(parse_color)
        .transpose()?;
    let pixmap = svg_to_pixmap(svg, options.scale, background)?;
    pixmap.encode_png().map_err(|_| RasterError::PngEncode)
}

pub fn svg_to_jpeg(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let color = parse_color(options.background.as_deref().unwrap_or("white"))?;
    if color.alpha() != 1.0 {
        return Err(RasterError::JpegOpaqueBackgroundRequired);
    }

    let pixmap = svg_to_pixmap(svg, options.scale, Some(color))?;
    let (w, h) = (pixmap.width(), pixmap.height());

    // The background is opaque, so dropping alpha loses nothing.
    let rgb: Vec<u8> = pixmap
        .data()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let mut out = Vec::new();
    let mut enc =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, options.jpeg_quality);
    enc.encode(&rgb, w, h, image::ExtendedColorType::Rgb8)
        .map_err(|_| RasterError::JpegEncode)?;
    Ok(out)
}

pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    // svg2pdf pins its own usvg release; parse with that one.
    let mut opt = svg2pdf::usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = FONT_FAMILY.to_string();
    let tree = svg2pdf::usvg::Tree::from_str(svg, &opt).map_err(|_| RasterError::SvgParse)?;

    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|_| RasterError::PdfConvert)
}

fn svg_to_pixmap(
    svg: &str,
    scale: f32,
    background: Option<tiny_skia::Color>,
) -> Result<tiny_skia::Pixmap> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = FONT_FAMILY.to_string();
    let tree = usvg::Tree::from_str(svg, &opt).map_err(|_| RasterError::SvgParse)?;

    // Chart SVG always carries explicit width/height, which usvg maps the viewBox onto.
    let size = tree.size();
    let width_px = (size.width() * scale).ceil().max(1.0) as u32;
    let height_px = (size.height() * scale).ceil().max(1.0) as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px).ok_or(RasterError::PixmapAlloc)?;
    if let Some(color) = background {
        pixmap.fill(color);
    }

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

fn parse_color(text: &str) -> Result<tiny_skia::Color> {
    let invalid = || RasterError::Background(text.to_string());
    let s = text.trim().to_ascii_lowercase();
    match s.as_str() {
        "transparent" => return Ok(tiny_skia::Color::from_rgba8(0, 0, 0, 0)),
        "white" => return Ok(tiny_skia::Color::WHITE),
        "black" => return Ok(tiny_skia::Color::BLACK),
        _ => {}
    }

    let hex = s.strip_prefix('#').ok_or_else(invalid)?;
    let nibbles: Vec<u8> = hex
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8))
        .collect::<Option<_>>()
        .ok_or_else(invalid)?;
    let channels: Vec<u8> = match nibbles.len() {
        3 | 4 => nibbles.iter().map(|&n| (n << 4) | n).collect(),
        6 | 8 => nibbles.chunks_exact(2).map(|p| (p[0] << 4) | p[1]).collect(),
        _ => return Err(invalid()),
    };
    let alpha = channels.get(3).copied().unwrap_or(255);
    Ok(tiny_skia::Color::from_rgba8(
        channels[0],
        channels[1],
        channels[2],
        alpha,
    ))
}
