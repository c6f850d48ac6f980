use arbor::render::raster::{self, RasterError, RasterOptions};
use arbor::render::{
    Algorithm, Curve, HeadlessError, RenderError, TreeChart, TreeOptions, TreeStyle, layout_tree,
};
use arbor::{Accessor, ChildrenAccessor, Comparator, HierarchyOptions, NodeAccessor};
use serde::Serialize;
use serde_json::Value;
use std::io::{Read, Write};
use std::str::FromStr;
use tracing::debug;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Hierarchy(arbor::Error),
    Render(HeadlessError),
    Raster(RasterError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Hierarchy(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<arbor::Error> for CliError {
    fn from(value: arbor::Error) -> Self {
        Self::Hierarchy(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        Self::Render(value)
    }
}

impl From<RenderError> for CliError {
    fn from(value: RenderError) -> Self {
        Self::Render(HeadlessError::from(value))
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Render,
    Hierarchy,
    Layout,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
    Jpeg,
    Pdf,
}

impl RenderFormat {
    fn extension(self) -> &'static str {
        match self {
            RenderFormat::Svg => "svg",
            RenderFormat::Png => "png",
            RenderFormat::Jpeg => "jpg",
            RenderFormat::Pdf => "pdf",
        }
    }
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "pdf" => Ok(Self::Pdf),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,

    path: Option<String>,
    id: Option<String>,
    parent_id: Option<String>,
    children: Option<String>,
    sort: Option<String>,
    no_impute: bool,

    label: Option<String>,
    title: Option<String>,
    link: Option<String>,
    link_target: Option<String>,

    config: Option<String>,
    algorithm: Algorithm,
    curve: Option<Curve>,
    width: Option<f64>,
    height: Option<f64>,
    padding: Option<f64>,

    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "arbor-cli\n\
\n\
USAGE:\n\
  arbor-cli hierarchy [--pretty] [ADDRESSING] [<path>|-]\n\
  arbor-cli layout [--pretty] [--layout tidy|cluster] [--width <w>] [--padding <p>] [--config <style.json>] [ADDRESSING] [<path>|-]\n\
  arbor-cli [render] [--format svg|png|jpg|pdf] [--out <path>] [--config <style.json>] [--layout tidy|cluster] [--curve <curve>] [--width <w>] [--height <h>] [--padding <p>] [--label <field>] [--title <field>] [--link <field>] [--link-target <t>] [--scale <n>] [--background <css-color>] [ADDRESSING] [<path>|-]\n\
\n\
ADDRESSING:\n\
  --path <field> | --id <field> --parent-id <field> | --children <field>\n\
  [--sort <field>] [--no-impute]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Fields are object keys, or JSON pointers when they start with '/'.\n\
  - --label/--title/--link also accept @id (resolved node id) and @basename (last path segment).\n\
  - Curves: bumpX, bumpY, linear, step, stepBefore, stepAfter.\n\
  - --config reads a JSON style object (camelCase keys); explicit flags override it.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG/JPG/PDF output defaults to writing next to the input file (or ./out.<ext> for stdin).\n\
  - Set RUST_LOG (e.g. RUST_LOG=debug) for diagnostics on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        render_scale: 1.0,
        ..Default::default()
    };

    fn value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<String, CliError> {
        it.next().cloned().ok_or(CliError::Usage(usage()))
    }

    fn number<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<f64, CliError> {
        let v = value(it)?
            .parse::<f64>()
            .map_err(|_| CliError::Usage(usage()))?;
        if v.is_finite() {
            Ok(v)
        } else {
            Err(CliError::Usage(usage()))
        }
    }

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "hierarchy" => args.command = Command::Hierarchy,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--path" => args.path = Some(value(&mut it)?),
            "--id" => args.id = Some(value(&mut it)?),
            "--parent-id" => args.parent_id = Some(value(&mut it)?),
            "--children" => args.children = Some(value(&mut it)?),
            "--sort" => args.sort = Some(value(&mut it)?),
            "--no-impute" => args.no_impute = true,
            "--label" => args.label = Some(value(&mut it)?),
            "--title" => args.title = Some(value(&mut it)?),
            "--link" => args.link = Some(value(&mut it)?),
            "--link-target" => args.link_target = Some(value(&mut it)?),
            "--config" => args.config = Some(value(&mut it)?),
            "--layout" => {
                args.algorithm = value(&mut it)?
                    .parse::<Algorithm>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--curve" => {
                args.curve = Some(
                    value(&mut it)?
                        .parse::<Curve>()
                        .map_err(|_| CliError::Usage(usage()))?,
                );
            }
            "--width" => args.width = Some(number(&mut it)?),
            "--height" => args.height = Some(number(&mut it)?),
            "--padding" => args.padding = Some(number(&mut it)?),
            "--format" => {
                args.render_format = value(&mut it)?
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                args.render_scale = number(&mut it)? as f32;
                if args.render_scale <= 0.0 {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let bg = value(&mut it)?;
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--out" => args.out = Some(value(&mut it)?),
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }
    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{text}")?;
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn write_bytes(bytes: &[u8], out: Option<&str>, input: Option<&str>, ext: &str) -> Result<(), CliError> {
    let out = out
        .map(str::to_string)
        .unwrap_or_else(|| default_raster_out_path(input, ext).to_string_lossy().to_string());
    if out == "-" {
        std::io::stdout().lock().write_all(bytes)?;
    } else {
        std::fs::write(out, bytes)?;
    }
    Ok(())
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> std::path::PathBuf {
    match input {
        Some(path) if path != "-" => std::path::PathBuf::from(path).with_extension(ext),
        _ => std::path::PathBuf::from(format!("out.{ext}")),
    }
}

fn node_accessor(spec: &str) -> NodeAccessor {
    match spec {
        "@id" => NodeAccessor::id(),
        "@basename" => NodeAccessor::basename(),
        field => NodeAccessor::field(field),
    }
}

fn hierarchy_options(args: &Args) -> HierarchyOptions {
    let mut options = HierarchyOptions::default().impute_missing(!args.no_impute);
    if let Some(path) = &args.path {
        options = options.path(Accessor::field(path.as_str()));
    }
    // A lone --id or --parent-id is rejected by the builder as a configuration error.
    options.id = args.id.as_deref().map(Accessor::field);
    options.parent_id = args.parent_id.as_deref().map(Accessor::field);
    if let Some(children) = &args.children {
        options = options.children(ChildrenAccessor::field(children.as_str()));
    }
    if let Some(sort) = &args.sort {
        options = options.sort(Comparator::by_field(sort.as_str()));
    }
    options
}

fn tree_options(args: &Args) -> Result<TreeOptions, CliError> {
    let mut style = match &args.config {
        Some(path) => TreeStyle::from_json_str(&std::fs::read_to_string(path)?)?,
        None => TreeStyle::default(),
    };
    if let Some(width) = args.width {
        style.width = width;
    }
    if let Some(height) = args.height {
        style.height = Some(height);
    }
    if let Some(padding) = args.padding {
        style.padding = padding;
    }
    if let Some(curve) = args.curve {
        style.curve = curve;
    }
    if let Some(target) = &args.link_target {
        style.link_target = target.clone();
    }

    let mut options = TreeOptions::default()
        .hierarchy(hierarchy_options(args))
        .style(style)
        .algorithm(args.algorithm);
    if let Some(label) = &args.label {
        options = options.label(node_accessor(label));
    }
    if let Some(title) = &args.title {
        options = options.title(node_accessor(title));
    }
    if let Some(link) = &args.link {
        options = options.link(node_accessor(link));
    }
    options.validate()?;
    Ok(options)
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let data: Value = serde_json::from_str(&text)?;
    debug!(command = ?args.command, bytes = text.len(), "input read");

    match args.command {
        Command::Hierarchy => {
            let hierarchy = arbor::build_hierarchy(&data, &hierarchy_options(&args))?;
            write_json(&hierarchy.snapshot(), args.pretty)
        }
        Command::Layout => {
            let options = tree_options(&args)?;
            let (hierarchy, _) = layout_tree(&data, &options)?;
            write_json(&hierarchy.snapshot(), args.pretty)
        }
        Command::Render => {
            let options = tree_options(&args)?;
            let svg = TreeChart::new(options).render_svg(&data)?;
            let raster_options = RasterOptions {
                scale: args.render_scale,
                background: args.background.clone(),
                ..RasterOptions::default()
            };
            let out = args.out.as_deref();
            let input = args.input.as_deref();
            let ext = args.render_format.extension();
            match args.render_format {
                RenderFormat::Svg => write_text(&svg, out),
                RenderFormat::Png => {
                    write_bytes(&raster::svg_to_png(&svg, &raster_options)?, out, input, ext)
                }
                RenderFormat::Jpeg => {
                    write_bytes(&raster::svg_to_jpeg(&svg, &raster_options)?, out, input, ext)
                }
                RenderFormat::Pdf => write_bytes(&raster::svg_to_pdf(&svg)?, out, input, ext),
            }
        }
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_logging();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
