//! Drawboard CLI
//!
//! Render the sample view through either native surface and replay touches
//! against it.

use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use drawboard_graphics::{GraphicsPlatform, Rect, Size};
use drawboard_platform::{TouchFrame, TouchFrameSource, TouchPhase, TouchPoint, ViewNode};
use drawboard_platform_android::{AndroidGraphics, AndroidSurface};
use drawboard_platform_ios::{IosGraphics, IosSurface};
use drawboard_view::{DrawboardConfig, FnView, NativeSurface, ViewRenderer};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod scene;

#[derive(Parser)]
#[command(name = "drawboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Drawboard native surface CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (drawboard.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Bitmap canvas (Android)
    Raster,
    /// Shape-layer tree (iOS)
    Layers,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Phase {
    Began,
    Moved,
    Ended,
    Cancelled,
}

impl From<Phase> for TouchPhase {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Began => TouchPhase::Began,
            Phase::Moved => TouchPhase::Moved,
            Phase::Ended => TouchPhase::Ended,
            Phase::Cancelled => TouchPhase::Cancelled,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render the sample view
    Render {
        #[arg(short, long, value_enum, default_value = "raster")]
        backend: Backend,

        /// View width in view units
        #[arg(long, default_value = "320")]
        width: f32,

        /// View height in view units
        #[arg(long, default_value = "200")]
        height: f32,

        /// Output file: PNG for raster, JSON for layers (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Route one touch to a view placed on a page and report the result
    Touch {
        /// Page x coordinate
        x: f32,

        /// Page y coordinate
        y: f32,

        #[arg(short, long, value_enum, default_value = "began")]
        phase: Phase,

        /// View frame on the page as x,y,width,height
        #[arg(long, default_value = "20,40,200,120", value_parser = parse_rect)]
        frame: Rect,
    },

    /// Print the effective configuration
    Config,

    /// Show platform and font information
    Info,
}

fn parse_rect(text: &str) -> std::result::Result<Rect, String> {
    let parts: Vec<f32> = text
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("{}: {}", p, e)))
        .collect::<std::result::Result<_, _>>()?;
    match parts.as_slice() {
        [x, y, w, h] => Ok(Rect::new(*x, *y, *w, *h)),
        _ => Err(format!("expected x,y,width,height, got {:?}", text)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Render {
            backend,
            width,
            height,
            output,
        } => cmd_render(&config, backend, Size::new(width, height), output.as_deref()),

        Commands::Touch { x, y, phase, frame } => cmd_touch(&config, x, y, phase.into(), frame),

        Commands::Config => cmd_config(&config),

        Commands::Info => cmd_info(&config),
    }
}

fn load_config(path: Option<&Path>) -> Result<DrawboardConfig> {
    match path {
        Some(path) => {
            let config = DrawboardConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?;
            debug!("Loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(DrawboardConfig::default()),
    }
}

fn sample_view(size: Size) -> Rc<FnView> {
    Rc::new(FnView::new(scene::draw_sample).with_size(size.width, size.height))
}

/// Attach `surface` for one pass of the sample view and hand it back
fn render_once<S: NativeSurface + 'static>(
    config: &DrawboardConfig,
    surface: S,
    size: Size,
) -> Result<S> {
    let view = sample_view(size);
    let renderer = ViewRenderer::with_router(config.touch.router());
    let touches = TouchFrameSource::new();
    renderer.set_view(Some(view))?;
    renderer.attach(surface, ViewNode::root(size), &touches)?;
    info!("Rendered {} pass(es)", renderer.passes());
    renderer
        .detach()?
        .context("surface was not attached")
}

fn cmd_render(
    config: &DrawboardConfig,
    backend: Backend,
    size: Size,
    output: Option<&Path>,
) -> Result<()> {
    if !(size.width > 0.0 && size.height > 0.0) {
        anyhow::bail!("view size must be positive, got {}x{}", size.width, size.height);
    }

    match backend {
        Backend::Raster => {
            let graphics = AndroidGraphics::from_config(config);
            let surface: AndroidSurface = graphics.create_surface(&config.surface)?;
            let surface = render_once(config, surface, size)?;
            let png = surface.encode_png()?;
            let (w, h) = surface.pixel_size();
            let path = output
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("drawboard.png"));
            fs::write(&path, png).with_context(|| format!("writing {}", path.display()))?;
            info!("Wrote {}x{} bitmap to {}", w, h, path.display());
        }
        Backend::Layers => {
            let surface = render_once(config, IosSurface::new(), size)?;
            let json = serde_json::to_string_pretty(surface.container())?;
            match output {
                Some(path) => {
                    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
                    info!(
                        "Wrote {} layers to {}",
                        surface.container().sublayers().len(),
                        path.display()
                    );
                }
                None => println!("{}", json),
            }
        }
    }
    Ok(())
}

fn cmd_touch(config: &DrawboardConfig, x: f32, y: f32, phase: TouchPhase, frame: Rect) -> Result<()> {
    let dispatched = Rc::new(Cell::new(false));
    let view = Rc::new(
        FnView::new(scene::draw_sample)
            .with_size(frame.width, frame.height)
            .on_touch({
                let dispatched = Rc::clone(&dispatched);
                move |phase, points| {
                    dispatched.set(true);
                    for p in points {
                        println!("{:?} id={} at ({}, {})", phase, p.id, p.position.x, p.position.y);
                    }
                    true
                }
            }),
    );

    let page = ViewNode::root(Size::new(
        frame.right().max(x) + 1.0,
        frame.bottom().max(y) + 1.0,
    ));
    let node = ViewNode::child(page, frame);
    let renderer = ViewRenderer::with_router(config.touch.router());
    let touches = TouchFrameSource::new();
    renderer.set_view(Some(view))?;
    renderer.attach(IosSurface::new(), node, &touches)?;

    let subscribers = touches.emit(&TouchFrame::single(TouchPoint::new(1, x, y, phase)));
    debug!(subscribers, "touch frame emitted");
    if !dispatched.get() {
        println!("({}, {}) is outside {:?}, not dispatched", x, y, frame);
    }
    Ok(())
}

fn cmd_config(config: &DrawboardConfig) -> Result<()> {
    print!("{}", config.to_toml_string()?);
    Ok(())
}

fn cmd_info(config: &DrawboardConfig) -> Result<()> {
    let android = AndroidGraphics::from_config(config);
    let ios = IosGraphics;
    println!("drawboard {}", env!("CARGO_PKG_VERSION"));
    println!("  {}: raster canvas, {} font faces", android.name(), android.fonts().face_count());
    println!("  {}: layer tree", ios.name());
    println!("  scale: {}", config.surface.scale);
    println!("  touch: {:?}, multi-touch {}", config.touch.coordinates, config.touch.multi_touch);
    Ok(())
}
