use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use gifscii::{
    Canvas, Color, DrawList, ExportOpts, ExportThreading, GifsciiResult, GlyphAtlas, GlyphFonts,
    LegacyLayer, PacingConfig, Player, RasterCanvas, RenderSnapshot, composite, surface_size,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gifscii", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a GIF into an ASCII-art GIF.
    Export(ExportArgs),
    /// Composite a single frame as a PNG.
    Frame(FrameArgs),
    /// Preview the animation as text in the terminal.
    Play(PlayArgs),
    /// Write a snapshot JSON to start editing from.
    Init(InitArgs),
}

#[derive(Args, Debug)]
struct RenderOverrides {
    /// Snapshot JSON (layers, render and pacing settings). Starter settings when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Block edge in source pixels.
    #[arg(long)]
    block_size: Option<u32>,

    /// Output-to-source size ratio.
    #[arg(long)]
    scale: Option<f64>,

    /// Playback speed, clamped to [1, 10]; 5 keeps the source timing.
    #[arg(long)]
    speed: Option<f64>,

    /// Canvas background as hex (`#rgb` or `#rrggbb`).
    #[arg(long)]
    background: Option<Color>,

    /// Paint the raw frame under the glyph blocks.
    #[arg(long)]
    underlay: Option<bool>,

    /// Extra directory with .ttf/.otf/.ttc fonts for glyphs (repeatable).
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,
}

impl RenderOverrides {
    fn snapshot(&self) -> anyhow::Result<RenderSnapshot> {
        let mut snapshot = match &self.config {
            Some(path) => RenderSnapshot::from_path(path)?,
            None => RenderSnapshot::starter(),
        };
        if let Some(block_size) = self.block_size {
            snapshot.render.block_size = block_size;
        }
        if let Some(scale) = self.scale {
            snapshot.render.scale = scale;
        }
        if let Some(speed) = self.speed {
            snapshot.pacing = PacingConfig::clamped(speed);
        }
        if let Some(background) = self.background {
            snapshot.render.background = background;
        }
        if let Some(underlay) = self.underlay {
            snapshot.render.show_underlay = underlay;
        }
        snapshot.validate()?;
        Ok(snapshot)
    }

    fn fonts(&self) -> GlyphFonts {
        GlyphFonts::with_dirs(&self.font_dirs)
    }
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input GIF.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    render: RenderOverrides,

    /// Composite frames in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Frames per parallel batch.
    #[arg(long, default_value_t = 16)]
    chunk_size: usize,

    /// Encoder quality, 1 (best, slowest) to 30 (fastest).
    #[arg(long, default_value_t = gifscii::DEFAULT_QUALITY)]
    quality: u8,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input GIF.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long, default_value_t = 0)]
    frame: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    render: RenderOverrides,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Input GIF.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// How long to play before exiting.
    #[arg(long, default_value_t = 5.0)]
    seconds: f64,

    #[command(flatten)]
    render: RenderOverrides,
}

#[derive(Parser, Debug)]
struct InitArgs {
    /// Output JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Convert a legacy layer list (with the `-1` underlay entry) instead of the starter layers.
    #[arg(long)]
    legacy: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Play(args) => cmd_play(args),
        Command::Init(args) => cmd_init(args),
    }
}

fn create_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let snapshot = args.render.snapshot()?;
    let frames = gifscii::decode_gif_path(&args.in_path)?;

    let opts = ExportOpts {
        threading: ExportThreading {
            parallel: args.parallel,
            chunk_size: args.chunk_size,
            threads: args.threads,
        },
        quality: args.quality,
        cancel: None,
        fonts: Some(args.render.fonts()),
    };
    let bytes = gifscii::export_gif(&frames, &snapshot, &opts)?;

    create_parent_dir(&args.out)?;
    std::fs::write(&args.out, bytes)
        .with_context(|| format!("write gif '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let snapshot = args.render.snapshot()?;
    let frames = gifscii::decode_gif_path(&args.in_path)?;
    let frame = frames.get(args.frame).with_context(|| {
        format!(
            "frame {} out of range ({} frames)",
            args.frame,
            frames.len()
        )
    })?;

    let (width, height) = surface_size(frame, &snapshot.render)?;
    let mut canvas = RasterCanvas::new(width, height, GlyphAtlas::new(args.render.fonts()))?;
    composite(frame, &snapshot.layers, &snapshot.render, &mut canvas)?;
    canvas.into_surface().save_png(&args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

/// Prints each composited frame as text, one character per block.
struct TerminalDisplay {
    list: DrawList,
    cell: f64,
}

impl gifscii::Display for TerminalDisplay {
    fn surface(&mut self, width: u32, height: u32) -> GifsciiResult<&mut dyn Canvas> {
        self.list.reset(width, height);
        Ok(&mut self.list)
    }

    fn present(&mut self, frame_index: usize) -> GifsciiResult<()> {
        let text = self.list.to_text(self.cell, self.cell);
        let mut out = std::io::stdout().lock();
        write!(out, "\x1b[H\x1b[2J{text}\n[frame {frame_index}]\n")
            .and_then(|()| out.flush())
            .context("write preview to stdout")?;
        Ok(())
    }
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let run_for = Duration::try_from_secs_f64(args.seconds.max(0.0))
        .with_context(|| format!("invalid --seconds {}", args.seconds))?;
    let snapshot = args.render.snapshot()?;
    let frames = gifscii::decode_gif_path(&args.in_path)?;
    let display = TerminalDisplay {
        list: DrawList::default(),
        cell: f64::from(snapshot.render.block_size) * snapshot.render.scale,
    };

    let mut player = Player::new(frames, snapshot, display)?;
    player.play()?;
    std::thread::sleep(run_for);
    player.stop()?;
    Ok(())
}

fn cmd_init(args: InitArgs) -> anyhow::Result<()> {
    let snapshot = match &args.legacy {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("open legacy layers '{}'", path.display()))?;
            let layers: Vec<LegacyLayer> = serde_json::from_reader(std::io::BufReader::new(file))
                .with_context(|| format!("parse legacy layers '{}'", path.display()))?;
            RenderSnapshot::from_legacy_layers(layers)?
        }
        None => RenderSnapshot::starter(),
    };
    let json = snapshot.to_json()?;

    match &args.out {
        Some(out) => {
            create_parent_dir(out)?;
            std::fs::write(out, format!("{json}\n"))
                .with_context(|| format!("write snapshot '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
