use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "skyline", version, about = "Render a twilight skyline banner GIF")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the full animation as a looping GIF.
    Render(RenderArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Scene configuration JSON. Missing fields use the reference defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Font file (TTF/OTF) used for the banner.
    #[arg(long)]
    font: PathBuf,

    /// Layout seed. Overrides the config; without either a clock-derived seed is used.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of frames. Overrides the config.
    #[arg(long)]
    frames: Option<u64>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    /// Render frames on a rayon thread pool.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for `--parallel` (defaults to the number of CPUs).
    #[arg(long)]
    threads: Option<usize>,

    /// Frames rendered per parallel chunk.
    #[arg(long, default_value_t = 16)]
    chunk_size: usize,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
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
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn load_config(args: &SceneArgs) -> anyhow::Result<skyline::SceneConfig> {
    let mut cfg = match &args.config {
        Some(path) => skyline::SceneConfig::from_json_path(path)?,
        None => skyline::SceneConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.seed = Some(seed);
    }
    if let Some(frames) = args.frames {
        cfg.num_frames = frames;
    }
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.scene)?;
    let fonts = skyline::FileFontProvider::new(&args.scene.font);
    let threading = skyline::RenderThreading {
        parallel: args.parallel,
        chunk_size: args.chunk_size,
        threads: args.threads,
    };

    let stats = skyline::render_to_gif(cfg, &fonts, &args.out, &threading)
        .with_context(|| format!("render gif '{}'", args.out.display()))?;

    eprintln!("wrote {} ({} frames)", args.out.display(), stats.frames_total);
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.scene)?;
    if args.frame >= cfg.num_frames {
        anyhow::bail!(
            "frame {} is out of range for a {}-frame animation",
            args.frame,
            cfg.num_frames
        );
    }
    let fonts = skyline::FileFontProvider::new(&args.scene.font);
    let scene = skyline::PreparedScene::prepare(cfg, &fonts)?;

    let frame = skyline::render_frame(&scene, skyline::FrameIndex(args.frame))?;
    let rgba = frame.to_straight_rgba8()?;

    skyline::render::pipeline::ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &rgba,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
