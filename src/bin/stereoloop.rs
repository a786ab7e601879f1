use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::Context as _;
use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand, ValueEnum};
use stereoloop::{
    AnimationPlayer, Frame, GenerateThreading, ImageSequenceSink, Resample, RowMode,
    SequenceFormat, StereoSession, StereogramParams, StripFit,
};

#[derive(Parser, Debug)]
#[command(name = "stereoloop", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a single stereogram as a PNG.
    Frame(FrameArgs),
    /// Generate one frame per depth map and export them.
    Animate(AnimateArgs),
    /// Loop the generated frames into a PNG file for a while.
    Preview(PreviewArgs),
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Depth map image.
    #[arg(long)]
    depth: PathBuf,

    /// Texture image.
    #[arg(long)]
    texture: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Spread rows over all cores.
    #[arg(long)]
    parallel_rows: bool,

    #[command(flatten)]
    params: ParamArgs,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("output").required(true).multiple(true).args(["frames_dir", "gif"])))]
struct AnimateArgs {
    /// Depth map files or directories (one frame per depth map).
    #[arg(long, num_args = 1.., required = true)]
    depth: Vec<PathBuf>,

    /// Texture files or directories, paired with depth maps cyclically.
    #[arg(long, num_args = 1.., required = true)]
    texture: Vec<PathBuf>,

    /// Write numbered still images into this directory.
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// Still image format.
    #[arg(long, value_enum, default_value_t = FormatChoice::Jpeg)]
    format: FormatChoice,

    /// Still image file name prefix.
    #[arg(long, default_value = "stereo")]
    prefix: String,

    /// Write a looping animated GIF.
    #[arg(long, requires = "fps")]
    gif: Option<PathBuf>,

    /// GIF playback rate (frames per second).
    #[arg(long, requires = "gif")]
    fps: Option<f64>,

    #[command(flatten)]
    threading: ThreadingArgs,

    #[command(flatten)]
    params: ParamArgs,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    /// Depth map files or directories.
    #[arg(long, num_args = 1.., required = true)]
    depth: Vec<PathBuf>,

    /// Texture files or directories.
    #[arg(long, num_args = 1.., required = true)]
    texture: Vec<PathBuf>,

    /// PNG file rewritten with every shown frame.
    #[arg(long)]
    out: PathBuf,

    /// Delay between frames in milliseconds.
    #[arg(long, default_value_t = stereoloop::DEFAULT_FRAME_INTERVAL_MS)]
    interval_ms: u64,

    /// How long to play before stopping.
    #[arg(long, default_value_t = 3.0)]
    seconds: f64,

    #[command(flatten)]
    threading: ThreadingArgs,

    #[command(flatten)]
    params: ParamArgs,
}

#[derive(Args, Debug)]
struct ThreadingArgs {
    /// Generate frames in parallel.
    #[arg(long)]
    parallel: bool,

    /// Worker thread count for --parallel.
    #[arg(long, requires = "parallel")]
    threads: Option<usize>,

    /// Spread the rows of each frame over the worker pool.
    #[arg(long)]
    parallel_rows: bool,
}

#[derive(Args, Debug)]
struct ParamArgs {
    /// Stereogram parameters JSON; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of strips across the depth map.
    #[arg(long)]
    strips: Option<u32>,

    /// Disparity multiplier (0 disables depth).
    #[arg(long)]
    depth_multiplier: Option<f64>,

    /// Depth map scale factor.
    #[arg(long)]
    scale: Option<f64>,

    /// Tile the texture vertically.
    #[arg(long)]
    tile: bool,

    /// Mirror every other tile.
    #[arg(long)]
    mirror: bool,

    /// Resampling filter.
    #[arg(long, value_enum)]
    resample: Option<ResampleChoice>,

    /// How the texture is fitted into the seed strip.
    #[arg(long, value_enum)]
    strip_fit: Option<StripFitChoice>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Jpeg,
    Png,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ResampleChoice {
    Nearest,
    Bilinear,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StripFitChoice {
    Clip,
    Stretch,
}

impl ParamArgs {
    fn resolve(&self) -> anyhow::Result<StereogramParams> {
        let mut params = match &self.config {
            Some(path) => StereogramParams::from_path(path)?,
            None => StereogramParams::default(),
        };
        if let Some(n) = self.strips {
            params.num_strips = n;
        }
        if let Some(m) = self.depth_multiplier {
            params.depth_multiplier = m;
        }
        if let Some(s) = self.scale {
            params.image_scale = s;
        }
        if self.tile {
            params.tile_texture = true;
        }
        if self.mirror {
            params.mirror_tiles = true;
        }
        if let Some(r) = self.resample {
            params.resample = match r {
                ResampleChoice::Nearest => Resample::Nearest,
                ResampleChoice::Bilinear => Resample::Bilinear,
            };
        }
        if let Some(f) = self.strip_fit {
            params.strip_fit = match f {
                StripFitChoice::Clip => StripFit::Clip,
                StripFitChoice::Stretch => StripFit::Stretch,
            };
        }
        params.validate()?;
        Ok(params)
    }
}

impl ThreadingArgs {
    fn threading(&self) -> GenerateThreading {
        GenerateThreading {
            parallel: self.parallel,
            threads: self.threads,
            parallel_rows: self.parallel_rows,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Animate(args) => cmd_animate(args),
        Command::Preview(args) => cmd_preview(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let params = args.params.resolve()?;
    let depth = stereoloop::load_raster(&args.depth)?;
    let texture = stereoloop::load_raster(&args.texture)?;
    let rows = if args.parallel_rows {
        RowMode::Parallel
    } else {
        RowMode::Sequential
    };

    let frame = stereoloop::generate_frame(&depth.raster, &texture.raster, &params, rows)?;
    write_png(&frame, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_animate(args: AnimateArgs) -> anyhow::Result<()> {
    let params = args.params.resolve()?;
    let mut session = load_session(&args.depth, &args.texture)?;
    let sequence = session.generate(&params, &args.threading.threading())?;
    eprintln!("generated {} frames", sequence.len());

    if let Some(dir) = &args.frames_dir {
        let format = match args.format {
            FormatChoice::Jpeg => SequenceFormat::Jpeg,
            FormatChoice::Png => SequenceFormat::Png,
        };
        let mut sink = ImageSequenceSink::new(dir)
            .with_prefix(args.prefix.as_str())
            .with_format(format);
        session.export_frames(&mut sink)?;
        eprintln!("wrote {} frames to {}", sink.written().len(), dir.display());
    }

    if let (Some(path), Some(fps)) = (&args.gif, args.fps) {
        let bytes = session.export_gif(fps)?;
        ensure_parent_dir(path)?;
        std::fs::write(path, bytes).with_context(|| format!("write gif '{}'", path.display()))?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    if !args.seconds.is_finite() || args.seconds < 0.0 {
        anyhow::bail!("--seconds must be a non-negative number");
    }
    let params = args.params.resolve()?;
    let mut session = load_session(&args.depth, &args.texture)?;
    session.set_frame_interval_ms(args.interval_ms);
    let sequence: Arc<_> = session.generate(&params, &args.threading.threading())?;
    ensure_parent_dir(&args.out)?;

    let out = args.out.clone();
    let mut player = AnimationPlayer::new();
    player.play(sequence, move |idx: usize, frame: &Frame| {
        if let Err(e) = write_png(frame, &out) {
            tracing::warn!(frame = idx, error = %e, "preview write failed");
        }
    })?;
    std::thread::sleep(Duration::from_secs_f64(args.seconds));
    player.stop();

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn load_session(depth: &[PathBuf], texture: &[PathBuf]) -> anyhow::Result<StereoSession> {
    let mut session = StereoSession::new();
    session.add_depth_files(depth)?;
    session.add_texture_files(texture)?;
    Ok(session)
}

fn write_png(frame: &Frame, out: &Path) -> anyhow::Result<()> {
    ensure_parent_dir(out)?;
    frame
        .to_image()
        .save_with_format(out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", out.display()))
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
