use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use sha2::Digest as _;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "meshoverlay", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Overlay mesh and skeleton onto a single frame.
    Frame(FrameArgs),
    /// Render every job listed in a manifest.
    Batch(BatchArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Source frame (any format the `image` crate reads).
    #[arg(long)]
    image: PathBuf,

    /// Mesh JSON from the pose model.
    #[arg(long)]
    mesh: Option<PathBuf>,

    /// Skeleton JSON.
    #[arg(long)]
    skeleton: Option<PathBuf>,

    /// Renderer config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured rasterizer.
    #[arg(long, value_enum)]
    backend: Option<BackendChoice>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Print frame diagnostics as JSON on stdout.
    #[arg(long)]
    diagnostics: bool,

    /// Print the SHA-256 of the output pixels.
    #[arg(long)]
    digest: bool,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Manifest JSON; relative paths resolve against its directory.
    #[arg(long)]
    manifest: PathBuf,

    /// Override the configured rasterizer.
    #[arg(long, value_enum)]
    backend: Option<BackendChoice>,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Frames scheduled at a time (parallel mode only).
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    Software,
    Banded,
}

impl From<BackendChoice> for meshoverlay::BackendKind {
    fn from(c: BackendChoice) -> Self {
        match c {
            BackendChoice::Software => meshoverlay::BackendKind::Software,
            BackendChoice::Banded => meshoverlay::BackendKind::Banded,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    config: Option<PathBuf>,
    jobs: Vec<ManifestJob>,
}

#[derive(Debug, Deserialize)]
struct ManifestJob {
    image: PathBuf,
    #[serde(default)]
    mesh: Option<PathBuf>,
    #[serde(default)]
    skeleton: Option<PathBuf>,
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
        Command::Frame(args) => cmd_frame(args),
        Command::Batch(args) => cmd_batch(args),
    }
}

fn load_config(
    path: Option<&Path>,
    backend: Option<BackendChoice>,
) -> anyhow::Result<meshoverlay::OverlayConfig> {
    let mut cfg = match path {
        Some(p) => meshoverlay::OverlayConfig::from_path(p)?,
        None => meshoverlay::OverlayConfig::default(),
    };
    if let Some(b) = backend {
        cfg.backend = b.into();
    }
    Ok(cfg)
}

fn read_frame(path: &Path) -> anyhow::Result<image::RgbImage> {
    let img = image::open(path).with_context(|| format!("read image '{}'", path.display()))?;
    Ok(img.to_rgb8())
}

/// A mesh that cannot be read still leaves the skeleton to render.
fn read_mesh(path: &Path) -> Option<meshoverlay::MeshFrame> {
    match meshoverlay::MeshFrame::from_path(path) {
        Ok(m) => Some(m),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "mesh unreadable, skeleton only");
            None
        }
    }
}

fn read_skeleton(path: &Path) -> anyhow::Result<meshoverlay::SkeletonFrame> {
    Ok(meshoverlay::SkeletonFrame::from_path(path)?)
}

fn write_png(path: &Path, img: &image::RgbImage) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        path,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref(), args.backend)?;
    let renderer = meshoverlay::OverlayRenderer::new(cfg)?;

    let frame = read_frame(&args.image)?;
    let mesh = args.mesh.as_deref().and_then(read_mesh);
    let skeleton = args.skeleton.as_deref().map(read_skeleton).transpose()?;

    let rendered = renderer.render(&frame, mesh.as_ref(), skeleton.as_ref());
    write_png(&args.out, &rendered.image)?;

    if args.diagnostics {
        let json = serde_json::to_string_pretty(&rendered.diagnostics)
            .context("serialize diagnostics")?;
        println!("{json}");
    }
    if args.digest {
        eprintln!("sha256: {}", sha256_hex(rendered.image.as_raw()));
    }

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let f = File::open(&args.manifest)
        .with_context(|| format!("open manifest '{}'", args.manifest.display()))?;
    let manifest: Manifest =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse manifest JSON")?;
    let root = args.manifest.parent().unwrap_or_else(|| Path::new("."));

    let cfg_path = manifest.config.as_ref().map(|p| root.join(p));
    let cfg = load_config(cfg_path.as_deref(), args.backend)?;
    let renderer = meshoverlay::OverlayRenderer::new(cfg)?;

    let mut jobs = Vec::with_capacity(manifest.jobs.len());
    for job in &manifest.jobs {
        let mut fj = meshoverlay::FrameJob::new(read_frame(&root.join(&job.image))?);
        fj.mesh = job.mesh.as_ref().and_then(|p| read_mesh(&root.join(p)));
        fj.skeleton = job
            .skeleton
            .as_ref()
            .map(|p| read_skeleton(&root.join(p)))
            .transpose()?;
        jobs.push(fj);
    }

    let threading = meshoverlay::RenderThreading {
        parallel: args.parallel,
        chunk_size: args.chunk_size,
        threads: args.threads,
    };
    let rendered = renderer.render_batch(&jobs, &threading)?;

    let mut fallbacks = 0usize;
    for (job, frame) in manifest.jobs.iter().zip(&rendered) {
        if frame.diagnostics.fell_back() {
            fallbacks += 1;
        }
        write_png(&root.join(&job.out), &frame.image)?;
    }

    eprintln!(
        "wrote {} frames ({} skeleton-only)",
        rendered.len(),
        fallbacks
    );
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
