use std::path::{Path, PathBuf};

use anyhow::Context as _;
use assetforge::{
    AlphaThreshold, BackgroundJob, CropJob, Deliverable, ExportJob, ExportOutcome, ExportPipeline,
    IconJob, Platform, PolygonSpec, Presets, ResizeThreading, ScanOpts, ScreenshotManifest,
    SnapshotJob, SourceImage,
};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "assetforge", version)]
struct Cli {
    /// JSON file overriding the built-in preset tables.
    #[arg(long, global = true)]
    presets: Option<PathBuf>,

    /// Log pipeline progress to stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resize a 1024x1024 PNG into app icon sets.
    Icons(IconsArgs),
    /// Render App Store screenshots from a JSON manifest.
    Screenshots(ScreenshotsArgs),
    /// Crop transparent margins off PNG files.
    Crop(CropArgs),
    /// Trim a mockup snapshot to its visible content.
    Trim(TrimArgs),
    /// Generate a low-poly background.
    Background(BackgroundArgs),
    /// Print dimensions, format and content bounds of an image.
    Inspect(InspectArgs),
    /// Print the effective preset tables as JSON.
    Presets,
}

#[derive(Parser, Debug)]
struct IconsArgs {
    /// Source PNG (must be 1024x1024).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Target platforms (ios, android, macos, web).
    #[arg(long = "platform", value_delimiter = ',', default_value = "ios")]
    platforms: Vec<Platform>,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct ScreenshotsArgs {
    /// Manifest JSON; image paths resolve against its directory.
    #[arg(long)]
    manifest: PathBuf,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct CropArgs {
    /// PNG files to crop.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Pixels with alpha at or below this value count as empty.
    #[arg(long, default_value_t = 0)]
    threshold: u8,

    /// Margin kept around the content.
    #[arg(long, default_value_t = 0)]
    padding: u32,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct TrimArgs {
    /// Rendered snapshot.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output file name.
    #[arg(long, default_value = "phone-showcase.png")]
    name: String,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct BackgroundArgs {
    /// Size preset name (desktop, mobile, twitter, ...).
    #[arg(long, default_value = "desktop")]
    size: String,

    /// Explicit width; overrides the size preset together with --height.
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Explicit height.
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Color theme name.
    #[arg(long, default_value = "Modern Blue")]
    theme: String,

    /// Lattice spacing in pixels.
    #[arg(long, default_value_t = 60.0)]
    cell_size: f64,

    /// Point jitter in [0, 1].
    #[arg(long, default_value_t = 0.75)]
    variance: f64,

    /// Randomness seed.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Image file.
    path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let presets = match &cli.presets {
        Some(path) => Presets::from_path(path)?,
        None => Presets::builtin(),
    };
    match cli.cmd {
        Command::Icons(args) => cmd_icons(args, &presets),
        Command::Screenshots(args) => cmd_screenshots(args, &presets),
        Command::Crop(args) => cmd_crop(args),
        Command::Trim(args) => cmd_trim(args),
        Command::Background(args) => cmd_background(args, &presets),
        Command::Inspect(args) => cmd_inspect(args),
        Command::Presets => {
            println!("{}", presets.to_json()?);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn cmd_icons(args: IconsArgs, presets: &Presets) -> anyhow::Result<()> {
    let source = SourceImage::from_path(&args.in_path)?;
    let mut resizer = assetforge::BatchResizer::default();
    resizer.threading = ResizeThreading {
        parallel: true,
        threads: args.threads,
    };
    let job = IconJob::new(source, args.platforms)
        .with_table(presets.icons.clone())
        .with_resizer(resizer);
    export(&job, &args.out)
}

fn cmd_screenshots(args: ScreenshotsArgs, presets: &Presets) -> anyhow::Result<()> {
    let manifest = ScreenshotManifest::from_path(&args.manifest)?;
    let base_dir = args.manifest.parent().unwrap_or_else(|| Path::new("."));
    let job = manifest.into_job(base_dir, presets)?;
    export(&job, &args.out)
}

fn cmd_crop(args: CropArgs) -> anyhow::Result<()> {
    let sources = args
        .files
        .iter()
        .map(SourceImage::from_path)
        .collect::<Result<Vec<_>, _>>()?;
    let job = CropJob::new(sources)
        .with_opts(ScanOpts::new(AlphaThreshold(args.threshold), args.padding));
    export(&job, &args.out)
}

fn cmd_trim(args: TrimArgs) -> anyhow::Result<()> {
    let job = SnapshotJob::new(SourceImage::from_path(&args.in_path)?).with_file_name(args.name);
    export(&job, &args.out)
}

fn cmd_background(args: BackgroundArgs, presets: &Presets) -> anyhow::Result<()> {
    let mut spec = PolygonSpec::from_presets(&presets.background, &args.size, &args.theme, args.seed)?;
    if let (Some(width), Some(height)) = (args.width, args.height) {
        spec.width = width;
        spec.height = height;
    }
    spec.cell_size = args.cell_size;
    spec.variance = args.variance;
    export(&BackgroundJob::new(spec), &args.out)
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let source = SourceImage::from_path(&args.path)?;
    let format = assetforge::sniff_format(source.bytes())
        .map(|f| format!("{f:?}"))
        .unwrap_or_else(|| "unknown".to_string());
    let raster = source.decode()?;
    println!("{}: {}x{} {format}", source.name(), raster.width(), raster.height());
    match assetforge::scan(&raster, ScanOpts::new(AlphaThreshold::ANY_VISIBLE, 0))? {
        Some(b) if b.is_full(raster.width(), raster.height()) => {
            println!("content: full canvas (nothing to crop)")
        }
        Some(b) => println!(
            "content: left={} top={} right={} bottom={} ({}x{})",
            b.left,
            b.top,
            b.right,
            b.bottom,
            b.width(),
            b.height()
        ),
        None => println!("content: none (fully transparent)"),
    }
    Ok(())
}

fn export(job: &dyn ExportJob, out_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create output dir '{}'", out_dir.display()))?;
    match ExportPipeline::new().run(job) {
        ExportOutcome::Ready {
            deliverable,
            summary,
        } => {
            let path = out_dir.join(deliverable.file_name());
            write(&path, deliverable.bytes())?;
            if let Deliverable::Archive { blob, .. } = &deliverable {
                eprintln!("{summary}; {} entries", blob.entry_count);
            } else {
                eprintln!("{summary}");
            }
            eprintln!("wrote {}", path.display());
            Ok(())
        }
        ExportOutcome::Failed { summary, fallback } => {
            for (rel, bytes) in fallback.outputs() {
                let path = out_dir.join(rel);
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("create output dir '{}'", parent.display()))?;
                }
                write(&path, bytes)?;
                eprintln!("wrote {}", path.display());
            }
            anyhow::bail!("{summary}")
        }
        ExportOutcome::Cancelled => anyhow::bail!("{}: export cancelled", job.name()),
        ExportOutcome::Ignored => anyhow::bail!("{}: an export is already running", job.name()),
    }
}

fn write(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}
