use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "animexport", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a directory of frames to a video file or an image sequence.
    Export(ExportArgs),
    /// Print the export mode chosen for a destination path.
    Classify(ClassifyArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Directory of still frames, played in file-name order.
    #[arg(long = "in")]
    in_dir: PathBuf,

    /// Destination. `.png`, `.jpg`, `.jpeg`, `.tif`, `.tiff` write an image sequence; anything
    /// else is encoded as video with ffmpeg.
    #[arg(long)]
    out: PathBuf,

    /// Export options JSON (see `ExportOpts`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Video frame rate override.
    #[arg(long)]
    fps: Option<f64>,

    /// Video bit rate override, kbit/s.
    #[arg(long)]
    bit_rate: Option<u32>,

    /// Stop after this many frames, as if the user had cancelled.
    #[arg(long)]
    max_frames: Option<u64>,
}

#[derive(Parser, Debug)]
struct ClassifyArgs {
    path: PathBuf,
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
        Command::Classify(args) => {
            println!("{}", animexport::classify(&args.path));
            Ok(())
        }
    }
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let mut opts = match &args.config {
        Some(path) => animexport::ExportOpts::from_json_file(path)?,
        None => animexport::ExportOpts::default(),
    };
    if let Some(fps) = args.fps {
        opts.frame_rate = fps;
    }
    if let Some(bit_rate) = args.bit_rate {
        opts.video_bit_rate = bit_rate;
    }

    let target = animexport::ExportTarget::new(&args.out)?;
    let mut source = animexport::ImageDirSource::open(&args.in_dir)
        .with_context(|| format!("open frames in '{}'", args.in_dir.display()))?;

    let mut seen = 0u64;
    let report = animexport::export(&mut source, &target, &opts, |p| {
        tracing::info!(percent = (p.fraction * 100.0).floor() as u32, "{}", p.label);
        let stop = args.max_frames.is_some_and(|max| seen >= max);
        seen += 1;
        stop
    })?;

    match report.outcome {
        animexport::ExportOutcome::Completed => {
            eprintln!("wrote {} frame(s) to {}", report.frames_written, args.out.display());
            Ok(())
        }
        animexport::ExportOutcome::Cancelled => {
            eprintln!(
                "stopped after {} of {} frame(s)",
                report.frames_written, report.frames_total
            );
            Ok(())
        }
        animexport::ExportOutcome::Failed(e) => Err(e)
            .with_context(|| format!("export to '{}' failed", args.out.display())),
    }
}
