//! Decode a candump capture of yaw sensor traffic.
//!
//! Accepts both `candump -l` log files and saved `candump` console output.
//! Readings are written as text (default) or JSON lines, followed by a
//! per-vendor traffic summary on the log.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use can_tools::{run, CandumpReader, Dispatcher, JsonSink, ReadingSink, TextSink};
use clap::Parser;
use tracing::info;
use yaw_decode::Vendor;

/// Yaw sensor candump decoder
#[derive(Parser, Debug)]
#[command(name = "decode_dump")]
#[command(about = "Decode yaw-rate sensor frames from a candump capture")]
#[command(version)]
struct Args {
    /// candump log or console capture
    input: PathBuf,

    /// Write readings here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only decode one sensor family (subaru, nissan, mercedes)
    #[arg(long)]
    vendor: Option<Vendor>,

    /// Emit JSON lines instead of text
    #[arg(long)]
    json: bool,

    /// Hex-dump every frame (text output only)
    #[arg(long)]
    raw: bool,

    /// Abort on the first malformed line
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    // Readings go to stdout, logs to stderr
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let mut source = CandumpReader::new(BufReader::new(file)).strict(args.strict);

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    let mut sink: Box<dyn ReadingSink> = if args.json {
        Box::new(JsonSink::new(out))
    } else {
        Box::new(TextSink::new(out).hex_dump(args.raw))
    };

    let mut dispatcher = Dispatcher::with_filter(args.vendor);
    run(&mut source, &mut dispatcher, sink.as_mut())
        .with_context(|| format!("Failed to decode {}", args.input.display()))?;

    info!("Decoded {}: {}", args.input.display(), dispatcher.stats());
    if source.skipped() > 0 {
        info!("{} lines skipped", source.skipped());
    }
    if let Some(path) = &args.output {
        info!("Wrote {}", path.display());
    }

    Ok(())
}
