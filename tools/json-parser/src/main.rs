use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use exifnotes_domain::{CommandOptions, ExiftoolPipeline, FileExtension, PersonalData, RollRecord};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Print exiftool commands that tag scanned frames from an Exif Notes roll export"
)]
struct Args {
    /// Roll exported from Exif Notes as JSON
    #[arg(default_value = "exifnotes.json")]
    input: PathBuf,
    /// Extension of the scanned image files (jpg, jpeg, tif, tiff)
    #[arg(short = 'x', long = "ext", default_value = "tif")]
    extension: FileExtension,
    /// Artist name written to every frame
    #[arg(short, long)]
    artist: Option<String>,
    /// Copyright string written to every frame
    #[arg(short, long)]
    copyright: Option<String>,
    /// Make exiftool verbose and log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let record = load_record(&args.input)?;
    let pipeline = ExiftoolPipeline::new(
        CommandOptions {
            verbose: args.verbose,
            extension: args.extension,
        },
        PersonalData {
            artist: args.artist,
            copyright: args.copyright,
        },
    );
    let script = pipeline.render(&record)?;
    write_script(&mut io::stdout().lock(), &script)
}

fn write_script(out: &mut impl Write, script: &str) -> Result<()> {
    out.write_all(script.as_bytes())
        .and_then(|()| out.flush())
        .context("failed to write commands to stdout")
}

fn load_record(path: &Path) -> Result<RollRecord> {
    if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
        bail!("input file {} should end with \".json\"", path.display());
    }
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let value: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to decode {}", path.display()))?;
    if value.is_null() {
        bail!("empty input file: {}", path.display());
    }
    let record = RollRecord::from_value(value)?;
    info!(frames = record.frames.len(), path = %path.display(), "loaded roll");
    Ok(record)
}
