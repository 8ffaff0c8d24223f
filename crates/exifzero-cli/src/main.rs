// File: crates/exifzero-cli/src/main.rs

use anyhow::{Context, Result};
use clap::Parser;
use exifzero_core::{
    DEFAULT_INFLATE_LIMIT, Format, ScrubError, ScrubOptions, locate_metadata, remove_metadata_with,
    scrub,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// A tool to zero out EXIF metadata in JPEG and PNG files without re-encoding them.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Show where the EXIF metadata of a file is stored
    Check {
        /// The path to the file
        #[arg(required = true)]
        file_path: PathBuf,

        #[command(flatten)]
        locate: LocateArgs,
    },
    /// Remove EXIF metadata from a file
    Clean {
        /// The path to the file
        #[arg(required = true)]
        file_path: PathBuf,

        /// Overwrite the file in-place
        #[arg(short, long, conflicts_with = "output")]
        in_place: bool,

        /// Where to write the cleaned file (default: <name>.clean.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        locate: LocateArgs,
    },
}

#[derive(clap::Args, Debug)]
struct LocateArgs {
    /// Ignore legacy "Raw profile type exif" text chunks in PNG files
    #[arg(long)]
    no_legacy_png: bool,

    /// Maximum inflated size of a compressed PNG text profile, in bytes
    #[arg(long, default_value_t = DEFAULT_INFLATE_LIMIT)]
    inflate_limit: usize,
}

impl LocateArgs {
    fn options(&self) -> ScrubOptions {
        ScrubOptions::default()
            .with_legacy_png_profiles(!self.no_legacy_png)
            .with_inflate_limit(self.inflate_limit)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Check { file_path, locate } => {
            let file_bytes = tokio::fs::read(&file_path)
                .await
                .with_context(|| format!("Failed to read file: {}", file_path.display()))?;

            let format = Format::detect(&file_bytes);
            match locate_metadata(&file_bytes, &locate.options()) {
                Ok(segment) => {
                    println!("{}: {format}", file_path.display());
                    match scrub::find_first(&file_bytes, segment.bytes()) {
                        Some(span) => println!(
                            "  EXIF in {} at offset {}: {} bytes",
                            segment.source(),
                            span.start,
                            segment.len()
                        ),
                        None => {
                            return Err(report(
                                ScrubError::SegmentNotFound { len: segment.len() },
                                &file_path,
                            ));
                        }
                    }
                }
                Err(ScrubError::NoMetadata) => {
                    println!("{}: {format}, no EXIF metadata found.", file_path.display());
                }
                Err(err) => return Err(report(err, &file_path)),
            }
        }
        Commands::Clean {
            file_path,
            in_place,
            output,
            locate,
        } => {
            let file_bytes = tokio::fs::read(&file_path)
                .await
                .with_context(|| format!("Failed to read file: {}", file_path.display()))?;

            let cleaned = match remove_metadata_with(&file_bytes, &locate.options()) {
                Ok(cleaned) => cleaned,
                Err(ScrubError::NoMetadata) => {
                    println!("No EXIF metadata found to remove from {}.", file_path.display());
                    return Ok(());
                }
                Err(err) => return Err(report(err, &file_path)),
            };

            let output_path = output_path(&file_path, in_place, output);

            tokio::fs::write(&output_path, cleaned)
                .await
                .with_context(|| {
                    format!("Failed to write cleaned file to {}", output_path.display())
                })?;

            println!("Successfully removed EXIF metadata.");
            println!("Cleaned file saved to: {}", output_path.display());
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Attaches the file name to a scrub error, logging contract violations.
fn report(err: ScrubError, file_path: &Path) -> anyhow::Error {
    if err.is_bug() {
        tracing::error!(file = %file_path.display(), %err, "parser reported metadata that is not in the file");
    }
    anyhow::Error::new(err).context(format!("Failed to process {}", file_path.display()))
}

fn output_path(file_path: &Path, in_place: bool, output: Option<PathBuf>) -> PathBuf {
    if in_place {
        return file_path.to_path_buf();
    }
    if let Some(output) = output {
        return output;
    }

    let original_name = file_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("file");

    let extension = file_path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("bin");
    let new_file_name = format!("{}.clean.{}", original_name, extension);
    file_path.with_file_name(new_file_name)
}
