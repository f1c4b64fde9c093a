//! Main entry point for the xlmedia CLI application.
//!
//! Extracts the media embedded in one spreadsheet document into a new
//! timestamped folder and prints where it went.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::path::Path;
use tracing_subscriber::EnvFilter;

use xlmedia::cli::GUIDANCE;
use xlmedia::{Cli, ExtractConfig, MediaExtractor};

/// Application entry point.
///
/// Runs on a single-threaded runtime: every step is awaited in order and
/// nothing is spawned.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli);

    // No document given: show how to use the tool and do nothing else
    let Some(file) = cli.file.as_deref() else {
        println!("{}\n\n{}", GUIDANCE, Cli::command().render_usage());
        return Ok(());
    };

    let config = ExtractConfig::resolve(cli.output_dir.as_deref())
        .context("failed to determine the output location")?
        .with_junk_paths(cli.junk_paths);
    let extractor = MediaExtractor::new(config);

    if cli.list {
        return list_media(&extractor, file).await;
    }

    let quiet = cli.is_quiet();
    let report = extractor
        .extract_with(file, |extracted| {
            if !quiet {
                println!("  extracting: {}", extracted.name);
            }
        })
        .await
        .with_context(|| format!("failed to extract media from {}", file.display()))?;

    if !quiet {
        println!(
            "Extracted {} file(s), {} in total.",
            report.files.len(),
            format_size(report.total_bytes)
        );
    }
    println!("{}", report.output_dir.display());

    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the level picked by `-v`.
fn init_logging(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Print the media entries of a document in a table, like `unzip -v`.
async fn list_media(extractor: &MediaExtractor, file: &Path) -> Result<()> {
    let media = extractor
        .list(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;

    println!("{:>10}  {:>10}  {:>5}  Name", "Length", "Date", "Time");
    println!("{}", "-".repeat(50));

    let mut total = 0u64;
    let mut count = 0usize;
    for entry in media.iter().filter(|m| !m.entry.is_directory) {
        let (year, month, day) = entry.entry.mod_date();
        let (hour, minute, _second) = entry.entry.mod_time();
        println!(
            "{:>10}  {:04}-{:02}-{:02}  {:02}:{:02}  {}",
            entry.size(),
            year,
            month,
            day,
            hour,
            minute,
            entry.name
        );
        total += entry.size();
        count += 1;
    }

    println!("{}", "-".repeat(50));
    println!("{:>10}  {:>17}  {} files", total, "", count);

    Ok(())
}

/// Format a byte size into a human-readable string.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_size(500), "500 bytes");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
