//! # xlmedia
//!
//! Extract the images and other media embedded in spreadsheet documents.
//!
//! An `.xlsx` file is a ZIP archive; the pictures pasted into a workbook
//! live under `xl/media/`. This crate reads the archive in place and copies
//! those entries into a new folder named `ExcelImages_<milliseconds>`,
//! by default on the user's desktop.
//!
//! ## Features
//!
//! - Reads the document directly, without temporary copies
//! - Support for ZIP64 format (archives larger than 4GB)
//! - Support for STORED (uncompressed) and DEFLATE compression methods
//! - CRC-32 verification of every extracted file
//! - Refuses entry names that would escape the output folder
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use xlmedia::{ExtractConfig, MediaExtractor};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let extractor = MediaExtractor::new(ExtractConfig::new("/tmp/exports"));
//!     let report = extractor.extract(Path::new("book.xlsx")).await?;
//!
//!     for file in &report.files {
//!         println!("{} ({} bytes)", file.name, file.size);
//!     }
//!     println!("{}", report.output_dir.display());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod media;
pub mod zip;

pub use cli::Cli;
pub use config::ExtractConfig;
pub use error::{Error, Result};
pub use io::{LocalFileReader, ReadAt};
pub use media::{ExtractedFile, ExtractionReport, MEDIA_PREFIX, MediaEntry, MediaExtractor};
pub use crate::zip::{ZipExtractor, ZipFileEntry};
