//! ZIP archive parsing and extraction.
//!
//! Office documents such as `.xlsx` workbooks are plain ZIP archives, so
//! this module reads them directly: no temporary copy, no renaming to
//! `.zip`.
//!
//! ## Architecture
//!
//! - [`structures`]: Data structures representing ZIP format elements (EOCD, file headers, etc.)
//! - [`parser`]: Low-level parsing of ZIP structures from raw bytes
//! - [`extractor`]: Streaming decoder that writes entry contents out
//!
//! ## Supported Features
//!
//! - Standard ZIP format (PKZIP APPNOTE 6.3.x compatible)
//! - ZIP64 extensions for files > 4GB
//! - STORED (no compression) and DEFLATE compression methods
//! - CRC-32 verification of every extracted entry
//!
//! ## Limitations
//!
//! - Encrypted entries are rejected
//! - No multi-disk archive support
//! - No BZIP2, LZMA, or other compression methods

mod extractor;
mod parser;
mod structures;

#[cfg(test)]
pub(crate) mod fixtures;

pub use extractor::ZipExtractor;
pub use parser::ZipParser;
pub use structures::*;
