//! Media extraction from spreadsheet documents.
//!
//! An `.xlsx` workbook stores every embedded picture, audio clip or other
//! media object as an archive entry below [`MEDIA_PREFIX`]. Extraction
//! copies those entries into a fresh, timestamped folder and leaves the
//! rest of the document alone.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::ExtractConfig;
use crate::error::{Error, Result};
use crate::io::{LocalFileReader, ReadAt};
use crate::zip::{ZipExtractor, ZipFileEntry};

/// Archive folder holding embedded media in spreadsheet documents.
pub const MEDIA_PREFIX: &str = "xl/media/";

/// An archive entry below [`MEDIA_PREFIX`].
#[derive(Debug, Clone)]
pub struct MediaEntry {
    /// Entry name with the prefix stripped, e.g. `image1.png`.
    pub name: String,
    pub entry: ZipFileEntry,
}

impl MediaEntry {
    /// Returns `None` for entries outside the media folder and for the
    /// folder entry itself.
    pub fn from_entry(entry: &ZipFileEntry) -> Option<Self> {
        let name = entry.file_name.strip_prefix(MEDIA_PREFIX)?;
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            entry: entry.clone(),
        })
    }

    pub fn size(&self) -> u64 {
        self.entry.uncompressed_size
    }

    /// Path of this entry relative to the output folder.
    ///
    /// Names that are absolute or climb out with `..` are refused. With
    /// `junk_paths` only the final component is kept.
    pub fn relative_path(&self, junk_paths: bool) -> Result<PathBuf> {
        let unsafe_path = || Error::UnsafeEntryPath {
            entry: self.entry.file_name.clone(),
        };

        let mut relative = PathBuf::new();
        for component in Path::new(&self.name).components() {
            match component {
                Component::Normal(part) => relative.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(unsafe_path());
                }
            }
        }

        if junk_paths {
            relative = relative.file_name().map(PathBuf::from).unwrap_or_default();
        }
        if relative.as_os_str().is_empty() {
            return Err(unsafe_path());
        }
        Ok(relative)
    }
}

/// Select the media entries of an archive listing, in archive order.
pub fn media_entries(entries: &[ZipFileEntry]) -> Vec<MediaEntry> {
    entries.iter().filter_map(MediaEntry::from_entry).collect()
}

/// A media file written to disk.
#[derive(Debug, Clone)]
pub struct ExtractedFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

/// Outcome of a successful extraction run.
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    pub output_dir: PathBuf,
    pub files: Vec<ExtractedFile>,
    pub total_bytes: u64,
}

/// Create the output folder for a run started at `timestamp_millis`.
///
/// The base directory is created if needed; the folder itself must be new.
pub fn create_output_dir(config: &ExtractConfig, timestamp_millis: i64) -> Result<PathBuf> {
    std::fs::create_dir_all(&config.output_base)
        .map_err(|e| Error::io(&config.output_base, e))?;

    let output_dir = config.output_dir_for(timestamp_millis);
    match std::fs::create_dir(&output_dir) {
        Ok(()) => Ok(output_dir),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            Err(Error::OutputExists { path: output_dir })
        }
        Err(e) => Err(Error::io(&output_dir, e)),
    }
}

/// Copies the media of one spreadsheet document into a new folder.
pub struct MediaExtractor {
    config: ExtractConfig,
}

impl MediaExtractor {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    /// List the media entries of `source` without writing anything.
    pub async fn list(&self, source: &Path) -> Result<Vec<MediaEntry>> {
        let extractor = open_archive(source)?;
        let entries = extractor.list_files().await?;
        Ok(media_entries(&entries))
    }

    /// Extract every media entry of `source` into a new output folder.
    pub async fn extract(&self, source: &Path) -> Result<ExtractionReport> {
        self.extract_with(source, |_| {}).await
    }

    /// Like [`extract`](Self::extract), calling `on_file` after each file is written.
    ///
    /// The source is opened and its central directory read before the
    /// output folder is created, so a missing or malformed document leaves
    /// nothing behind. A failure after that point leaves the folder
    /// partially filled and is returned as [`Error::Partial`] naming it.
    pub async fn extract_with<F>(&self, source: &Path, mut on_file: F) -> Result<ExtractionReport>
    where
        F: FnMut(&ExtractedFile),
    {
        let extractor = open_archive(source)?;
        let entries = extractor.list_files().await?;

        let mut plan = Vec::new();
        for media in media_entries(&entries) {
            let relative = media.relative_path(self.config.junk_paths)?;
            plan.push((media, relative));
        }
        debug!(
            source = %source.display(),
            entries = entries.len(),
            media = plan.len(),
            "read central directory"
        );

        let output_dir = create_output_dir(&self.config, Utc::now().timestamp_millis())?;
        info!(output_dir = %output_dir.display(), "extracting media");

        let files = match self
            .write_media(&extractor, plan, &output_dir, &mut on_file)
            .await
        {
            Ok(files) => files,
            Err(err) => {
                warn!(output_dir = %output_dir.display(), "extraction failed, output is incomplete");
                return Err(Error::Partial {
                    output_dir,
                    source: Box::new(err),
                });
            }
        };
        let total_bytes: u64 = files.iter().map(|f| f.size).sum();

        if files.is_empty() {
            warn!(source = %source.display(), "document contains no media under {}", MEDIA_PREFIX);
        }
        info!(files = files.len(), total_bytes, "extraction complete");

        Ok(ExtractionReport {
            output_dir,
            files,
            total_bytes,
        })
    }

    async fn write_media<F>(
        &self,
        extractor: &ZipExtractor<LocalFileReader>,
        plan: Vec<(MediaEntry, PathBuf)>,
        output_dir: &Path,
        on_file: &mut F,
    ) -> Result<Vec<ExtractedFile>>
    where
        F: FnMut(&ExtractedFile),
    {
        let mut files = Vec::with_capacity(plan.len());

        for (media, relative) in plan {
            let path = output_dir.join(&relative);

            if media.entry.is_directory {
                if !self.config.junk_paths {
                    std::fs::create_dir_all(&path).map_err(|e| Error::io(&path, e))?;
                }
                continue;
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }

            let size = extractor.extract_to_file(&media.entry, &path).await?;
            debug!(entry = %media.entry.file_name, path = %path.display(), size, "extracted");

            let file = ExtractedFile {
                name: media.name,
                path,
                size,
            };
            on_file(&file);
            files.push(file);
        }

        Ok(files)
    }
}

fn open_archive(source: &Path) -> Result<ZipExtractor<LocalFileReader>> {
    let reader = LocalFileReader::new(source)?;
    debug!(source = %reader.path().display(), size = reader.size(), "opened document");
    Ok(ZipExtractor::new(Arc::new(reader)))
}
