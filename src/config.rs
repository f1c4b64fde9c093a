use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Folder name prefix of every output directory; the millisecond timestamp follows.
pub const DEFAULT_FOLDER_PREFIX: &str = "ExcelImages_";

/// Directory under the home directory that receives output folders.
pub const DESKTOP_DIR: &str = "Desktop";

/// Settings for one extraction run.
///
/// Nothing in here is looked up lazily: the home directory is read once by
/// [`ExtractConfig::from_home`], and tests build a config around a scratch
/// directory with [`ExtractConfig::new`].
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Parent directory of the per-run output folder.
    pub output_base: PathBuf,
    pub folder_prefix: String,
    /// Write every media file at the top level under its base name.
    pub junk_paths: bool,
}

impl ExtractConfig {
    pub fn new(output_base: impl Into<PathBuf>) -> Self {
        Self {
            output_base: output_base.into(),
            folder_prefix: DEFAULT_FOLDER_PREFIX.to_string(),
            junk_paths: false,
        }
    }

    /// Output under `<home>/Desktop`.
    pub fn from_home() -> Result<Self> {
        let home = home::home_dir().ok_or(Error::HomeDirUnavailable)?;
        Ok(Self::new(home.join(DESKTOP_DIR)))
    }

    /// Use `base` when given, `<home>/Desktop` otherwise.
    pub fn resolve(base: Option<&Path>) -> Result<Self> {
        match base {
            Some(base) => Ok(Self::new(base)),
            None => Self::from_home(),
        }
    }

    pub fn with_folder_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.folder_prefix = prefix.into();
        self
    }

    pub fn with_junk_paths(mut self, junk_paths: bool) -> Self {
        self.junk_paths = junk_paths;
        self
    }

    /// Path of the output folder for a run started at `timestamp_millis`.
    pub fn output_dir_for(&self, timestamp_millis: i64) -> PathBuf {
        self.output_base
            .join(format!("{}{}", self.folder_prefix, timestamp_millis))
    }
}
