use clap::Parser;
use std::path::PathBuf;

/// Printed when no document is given.
pub const GUIDANCE: &str = "Please specify a spreadsheet file (.xlsx) to extract images from.";

#[derive(Parser, Debug)]
#[command(name = "xlmedia")]
#[command(version)]
#[command(about = "Extract embedded images and media from xlsx spreadsheets", long_about = None)]
#[command(after_help = "Examples:\n  \
  xlmedia book.xlsx               extract into ~/Desktop/ExcelImages_<millis>/\n  \
  xlmedia -d exports book.xlsx    extract into exports/ExcelImages_<millis>/\n  \
  xlmedia -l book.xlsx            list the media stored in book.xlsx")]
pub struct Cli {
    /// Spreadsheet document (.xlsx, .xlsm, ...)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Create the output folder inside DIR instead of the desktop
    #[arg(short = 'd', long = "output-dir", value_name = "DIR", env = "XLMEDIA_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// List media entries without extracting
    #[arg(short = 'l')]
    pub list: bool,

    /// Junk paths (do not make sub-folders)
    #[arg(short = 'j')]
    pub junk_paths: bool,

    /// Quiet mode, print only the output folder
    #[arg(short = 'q')]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
