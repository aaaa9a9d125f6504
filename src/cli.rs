use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "exifsort")]
#[command(about = "Copy or move media files into YEAR/MONTH folders by capture date")]
pub struct Args {
    /// Files or directories to scan (directories are walked recursively)
    #[arg(required = true, num_args = 1..)]
    pub sources: Vec<PathBuf>,

    /// Root directory where YEAR/MONTH folders will be created
    pub destination: PathBuf,

    /// Move files instead of copying them
    #[arg(short, long = "move", default_value_t = false)]
    pub move_files: bool,

    /// Show what would be done without touching any file
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Only handle these extensions (comma-separated, e.g. "jpg,heic,mov")
    #[arg(short, long)]
    pub extensions: Option<String>,

    /// Path to the exiftool executable
    #[arg(long, default_value = "exiftool")]
    pub exiftool: PathBuf,

    /// Skip files modified less than this many seconds ago
    #[arg(long, default_value_t = 60)]
    pub min_age: u64,

    /// Verbosity level. Max: 2.
    #[arg(short, action = ArgAction::Count)]
    pub verbose: u8,
}
