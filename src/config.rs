use crate::cli::Args;
use chrono::{Datelike, NaiveDateTime};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub destination: PathBuf,
    pub move_files: bool,
    pub dry_run: bool,
    /// Lower-case extensions without the leading dot. `None` allows everything.
    pub extensions: Option<Vec<String>>,
    pub min_age: Duration,
}

impl Config {
    pub fn from_args(args: &Args) -> Self {
        Self {
            destination: args.destination.clone(),
            move_files: args.move_files,
            dry_run: args.dry_run,
            extensions: args
                .extensions
                .as_deref()
                .map(parse_extensions)
                .filter(|list| !list.is_empty()),
            min_age: Duration::from_secs(args.min_age),
        }
    }

    pub fn allows(&self, path: &Path) -> bool {
        let Some(allowed) = &self.extensions else {
            return true;
        };
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext {
            Some(ext) => allowed.contains(&ext),
            None => false,
        }
    }

    /// `<destination>/<YYYY>/<MM>`
    pub fn destination_dir(&self, datetime: &NaiveDateTime) -> PathBuf {
        self.destination
            .join(format!("{:04}", datetime.year()))
            .join(format!("{:02}", datetime.month()))
    }
}

/// "JPG, .heic,,mov" -> ["jpg", "heic", "mov"]
fn parse_extensions(list: &str) -> Vec<String> {
    list.split(',')
        .map(|e| e.trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}
