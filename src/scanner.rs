use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Expands each source into the files to process, in argument order.
/// Directories are walked recursively; missing paths are reported and skipped.
pub fn scan_sources(sources: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for source in sources {
        if source.is_file() {
            match std::path::absolute(source) {
                Ok(path) => files.push(path),
                Err(e) => log::warn!("Cannot resolve {}: {}", source.display(), e),
            }
        } else if source.is_dir() {
            files.extend(walk(source));
        } else {
            log::warn!("Source does not exist: {}", source.display());
        }
    }

    files
}

fn walk(dir: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Cannot read {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
}
