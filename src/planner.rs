use crate::config::Config;
use crate::date;
use crate::error::Error;
use crate::exiftool::MetadataSource;
use crate::transfer;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// What happened to one source file. Paths are destinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Copied(PathBuf),
    Moved(PathBuf),
    /// Move mode, destination has the same content: source removed.
    DuplicateRemoved(PathBuf),
    /// Move mode, destination has different content: source kept.
    ConflictKept(PathBuf),
    /// Copy mode, destination already taken: nothing done.
    AlreadyExists(PathBuf),
    /// Source already is its own destination.
    InPlace(PathBuf),
    NoDate,
    TooRecent,
    Excluded,
}

pub struct Planner<S> {
    config: Config,
    source: S,
}

impl<S: MetadataSource> Planner<S> {
    pub fn new(config: Config, source: S) -> Self {
        Self { config, source }
    }

    pub fn process_file(&mut self, path: &Path) -> Result<Placement, Error> {
        if !self.config.allows(path) {
            log::debug!("Skipping {} (extension not selected)", path.display());
            return Ok(Placement::Excluded);
        }

        let file_name = path
            .file_name()
            .ok_or_else(|| Error::io("read", path)(ErrorKind::InvalidInput.into()))?;
        log::info!("Processing {}", file_name.to_string_lossy());

        let too_recent = transfer::is_too_recent(path, self.config.min_age, SystemTime::now())
            .map_err(Error::io("read", path))?;
        if too_recent {
            log::warn!("  File is too new. Skipping.");
            return Ok(Placement::TooRecent);
        }

        let metadata = self.source.get_metadata(path)?;
        let resolved = match date::resolve_date(&metadata) {
            Ok(resolved) => resolved,
            Err(e) => {
                log::error!(
                    "Unable to find valid date metadata in {}: {}",
                    path.display(),
                    e
                );
                return Ok(Placement::NoDate);
            }
        };
        log::debug!("  Using {} = {}", resolved.field, resolved.datetime);

        let dest_dir = self.config.destination_dir(&resolved.datetime);
        if !self.config.dry_run && !dest_dir.exists() {
            fs::create_dir_all(&dest_dir).map_err(Error::io("create", &dest_dir))?;
        }

        let destination = dest_dir.join(file_name);
        if destination.exists() {
            return self.resolve_collision(path, destination);
        }

        self.place(path, destination)
    }

    fn resolve_collision(&self, path: &Path, destination: PathBuf) -> Result<Placement, Error> {
        if same_file(path, &destination)? {
            log::info!("  Already in place: {}", destination.display());
            return Ok(Placement::InPlace(destination));
        }

        log::warn!(
            "  Destination file already exists: {}",
            destination.display()
        );
        if !self.config.move_files {
            return Ok(Placement::AlreadyExists(destination));
        }

        let source_hash = transfer::hash_file(path).map_err(Error::io("read", path))?;
        let existing_hash =
            transfer::hash_file(&destination).map_err(Error::io("read", &destination))?;
        log::debug!(
            "  sha256 {} (source) / {} (existing)",
            transfer::hex(&source_hash),
            transfer::hex(&existing_hash)
        );

        if source_hash == existing_hash {
            log::info!("  Files are identical, removing source");
            if !self.config.dry_run {
                fs::remove_file(path).map_err(Error::io("remove", path))?;
            }
            Ok(Placement::DuplicateRemoved(destination))
        } else {
            log::warn!("  Files are NOT identical, keeping source.");
            Ok(Placement::ConflictKept(destination))
        }
    }

    fn place(&self, path: &Path, destination: PathBuf) -> Result<Placement, Error> {
        let prefix = if self.config.dry_run { "[dry-run] " } else { "" };

        if self.config.move_files {
            log::info!(
                "  {}MOVING {} -> {}",
                prefix,
                path.display(),
                destination.display()
            );
            if !self.config.dry_run {
                transfer::move_file(path, &destination).map_err(Error::io("move", path))?;
            }
            Ok(Placement::Moved(destination))
        } else {
            log::info!(
                "  {}COPYING {} -> {}",
                prefix,
                path.display(),
                destination.display()
            );
            if !self.config.dry_run {
                transfer::copy_preserving(path, &destination).map_err(Error::io("copy", path))?;
            }
            Ok(Placement::Copied(destination))
        }
    }
}

fn same_file(a: &Path, b: &Path) -> Result<bool, Error> {
    let a = fs::canonicalize(a).map_err(Error::io("resolve", a))?;
    let b = fs::canonicalize(b).map_err(Error::io("resolve", b))?;
    Ok(a == b)
}

/// Tally of a run, reported at the end.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub copied: usize,
    pub moved: usize,
    pub duplicates_removed: usize,
    pub conflicts: usize,
    pub already_present: usize,
    pub no_date: usize,
    pub too_recent: usize,
    pub excluded: usize,
    pub failed: usize,
}

impl Summary {
    pub fn record(&mut self, placement: &Placement) {
        let counter = match placement {
            Placement::Copied(_) => &mut self.copied,
            Placement::Moved(_) => &mut self.moved,
            Placement::DuplicateRemoved(_) => &mut self.duplicates_removed,
            Placement::ConflictKept(_) => &mut self.conflicts,
            Placement::AlreadyExists(_) | Placement::InPlace(_) => &mut self.already_present,
            Placement::NoDate => &mut self.no_date,
            Placement::TooRecent => &mut self.too_recent,
            Placement::Excluded => &mut self.excluded,
        };
        *counter += 1;
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} copied, {} moved, {} duplicates removed, {} conflicts, {} already present, \
             {} without date, {} too recent, {} excluded, {} failed",
            self.copied,
            self.moved,
            self.duplicates_removed,
            self.conflicts,
            self.already_present,
            self.no_date,
            self.too_recent,
            self.excluded,
            self.failed
        )
    }
}
