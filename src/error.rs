use std::io;
use std::path::PathBuf;

/// Failures talking to the exiftool worker. Only `Empty` and `LineBreakInPath`
/// leave the worker usable.
#[derive(thiserror::Error, Debug)]
pub enum ExtractorError {
    #[error("failed to start {executable}: {source}")]
    Spawn {
        executable: PathBuf,
        source: io::Error,
    },
    #[error("exiftool is not running")]
    NotRunning,
    #[error("exiftool closed its output before the response was complete")]
    Closed,
    #[error("exiftool pipe error: {0}")]
    Io(#[from] io::Error),
    #[error("exiftool output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("exiftool output is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("exiftool returned no metadata for {0}")]
    Empty(PathBuf),
    #[error("path cannot be sent to exiftool (contains a line break): {0:?}")]
    LineBreakInPath(PathBuf),
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DateError {
    #[error("no date field found")]
    NotFound,
    #[error("field {field} has unreadable date {value:?}")]
    Invalid { field: &'static str, value: String },
}

/// Errors raised while filing a single file.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Extractor(#[from] ExtractorError),
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        source: io::Error,
    },
}

impl Error {
    pub fn io(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Error {
        let path = path.into();
        move |source| Error::Io {
            action,
            path,
            source,
        }
    }

    /// Worker failures end the run; everything else only affects one file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Extractor(e)
                if !matches!(e, ExtractorError::Empty(_) | ExtractorError::LineBreakInPath(_))
        )
    }
}
