use crate::error::ExtractorError;
use serde_json::Value;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

/// Marks the end of one response in `-stay_open` mode.
const SENTINEL: &str = "{ready}\n";

/// Group-qualified tag name (e.g. "EXIF:DateTimeOriginal") to value.
pub type Metadata = HashMap<String, Value>;

pub trait MetadataSource {
    fn get_metadata(&mut self, path: &Path) -> Result<Metadata, ExtractorError>;
}

/// A single exiftool process kept resident for the whole run.
///
/// Commands are read one argument per line from stdin. Dropping the client
/// tells the worker to leave `-stay_open` mode.
pub struct ExifTool {
    child: Child,
    stdin: ChildStdin,
    stdout: ChildStdout,
}

impl ExifTool {
    pub fn start(executable: &Path) -> Result<Self, ExtractorError> {
        Self::spawn(Command::new(executable)).map_err(|source| ExtractorError::Spawn {
            executable: executable.to_path_buf(),
            source,
        })
    }

    fn spawn(mut command: Command) -> std::io::Result<Self> {
        let mut child = command
            .args(["-stay_open", "True", "-@", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()?;

        // Both are Some since they were requested as pipes above.
        let stdin = child.stdin.take().ok_or(ErrorKind::BrokenPipe)?;
        let stdout = child.stdout.take().ok_or(ErrorKind::BrokenPipe)?;
        log::debug!("Started exiftool (pid {})", child.id());

        Ok(Self {
            child,
            stdin,
            stdout,
        })
    }

    /// Sends one command and returns its output with the sentinel removed.
    pub fn execute<I, S>(&mut self, args: I) -> Result<String, ExtractorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        if self.child.try_wait()?.is_some() {
            return Err(ExtractorError::NotRunning);
        }

        let mut command = Vec::new();
        for arg in args {
            command.extend_from_slice(arg.as_ref().as_encoded_bytes());
            command.push(b'\n');
        }
        command.extend_from_slice(b"-execute\n");
        self.stdin.write_all(&command)?;
        self.stdin.flush()?;

        let output = read_response(&mut self.stdout)?;
        log::trace!("exiftool output:\n{}", output);
        Ok(output)
    }
}

impl MetadataSource for ExifTool {
    fn get_metadata(&mut self, path: &Path) -> Result<Metadata, ExtractorError> {
        // Arguments are newline-delimited; a line break would split the path
        // into extra commands.
        let bytes = path.as_os_str().as_encoded_bytes();
        if bytes.contains(&b'\n') || bytes.contains(&b'\r') {
            return Err(ExtractorError::LineBreakInPath(path.to_path_buf()));
        }

        let output = self.execute([
            OsStr::new("-G"),
            OsStr::new("-j"),
            OsStr::new("-n"),
            path.as_os_str(),
        ])?;

        // exiftool prints nothing on stdout for files it cannot read.
        if output.trim().is_empty() {
            return Err(ExtractorError::Empty(path.to_path_buf()));
        }

        let records: Vec<Metadata> = serde_json::from_str(&output)?;
        records
            .into_iter()
            .next()
            .ok_or_else(|| ExtractorError::Empty(path.to_path_buf()))
    }
}

impl Drop for ExifTool {
    fn drop(&mut self) {
        let stop = self
            .stdin
            .write_all(b"-stay_open\nFalse\n")
            .and_then(|()| self.stdin.flush());
        if let Err(e) = stop {
            log::debug!("Could not stop exiftool: {}", e);
        }
    }
}

/// Reads from `reader` until the accumulated output ends with the sentinel.
fn read_response<R: Read>(reader: &mut R) -> Result<String, ExtractorError> {
    let mut output = Vec::new();
    let mut buffer = [0u8; 4096];

    while !output.ends_with(SENTINEL.as_bytes()) {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => return Err(ExtractorError::Closed),
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        output.extend_from_slice(&buffer[..bytes_read]);
    }

    output.truncate(output.len() - SENTINEL.len());
    Ok(String::from_utf8(output)?)
}
