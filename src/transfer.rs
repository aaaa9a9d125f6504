use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, ErrorKind, Read};
use std::path::Path;
use std::time::{Duration, SystemTime};

const BUFFER_SIZE: usize = 256 * 1024; // 256 KB

pub type FileDigest = [u8; 32];

pub fn hash_file(path: &Path) -> io::Result<FileDigest> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let mut digest = FileDigest::default();
    digest.copy_from_slice(&hasher.finalize());
    Ok(digest)
}

pub fn hex(digest: &FileDigest) -> String {
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Copies contents and permissions, then carries the modified time over.
pub fn copy_preserving(src: &Path, dest: &Path) -> io::Result<()> {
    fs::copy(src, dest)?;

    let mtime = fs::metadata(src)?.modified()?;
    // The copied permissions may be read-only. On Unix owning the file is
    // enough to set its times, so a read handle will do.
    #[cfg(unix)]
    let file = fs::File::open(dest)?;
    #[cfg(not(unix))]
    let file = fs::OpenOptions::new().write(true).open(dest)?;
    file.set_modified(mtime)?;
    Ok(())
}

/// Renames, falling back to copy + remove across filesystems.
pub fn move_file(src: &Path, dest: &Path) -> io::Result<()> {
    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            copy_preserving(src, dest)?;
            fs::remove_file(src)
        }
        Err(e) => Err(e),
    }
}

/// True when `path` was modified less than `min_age` before `now` (or in the future).
pub fn is_too_recent(path: &Path, min_age: Duration, now: SystemTime) -> io::Result<bool> {
    let mtime = fs::metadata(path)?.modified()?;
    Ok(match now.duration_since(mtime) {
        Ok(age) => age < min_age,
        Err(_) => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn age(path: &Path, secs: u64) {
        let file = fs::OpenOptions::new().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(secs))
            .unwrap();
    }

    #[test]
    fn test_hash_file() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        let c = dir.path().join("c");
        fs::write(&a, b"same bytes").unwrap();
        fs::write(&b, b"same bytes").unwrap();
        fs::write(&c, b"other bytes").unwrap();

        assert_eq!(hash_file(&a).unwrap(), hash_file(&b).unwrap());
        assert_ne!(hash_file(&a).unwrap(), hash_file(&c).unwrap());
        assert!(hash_file(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_hex_of_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty");
        fs::write(&empty, b"").unwrap();
        assert_eq!(
            hex(&hash_file(&empty).unwrap()),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_copy_preserving_keeps_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.jpg");
        let dest = dir.path().join("dest.jpg");
        fs::write(&src, b"pixels").unwrap();
        age(&src, 3600);

        copy_preserving(&src, &dest).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"pixels");
        assert!(src.exists());
        assert_eq!(
            fs::metadata(&src).unwrap().modified().unwrap(),
            fs::metadata(&dest).unwrap().modified().unwrap()
        );
    }

    #[test]
    fn test_move_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.jpg");
        let dest = dir.path().join("dest.jpg");
        fs::write(&src, b"pixels").unwrap();

        move_file(&src, &dest).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"pixels");
    }

    #[test]
    fn test_is_too_recent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.jpg");
        fs::write(&path, b"x").unwrap();
        let min_age = Duration::from_secs(60);

        age(&path, 10);
        assert!(is_too_recent(&path, min_age, SystemTime::now()).unwrap());

        age(&path, 120);
        assert!(!is_too_recent(&path, min_age, SystemTime::now()).unwrap());

        let past = SystemTime::now() - Duration::from_secs(3600);
        assert!(is_too_recent(&path, min_age, past).unwrap());
    }
}
