//! Filesystem utilities for code generation

use std::fs;
use std::io;
use std::path::Path;

/// Write content to a file, creating parent directories if needed
pub fn write_file<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> io::Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, contents)
}

/// Write content only when no file exists at `path`.
///
/// Returns `Ok(false)` without touching the file when it already exists.
pub fn write_new_file<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> io::Result<bool> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(false);
    }
    write_file(path, contents)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_file_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a").join("b").join("X.java");

        write_file(&path, "class X {}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "class X {}");
    }

    #[test]
    fn test_write_new_file_keeps_existing_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("XDao.xml");

        assert!(write_new_file(&path, "first").unwrap());
        assert!(!write_new_file(&path, "second").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "first");
    }
}
