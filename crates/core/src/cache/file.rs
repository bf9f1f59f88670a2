//! On-disk format for the resolution cache.
//!
//! The cache is a single JSON document. Saves write a sibling temp file and
//! rename it over the target, so an interrupted write leaves the previous
//! file intact on filesystems with atomic rename.

use super::entry::CacheEntry;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Current on-disk format version.
pub const FORMAT_VERSION: u32 = 1;

/// Serialized cache document.
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheFile {
    pub version: u32,
    #[serde(default)]
    pub entries: Vec<CacheEntry>,
}

/// Read all entries from `path`.
///
/// A missing file, an unreadable file, an unknown format version, or a
/// malformed document all yield an empty list.
pub fn read_entries(path: &Path) -> Vec<CacheEntry> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no cache file, starting empty");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "failed to read cache file, starting empty: {}", e);
            return Vec::new();
        }
    };

    match serde_json::from_slice::<CacheFile>(&bytes) {
        Ok(file) if file.version == FORMAT_VERSION => file.entries,
        Ok(file) => {
            tracing::warn!(path = %path.display(), version = file.version, "unsupported cache version, starting empty");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "malformed cache file, starting empty: {}", e);
            Vec::new()
        }
    }
}

/// Write `entries` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns `Error::CacheIo` if the directory, temp file, or rename fails.
pub fn write_entries(path: &Path, entries: Vec<CacheEntry>) -> Result<(), Error> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::CacheIo(format!("{}: {}", parent.display(), e)))?;
    }

    let json = serde_json::to_vec_pretty(&CacheFile { version: FORMAT_VERSION, entries })?;

    let tmp = tmp_path(path);
    fs::write(&tmp, json).map_err(|e| Error::CacheIo(format!("{}: {}", tmp.display(), e)))?;

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(Error::CacheIo(format!("{}: {}", path.display(), e)));
    }

    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_else(|| OsString::from("cache"));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_entries(&dir.path().join("absent.json")).is_empty());
    }

    #[test]
    fn test_read_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, b"{ not json").unwrap();
        assert!(read_entries(&path).is_empty());
    }

    #[test]
    fn test_read_wrong_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, br#"{"0xabc": "alice.eth"}"#).unwrap();
        assert!(read_entries(&path).is_empty());
    }

    #[test]
    fn test_read_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, br#"{"version": 99, "entries": []}"#).unwrap();
        assert!(read_entries(&path).is_empty());
    }

    #[test]
    fn test_write_creates_parents_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");
        let entries = vec![CacheEntry::new("0xabc", Some("alice.eth".into()), Utc::now())];

        write_entries(&path, entries.clone()).unwrap();

        assert_eq!(read_entries(&path), entries);
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn test_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        write_entries(&path, vec![CacheEntry::new("0xabc", None, Utc::now())]).unwrap();
        write_entries(&path, Vec::new()).unwrap();
        assert!(read_entries(&path).is_empty());
    }

    #[test]
    fn test_tmp_path() {
        assert_eq!(tmp_path(Path::new("/a/cache.json")), PathBuf::from("/a/cache.json.tmp"));
    }
}
