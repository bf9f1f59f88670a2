//! In-memory view of the resolution cache with expiry-aware lookups.

use super::entry::{CacheEntry, normalize_address};
use super::file;
use crate::Error;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Outcome of a cache lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Fresh entry with a resolved name.
    Hit(String),
    /// Fresh entry recording that no name exists.
    NegativeHit,
    /// No entry, or the entry has expired.
    Miss,
}

impl Lookup {
    /// The cached name, if this was a positive hit.
    pub fn name(self) -> Option<String> {
        match self {
            Lookup::Hit(name) => Some(name),
            Lookup::NegativeHit | Lookup::Miss => None,
        }
    }
}

/// Address → name cache backed by a single file.
///
/// Holds at most one entry per normalized address. Changes are kept in
/// memory until [`save`](Self::save); a cache dropped with unsaved changes
/// saves itself and logs any failure.
#[derive(Debug)]
pub struct ResolutionCache {
    path: PathBuf,
    expiry: Duration,
    entries: HashMap<String, CacheEntry>,
    write_through: bool,
    dirty: bool,
}

impl ResolutionCache {
    /// Load the cache stored at `path`.
    ///
    /// Never fails: a missing or malformed file produces an empty cache.
    /// Duplicate addresses in the file collapse to the most recent entry.
    pub fn load(path: impl Into<PathBuf>, expiry: Duration) -> Self {
        let path = path.into();
        let mut entries: HashMap<String, CacheEntry> = HashMap::new();

        for entry in file::read_entries(&path) {
            let entry = CacheEntry { address: normalize_address(&entry.address), ..entry };
            let newer = entries
                .get(&entry.address)
                .is_none_or(|existing| entry.resolved_at > existing.resolved_at);
            if newer {
                entries.insert(entry.address.clone(), entry);
            }
        }

        tracing::debug!(path = %path.display(), entries = entries.len(), "loaded resolution cache");

        Self { path, expiry, entries, write_through: false, dirty: false }
    }

    /// Save after every `put` instead of only on [`save`](Self::save) or drop.
    pub fn with_write_through(mut self, enabled: bool) -> Self {
        self.write_through = enabled;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether there are changes not yet written to disk.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Look up `address` as of now.
    pub fn get(&self, address: &str) -> Lookup {
        self.get_at(address, Utc::now())
    }

    /// Look up `address` as of `now`. Expired entries report [`Lookup::Miss`].
    pub fn get_at(&self, address: &str, now: DateTime<Utc>) -> Lookup {
        match self.entries.get(&normalize_address(address)) {
            Some(entry) if entry.is_expired(self.expiry, now) => Lookup::Miss,
            Some(CacheEntry { name: Some(name), .. }) => Lookup::Hit(name.clone()),
            Some(CacheEntry { name: None, .. }) => Lookup::NegativeHit,
            None => Lookup::Miss,
        }
    }

    /// Cached name for `address`, if fresh and resolved.
    pub fn name(&self, address: &str) -> Option<String> {
        self.get(address).name()
    }

    /// Insert or overwrite the entry for `address`, stamped now.
    pub fn put(&mut self, address: &str, name: Option<String>) {
        self.put_at(address, name, Utc::now());
    }

    /// Insert or overwrite the entry for `address`, stamped `now`.
    pub fn put_at(&mut self, address: &str, name: Option<String>, now: DateTime<Utc>) {
        let entry = CacheEntry::new(address, name, now);
        self.entries.insert(entry.address.clone(), entry);
        self.dirty = true;

        if self.write_through
            && let Err(e) = self.save()
        {
            tracing::warn!(path = %self.path.display(), "write-through cache save failed: {}", e);
        }
    }

    /// Write every entry to the backing file.
    ///
    /// # Errors
    ///
    /// Returns `Error::CacheIo` or `Error::CacheEncode` if the file cannot be
    /// written. The in-memory state is kept and stays dirty.
    pub fn save(&mut self) -> Result<(), Error> {
        let mut entries: Vec<CacheEntry> = self.entries.values().cloned().collect();
        entries.sort_by(|a, b| a.address.cmp(&b.address));

        file::write_entries(&self.path, entries)?;
        self.dirty = false;

        tracing::debug!(path = %self.path.display(), entries = self.entries.len(), "saved resolution cache");
        Ok(())
    }
}

impl Drop for ResolutionCache {
    fn drop(&mut self) {
        if self.dirty
            && let Err(e) = self.save()
        {
            tracing::warn!(path = %self.path.display(), "failed to save resolution cache on drop: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn window() -> Duration {
        Duration::hours(24)
    }

    #[test]
    fn test_put_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = ResolutionCache::load(dir.path().join("cache.json"), window());

        assert_eq!(cache.get("0xABC"), Lookup::Miss);
        cache.put("0xABC", Some("alice.eth".into()));

        assert_eq!(cache.get("0xABC"), Lookup::Hit("alice.eth".into()));
        assert_eq!(cache.name("0xabc"), Some("alice.eth".into()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expired_entry_is_miss() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = ResolutionCache::load(dir.path().join("cache.json"), window());
        let t0 = Utc::now();

        cache.put_at("0xABC", Some("alice.eth".into()), t0);
        assert_eq!(cache.get_at("0xABC", t0 + Duration::hours(23)), Lookup::Hit("alice.eth".into()));
        assert_eq!(cache.get_at("0xABC", t0 + Duration::hours(25)), Lookup::Miss);

        // expired entries are kept until overwritten
        assert_eq!(cache.len(), 1);
        cache.put_at("0xabc", Some("bob.eth".into()), t0 + Duration::hours(25));
        assert_eq!(cache.get_at("0xABC", t0 + Duration::hours(26)), Lookup::Hit("bob.eth".into()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_negative_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = ResolutionCache::load(dir.path().join("cache.json"), window());
        let t0 = Utc::now();

        cache.put_at("0xdead", None, t0);
        let lookup = cache.get_at("0xdead", t0);
        assert_eq!(lookup, Lookup::NegativeHit);
        assert_eq!(lookup.name(), None);
        assert_eq!(cache.get_at("0xdead", t0 + Duration::hours(25)), Lookup::Miss);
    }

    #[test]
    fn test_load_missing_and_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let missing = ResolutionCache::load(dir.path().join("absent.json"), window());
        assert!(missing.is_empty());

        let path = dir.path().join("broken.json");
        fs::write(&path, "garbage").unwrap();
        let malformed = ResolutionCache::load(&path, window());
        assert!(malformed.is_empty());
        assert!(!malformed.is_dirty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut cache = ResolutionCache::load(&path, window());
        cache.put("0xAAA", Some("alice.eth".into()));
        cache.put("0xBBB", None);
        cache.save().unwrap();
        assert!(!cache.is_dirty());
        drop(cache);

        let reloaded = ResolutionCache::load(&path, window());
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("0xaaa"), Lookup::Hit("alice.eth".into()));
        assert_eq!(reloaded.get("0xbbb"), Lookup::NegativeHit);
    }

    #[test]
    fn test_drop_saves_dirty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        {
            let mut cache = ResolutionCache::load(&path, window());
            cache.put("0xccc", Some("carol.eth".into()));
        }

        assert!(path.exists());
        assert_eq!(ResolutionCache::load(&path, window()).name("0xccc"), Some("carol.eth".into()));
    }

    #[test]
    fn test_clean_cache_does_not_write_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        drop(ResolutionCache::load(&path, window()));
        assert!(!path.exists());
    }

    #[test]
    fn test_write_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let mut cache = ResolutionCache::load(&path, window()).with_write_through(true);

        cache.put("0xddd", Some("dave.eth".into()));
        assert!(!cache.is_dirty());
        assert_eq!(file::read_entries(&path).len(), 1);
    }

    #[test]
    fn test_load_collapses_duplicates_to_newest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let t0 = Utc::now();
        file::write_entries(
            &path,
            vec![
                CacheEntry { address: "0xABC".into(), name: Some("new.eth".into()), resolved_at: t0 },
                CacheEntry {
                    address: "0xabc".into(),
                    name: Some("old.eth".into()),
                    resolved_at: t0 - Duration::hours(1),
                },
            ],
        )
        .unwrap();

        let cache = ResolutionCache::load(&path, window());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_at("0xabc", t0), Lookup::Hit("new.eth".into()));
    }

    #[test]
    fn test_resolve_then_expire_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = ResolutionCache::load(dir.path().join("cache.json"), window());
        let t0 = Utc::now();

        cache.put_at("0xABC", Some("alice.eth".into()), t0);
        assert_eq!(cache.get_at("0xABC", t0).name(), Some("alice.eth".into()));
        assert_eq!(cache.get_at("0xABC", t0 + window() + Duration::seconds(1)).name(), None);
    }
}
