//! Flat-file cache for address name resolutions.
//!
//! Entries map a normalized address to a resolved name, or to a recorded
//! absence, together with the time of resolution. Lookups ignore entries
//! older than the expiry window; stale entries stay on disk until the next
//! `put` for the same address overwrites them.
//!
//! The whole cache is read once by [`ResolutionCache::load`] and written
//! back by [`ResolutionCache::save`]. A cache with unsaved changes saves
//! itself when dropped.

pub mod entry;
pub mod file;
pub mod resolution;

pub use crate::Error;

pub use entry::{CacheEntry, normalize_address};
pub use resolution::{Lookup, ResolutionCache};
