//! Cache-first name resolution.

use super::NameResolver;
use delegators_core::cache::normalize_address;
use delegators_core::{Lookup, ResolutionCache};
use std::collections::HashMap;

/// What to record when a live lookup yields no name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegativeCaching {
    /// Record the absence; the address is not looked up again until expiry.
    Cache,
    /// Record nothing; the next run looks the address up again.
    #[default]
    Skip,
}

impl From<bool> for NegativeCaching {
    fn from(enabled: bool) -> Self {
        if enabled { NegativeCaching::Cache } else { NegativeCaching::Skip }
    }
}

/// Counters for one resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub hits: usize,
    pub misses: usize,
    pub failures: usize,
}

/// A [`NameResolver`] with the resolution cache in front of it.
///
/// Failed lookups never propagate: the address is reported as unnamed and
/// the failure is logged.
#[derive(Debug)]
pub struct CachedResolver<R> {
    resolver: R,
    cache: ResolutionCache,
    policy: NegativeCaching,
    stats: ResolveStats,
}

impl<R: NameResolver> CachedResolver<R> {
    pub fn new(resolver: R, cache: ResolutionCache, policy: NegativeCaching) -> Self {
        Self { resolver, cache, policy, stats: ResolveStats::default() }
    }

    pub fn stats(&self) -> ResolveStats {
        self.stats
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// Give back the cache, e.g. to save it explicitly.
    pub fn into_cache(self) -> ResolutionCache {
        self.cache
    }

    /// Resolve one address, consulting the cache first.
    pub async fn resolve(&mut self, address: &str) -> Option<String> {
        match self.cache.get(address) {
            Lookup::Hit(name) => {
                self.stats.hits += 1;
                tracing::debug!(address, name = %name, "name cache hit");
                return Some(name);
            }
            Lookup::NegativeHit => {
                self.stats.hits += 1;
                tracing::debug!(address, "negative name cache hit");
                return None;
            }
            Lookup::Miss => {}
        }

        self.stats.misses += 1;
        match self.resolver.resolve(address).await {
            Ok(Some(name)) => {
                tracing::debug!(address, name = %name, "resolved name");
                self.cache.put(address, Some(name.clone()));
                Some(name)
            }
            Ok(None) => {
                tracing::debug!(address, "no name found");
                self.record_absence(address);
                None
            }
            Err(e) => {
                self.stats.failures += 1;
                tracing::warn!(address, "name lookup failed: {}", e);
                self.record_absence(address);
                None
            }
        }
    }

    /// Resolve every distinct address in `addresses`.
    ///
    /// Returns normalized address → name for the addresses that have a name.
    pub async fn resolve_all<I, S>(&mut self, addresses: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = std::collections::HashSet::new();
        let mut names = HashMap::new();

        for address in addresses {
            let key = normalize_address(address.as_ref());
            if !seen.insert(key.clone()) {
                continue;
            }
            if let Some(name) = self.resolve(&key).await {
                names.insert(key, name);
            }
        }

        tracing::info!(
            addresses = seen.len(),
            named = names.len(),
            cache_hits = self.stats.hits,
            lookups = self.stats.misses,
            failures = self.stats.failures,
            "resolved names"
        );

        names
    }

    fn record_absence(&mut self, address: &str) {
        if self.policy == NegativeCaching::Cache {
            self.cache.put(address, None);
        }
    }
}
