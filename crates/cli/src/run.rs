//! One dashboard run: fetch, resolve, render, persist.

use crate::report::{self, CSV_FILE, Dashboard, HTML_FILE};
use anyhow::{Context, Result};
use chrono::Utc;
use delegators_client::{CachedResolver, EnsResolver, GraphClient, GraphConfig, NameResolver};
use delegators_core::cache::normalize_address;
use delegators_core::{AppConfig, DelegationEvent, ResolutionCache};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// What a completed run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub events: usize,
    pub rows: usize,
    pub named: usize,
    pub csv_path: PathBuf,
    pub html_path: PathBuf,
}

pub async fn run(config: &AppConfig) -> Result<RunSummary> {
    let graph = GraphClient::new(GraphConfig::from_app_config(config)?)?;

    let events = graph
        .fetch_delegation_events(&config.network_subgraph_id, config.transaction_count)
        .await
        .context("failed to fetch delegation events")?;

    let cache = ResolutionCache::load(config.cache_path.clone(), config.cache_expiry())
        .with_write_through(config.cache_write_through);
    tracing::info!(
        path = %cache.path().display(),
        entries = cache.len(),
        expiry_hours = cache.expiry().num_hours(),
        "using resolution cache"
    );

    let ens = EnsResolver::new(graph.clone(), config.ens_subgraph_id.clone());
    let mut resolver = CachedResolver::new(ens, cache, config.cache_negative.into());
    let names = resolve_names(&mut resolver, &events, config.grt_threshold).await;

    let avatars = if config.resolve_avatars {
        fetch_avatars(&graph, &config.avatar_subgraph_id, &events, config.grt_threshold).await
    } else {
        HashMap::new()
    };

    let dashboard = Dashboard::new(config, &events, &names, &avatars, Utc::now());
    let (csv_path, html_path) = write_reports(&config.output_dir, &events, &dashboard)?;

    let mut cache = resolver.into_cache();
    if cache.is_dirty()
        && let Err(e) = cache.save()
    {
        tracing::warn!(path = %cache.path().display(), "failed to save resolution cache: {}", e);
    }

    Ok(RunSummary { events: events.len(), rows: dashboard.rows.len(), named: names.len(), csv_path, html_path })
}

/// Resolve names for every participant shown on the dashboard.
pub async fn resolve_names<R: NameResolver>(
    resolver: &mut CachedResolver<R>, events: &[DelegationEvent], grt_threshold: u64,
) -> HashMap<String, String> {
    let visible = report::visible_events(events, grt_threshold);
    resolver.resolve_all(report::participants(visible)).await
}

/// Fetch avatars for the distinct indexers shown on the dashboard.
///
/// Failures are logged and leave that indexer without an avatar.
async fn fetch_avatars(
    graph: &GraphClient, subgraph_id: &str, events: &[DelegationEvent], grt_threshold: u64,
) -> HashMap<String, String> {
    let mut seen = HashSet::new();
    let mut avatars = HashMap::new();

    for event in report::visible_events(events, grt_threshold) {
        let indexer = normalize_address(&event.indexer);
        if !seen.insert(indexer.clone()) {
            continue;
        }

        match graph.fetch_indexer_avatar(subgraph_id, &indexer).await {
            Ok(Some(url)) => {
                avatars.insert(indexer, url);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(indexer = %indexer, "avatar lookup failed: {}", e),
        }
    }

    tracing::info!(indexers = seen.len(), avatars = avatars.len(), "fetched indexer avatars");
    avatars
}

fn write_reports(output_dir: &Path, events: &[DelegationEvent], dashboard: &Dashboard) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir {}", output_dir.display()))?;

    let csv_path = output_dir.join(CSV_FILE);
    report::csv::write_csv(&csv_path, events)?;

    let html_path = output_dir.join(HTML_FILE);
    report::html::write_html(&html_path, dashboard)?;

    Ok((csv_path, html_path))
}
