// src/ingest/mod.rs
pub mod normalize;
pub mod providers;
pub mod relay;
pub mod tags;
pub mod types;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;

use crate::config::AggregatorConfig;
use crate::ingest::types::{NewsItem, SourceProvider};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_items_total", "Raw items parsed from sources.");
        describe_counter!(
            "ingest_kept_total",
            "Items kept after normalization + the title/link invariant."
        );
        describe_counter!(
            "ingest_dropped_total",
            "Items dropped for a missing title or link."
        );
        describe_counter!(
            "ingest_source_errors_total",
            "Source fetch/parse errors (each contributes zero items)."
        );
        describe_histogram!("ingest_parse_ms", "Source parse time in milliseconds.");
        describe_gauge!(
            "ingest_last_run_ts",
            "Unix ts when the ingest pipeline last ran."
        );
    });
}

/// Run one full aggregation pass: fire every source fetch at once, await
/// them all, normalize, then merge into one ordered collection.
///
/// A failing source is isolated to a warn + counter and contributes zero
/// items; nothing here aborts the aggregate. The fan-in collects in registry
/// order before sorting, so equal timestamps keep registry order.
pub async fn run_once(
    providers: &[Arc<dyn SourceProvider>],
    config: &AggregatorConfig,
) -> Vec<NewsItem> {
    ensure_metrics_described();
    let now = Utc::now();

    let handles: Vec<_> = providers
        .iter()
        .map(|provider| {
            let provider = Arc::clone(provider);
            tokio::spawn(async move {
                match provider.fetch_latest().await {
                    Ok(items) => items,
                    Err(e) => {
                        tracing::warn!(
                            error = ?e,
                            source = %provider.descriptor().name,
                            "source error"
                        );
                        counter!("ingest_source_errors_total").increment(1);
                        Vec::new()
                    }
                }
            })
        })
        .collect();

    let mut merged = Vec::new();
    let mut dropped = 0usize;
    for (handle, provider) in handles.into_iter().zip(providers) {
        // A panicked task is treated like a failed source.
        let raw_items = handle.await.unwrap_or_default();
        let descriptor = provider.descriptor();
        for raw in raw_items {
            match normalize::build_item(raw, descriptor, config, now) {
                Some(item) => merged.push(item),
                None => dropped += 1,
            }
        }
    }

    sort_newest_first(&mut merged);

    counter!("ingest_kept_total").increment(merged.len() as u64);
    counter!("ingest_dropped_total").increment(dropped as u64);
    gauge!("ingest_last_run_ts").set(now.timestamp() as f64);
    tracing::info!(
        kept = merged.len(),
        dropped,
        sources = providers.len(),
        "ingest run complete"
    );

    merged
}

/// Stable descending sort by resolved publish time. Items without a
/// resolvable timestamp sort as oldest; ties keep insertion order.
pub fn sort_newest_first(items: &mut [NewsItem]) {
    items.sort_by(|a, b| sort_key(b).cmp(&sort_key(a)));
}

fn sort_key(item: &NewsItem) -> DateTime<Utc> {
    item.published_at.unwrap_or(DateTime::<Utc>::MIN_UTC)
}
