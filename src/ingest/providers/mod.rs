// src/ingest/providers/mod.rs
pub mod flattened_json;
pub mod xml_feed;

use std::sync::Arc;

use crate::config::AggregatorConfig;
use crate::ingest::relay::RelayClient;
use crate::ingest::types::{FeedShape, SourceProvider};

/// Instantiate one provider per registry entry, dispatching on the entry's
/// wire shape.
pub fn build(config: &AggregatorConfig, relay: &RelayClient) -> Vec<Arc<dyn SourceProvider>> {
    config
        .sources
        .iter()
        .map(|descriptor| -> Arc<dyn SourceProvider> {
            match descriptor.shape {
                FeedShape::Xml => Arc::new(xml_feed::XmlFeedProvider::new(
                    descriptor.clone(),
                    relay.clone(),
                )),
                FeedShape::FlattenedJson => Arc::new(flattened_json::FlattenedJsonProvider::new(
                    descriptor.clone(),
                    relay.clone(),
                )),
            }
        })
        .collect()
}
