// src/ingest/tags.rs
//! Keyword-membership topic classifier. An ordered label → keywords table is
//! matched case-insensitively against title + summary; the first four
//! matching labels win, in table order. No scoring, no stemming.

use serde::{Deserialize, Serialize};

/// Hard cap on tags per item.
pub const MAX_TAGS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRule {
    pub label: String,
    pub keywords: Vec<String>,
}

impl TagRule {
    pub fn new(label: &str, keywords: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Assign topic labels to an item. Matching is plain substring containment
/// over the lowercased text; table order decides which labels survive the
/// cap.
pub fn classify(rules: &[TagRule], title: &str, summary: &str) -> Vec<String> {
    let text = format!("{title} {summary}").to_lowercase();
    let mut out = Vec::new();
    for rule in rules {
        if out.len() == MAX_TAGS {
            break;
        }
        if rule
            .keywords
            .iter()
            .any(|keyword| text.contains(&keyword.to_lowercase()))
        {
            out.push(rule.label.clone());
        }
    }
    out
}
