//! Resource Deduplication
//!
//! First-occurrence-wins dedup over grounded search candidates, with a
//! per-kind length cap. Candidates missing a title or carrying an
//! unparseable URL are dropped before dedup.

use std::collections::HashSet;

use url::Url;

use super::types::SearchResult;

/// Deduplicate an ordered candidate list by URL.
///
/// Order is stable: the first occurrence of a URL wins and later duplicates
/// are dropped. The result is truncated to `cap` entries. An empty candidate
/// list yields an empty result.
pub fn dedup_resources(candidates: Vec<SearchResult>, cap: usize) -> Vec<SearchResult> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::new();

    for candidate in candidates {
        if unique.len() == cap {
            break;
        }
        if candidate.title.trim().is_empty() {
            continue;
        }
        if Url::parse(&candidate.url).is_err() {
            continue;
        }
        if seen.insert(candidate.url.clone()) {
            unique.push(candidate);
        }
    }

    unique
}
