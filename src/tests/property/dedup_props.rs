//! Property-based tests for resource deduplication
//!
//! Laws:
//! - Idempotence: dedup(dedup(xs)) == dedup(xs)
//! - The cap is never exceeded
//! - Output URLs are unique and appear in first-occurrence input order
//! - Unusable candidates (blank title, invalid URL) never survive

use proptest::prelude::*;

use crate::core::explain::{dedup_resources, SearchResult};

// ============================================================================
// Strategies
// ============================================================================

/// A small URL pool so duplicates actually occur.
fn arb_valid_resource() -> impl Strategy<Value = SearchResult> {
    ("[a-z]{1,8}", 0..8u32).prop_map(|(title, n)| {
        SearchResult::new(title, format!("https://example.com/page/{n}"))
    })
}

/// Candidates the algorithm must drop.
fn arb_unusable_resource() -> impl Strategy<Value = SearchResult> {
    prop_oneof![
        Just(SearchResult::new("", "https://example.com/no-title")),
        Just(SearchResult::new("   ", "https://example.com/blank-title")),
        Just(SearchResult::new("bad url", "not-a-url")),
        Just(SearchResult::new("empty url", "")),
    ]
}

fn arb_candidates() -> impl Strategy<Value = Vec<SearchResult>> {
    prop::collection::vec(
        prop_oneof![
            4 => arb_valid_resource(),
            1 => arb_unusable_resource(),
        ],
        0..40,
    )
}

// ============================================================================
// Laws
// ============================================================================

proptest! {
    #[test]
    fn dedup_is_idempotent(candidates in arb_candidates(), cap in 0..10usize) {
        let once = dedup_resources(candidates, cap);
        let twice = dedup_resources(once.clone(), cap);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn dedup_never_exceeds_cap(candidates in arb_candidates(), cap in 0..10usize) {
        prop_assert!(dedup_resources(candidates, cap).len() <= cap);
    }

    #[test]
    fn dedup_output_urls_are_unique(candidates in arb_candidates(), cap in 0..10usize) {
        let out = dedup_resources(candidates, cap);
        let mut urls: Vec<_> = out.iter().map(|r| r.url.clone()).collect();
        urls.sort();
        urls.dedup();
        prop_assert_eq!(urls.len(), out.len());
    }

    #[test]
    fn dedup_preserves_first_occurrence_order(candidates in arb_candidates(), cap in 0..10usize) {
        let out = dedup_resources(candidates.clone(), cap);

        // Every output entry is the first usable candidate with its URL.
        for entry in &out {
            let first = candidates
                .iter()
                .find(|c| c.url == entry.url && !c.title.trim().is_empty())
                .expect("output entry must come from the input");
            prop_assert_eq!(&first.title, &entry.title);
        }

        // And output order follows input order of those first occurrences.
        let positions: Vec<usize> = out
            .iter()
            .map(|entry| {
                candidates.iter().position(|c| c.url == entry.url).unwrap()
            })
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn dedup_drops_unusable_candidates(
        unusable in prop::collection::vec(arb_unusable_resource(), 1..10),
    ) {
        prop_assert!(dedup_resources(unusable, 5).is_empty());
    }
}
