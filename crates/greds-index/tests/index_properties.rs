//! Property tests for scoring and tokenization.

use greds_core::models::ChunkId;
use greds_index::{cosine_similarity, tokenize, SemanticIndex};
use proptest::prelude::*;

proptest! {
    #[test]
    fn cosine_stays_in_range(
        a in prop::collection::vec(-100.0f32..100.0, 8),
        b in prop::collection::vec(-100.0f32..100.0, 8),
    ) {
        let s = cosine_similarity(&a, &b);
        prop_assert!((-1.0001..=1.0001).contains(&s), "cosine was {}", s);
    }

    #[test]
    fn cosine_is_symmetric(
        a in prop::collection::vec(-100.0f32..100.0, 8),
        b in prop::collection::vec(-100.0f32..100.0, 8),
    ) {
        prop_assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }

    #[test]
    fn tokens_never_carry_uppercase_or_whitespace(text in ".*") {
        for token in tokenize(&text) {
            prop_assert!(!token.is_empty());
            prop_assert!(!token.chars().any(char::is_whitespace));
            prop_assert!(!token.chars().any(char::is_uppercase));
        }
    }

    #[test]
    fn ascii_tokenization_is_stable(text in "[ -~]*") {
        let once = tokenize(&text);
        for token in &once {
            prop_assert!(
                token.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()),
                "bad token {:?}", token
            );
        }
        // Index-side and query-side tokenization must agree on terms.
        prop_assert_eq!(tokenize(&once.join(" ")), once);
    }

    #[test]
    fn semantic_search_is_sorted_and_bounded(
        vectors in prop::collection::vec(prop::collection::vec(-10.0f32..10.0, 4), 1..20),
        query in prop::collection::vec(-10.0f32..10.0, 4),
        k in 1usize..10,
    ) {
        let mut index = SemanticIndex::new(4);
        for (i, v) in vectors.iter().enumerate() {
            index.index(ChunkId::new("w", 1, i as u32), v.clone()).unwrap();
        }
        let hits = index.search(&query, k).unwrap();
        prop_assert!(hits.len() <= k);
        for pair in hits.windows(2) {
            prop_assert!(
                pair[0].1 > pair[1].1
                    || (pair[0].1 == pair[1].1 && pair[0].0 < pair[1].0),
                "ordering violated: {:?}", pair
            );
        }
    }
}
