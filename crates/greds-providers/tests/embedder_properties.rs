//! Property tests for the feature-hash embedder.

use greds_core::traits::IEmbeddingProvider;
use greds_providers::HashEmbedder;
use proptest::prelude::*;

proptest! {
    #[test]
    fn embedding_always_has_requested_dimensions(text in ".*", dims in 1usize..=512) {
        let p = HashEmbedder::new(dims);
        let v = p.embed(&text).unwrap();
        prop_assert_eq!(v.len(), dims);
    }

    #[test]
    fn embedding_norm_is_unit_or_zero(text in ".*") {
        let p = HashEmbedder::new(128);
        let v = p.embed(&text).unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        prop_assert!(
            norm == 0.0 || (norm - 1.0).abs() < 1e-4,
            "norm was {}", norm
        );
    }

    #[test]
    fn embedding_is_deterministic(text in ".*") {
        let p = HashEmbedder::new(128);
        prop_assert_eq!(p.embed(&text).unwrap(), p.embed(&text).unwrap());
    }

    #[test]
    fn all_finite(text in ".*") {
        let p = HashEmbedder::new(64);
        let v = p.embed(&text).unwrap();
        prop_assert!(v.iter().all(|x| x.is_finite()));
    }
}
