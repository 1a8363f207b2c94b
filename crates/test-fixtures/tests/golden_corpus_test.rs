//! The assembled library driven against the golden datasets.

use greds_library::{
    Claim, ChunkId, IngestRequest, LibraryConfig, QueryRequest, ReferenceLibrary, Verdict,
    MEMORY_DB_PATH,
};
use test_fixtures::{golden_claims, golden_corpus, golden_queries};

fn open_with_corpus() -> ReferenceLibrary {
    let mut config = LibraryConfig::default();
    config.storage.db_path = MEMORY_DB_PATH.to_string();
    config.provider.embedding_dimensions = 64;
    config.chunking.chunk_size_tokens = 12;
    config.chunking.overlap_fraction = 0.25;
    let library = ReferenceLibrary::open(config).unwrap();

    for work in golden_corpus().works {
        let mut request = IngestRequest::new(work.slug, work.title, work.text);
        request.tags = work.tags;
        library.ingest(&request).unwrap();
    }
    library
}

#[test]
fn every_golden_work_ingests_with_summaries() {
    let library = open_with_corpus();
    let corpus = golden_corpus();
    assert_eq!(library.works().unwrap().len(), corpus.works.len());

    for fixture in &corpus.works {
        let work = library.work(&fixture.slug).unwrap().unwrap();
        assert_eq!(work.version, 1);
        assert!(work.chunk_count > 1, "{} should span several chunks", fixture.slug);
        for tag in &fixture.tags {
            assert!(work.tags.contains(tag));
        }

        let first = ChunkId::new(fixture.slug.clone(), 1, 0);
        let chunk = library.chunk(&first).unwrap().unwrap();
        let summaries = chunk.summaries.expect("ingested chunks carry summaries");
        assert!(!summaries.short.is_empty());
    }
}

#[test]
fn golden_queries_rank_their_expected_work_first() {
    let library = open_with_corpus();
    for case in golden_queries().cases {
        let mut request = QueryRequest::new(case.query.clone());
        request.filter.tags = case.tags.clone();

        let results = library.query(&request).unwrap();
        assert!(!results.is_empty(), "no results for {:?}", case.query);
        assert_eq!(
            results[0].chunk.id.slug, case.expect_top_slug,
            "top result for {:?}",
            case.query
        );
        if case.exclusive {
            for result in &results {
                assert_eq!(
                    result.chunk.id.slug, case.expect_top_slug,
                    "filtered results for {:?}",
                    case.query
                );
            }
        }
    }
}

#[test]
fn golden_claims_verify_to_their_expected_verdicts() {
    let library = open_with_corpus();
    for case in golden_claims().cases {
        let cited = ChunkId::new(case.slug.clone(), 1, case.ordinal);
        let chunk = library.chunk(&cited).unwrap().unwrap();
        let claim = Claim::new(case.id.clone(), chunk.text, vec![cited]);

        let record = library.verify(&claim, None).unwrap();
        let expected = Verdict::parse(&case.expected_verdict).unwrap();
        assert_eq!(record.verdict, expected, "claim {}", case.id);
    }
}
