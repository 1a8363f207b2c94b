use chrono::Utc;
use greds_core::models::*;

// ─── ChunkId ───

#[test]
fn chunk_id_round_trips_through_display_and_parse() {
    let id = ChunkId::new("origin-of-species", 3, 17);
    let s = id.to_string();
    assert_eq!(s, "origin-of-species:3:17");
    assert_eq!(ChunkId::parse(&s).unwrap(), id);
}

#[test]
fn chunk_id_parse_rejects_bad_shapes() {
    assert!(ChunkId::parse("no-colons").is_err());
    assert!(ChunkId::parse("slug:1").is_err());
    assert!(ChunkId::parse("slug:one:2").is_err());
    assert!(ChunkId::parse("slug:1:two").is_err());
    assert!(ChunkId::parse(":1:2").is_err());
    assert!(ChunkId::parse("a:b:c:d").is_err());
}

#[test]
fn chunk_id_serializes_as_string() {
    let id = ChunkId::new("walden", 1, 0);
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"walden:1:0\"");
    let back: ChunkId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

#[test]
fn chunk_id_orders_numerically_not_lexically() {
    let a = ChunkId::new("walden", 1, 9);
    let b = ChunkId::new("walden", 1, 10);
    assert!(a < b);
}

// ─── Verdict ───

#[test]
fn verdict_classifies_boundaries() {
    assert_eq!(Verdict::from_score(0.80), Verdict::Pass);
    assert_eq!(Verdict::from_score(0.95), Verdict::Pass);
    assert_eq!(Verdict::from_score(0.7999), Verdict::Partial);
    assert_eq!(Verdict::from_score(0.50), Verdict::Partial);
    assert_eq!(Verdict::from_score(0.4999), Verdict::Fail);
    assert_eq!(Verdict::from_score(0.0), Verdict::Fail);
}

#[test]
fn verdict_round_trips_through_strings() {
    for v in [Verdict::Pass, Verdict::Partial, Verdict::Fail] {
        assert_eq!(Verdict::parse(v.as_str()).unwrap(), v);
    }
    assert!(Verdict::parse("maybe").is_err());
}

// ─── Chunk ───

#[test]
fn chunk_content_hash_is_stable_and_text_sensitive() {
    let h1 = Chunk::compute_content_hash("the voyage of the beagle");
    let h2 = Chunk::compute_content_hash("the voyage of the beagle");
    let h3 = Chunk::compute_content_hash("the voyage of the beagle.");
    assert_eq!(h1, h2);
    assert_ne!(h1, h3);
}

#[test]
fn chunk_summaries_current_tracks_hash() {
    let text = "finches differ across islands";
    let hash = Chunk::compute_content_hash(text);
    let mut chunk = Chunk {
        id: ChunkId::new("origin-of-species", 1, 0),
        work_id: "w-1".into(),
        text: text.into(),
        token_count: 4,
        content_hash: hash.clone(),
        embedding: vec![0.0; 4],
        summaries: None,
        created_at: Utc::now(),
    };
    assert!(!chunk.summaries_current());

    chunk.summaries = Some(SummarySet {
        short: "finches differ".into(),
        medium: "finches differ across islands".into(),
        long: "finches differ across islands".into(),
        source_hash: hash,
    });
    assert!(chunk.summaries_current());

    chunk.content_hash = Chunk::compute_content_hash("different text");
    assert!(!chunk.summaries_current());
}

// ─── Session ───

#[test]
fn session_record_returns_checkpointed_session_to_active() {
    let mut session = Session::new("s-1");
    session.state = SessionState::Checkpointed;
    session.record(HistoryEntry::Query {
        query: "island finches".into(),
        returned: vec![ChunkId::new("origin-of-species", 1, 0)],
        at: Utc::now(),
    });
    assert_eq!(session.state, SessionState::Active);
    assert_eq!(session.history.len(), 1);
}

#[test]
fn session_top_citations_orders_by_frequency() {
    let a = ChunkId::new("walden", 1, 0);
    let b = ChunkId::new("walden", 1, 1);
    let c = ChunkId::new("walden", 1, 2);
    let mut session = Session::new("s-1");
    session.record(HistoryEntry::Query {
        query: "pond".into(),
        returned: vec![a.clone(), b.clone()],
        at: Utc::now(),
    });
    session.record(HistoryEntry::Claim {
        claim_id: "c-1".into(),
        text: "the pond freezes".into(),
        cited: vec![b.clone(), c.clone()],
        at: Utc::now(),
    });
    session.record(HistoryEntry::Claim {
        claim_id: "c-2".into(),
        text: "the cabin is small".into(),
        cited: vec![b.clone()],
        at: Utc::now(),
    });

    let top = session.top_citations(2);
    assert_eq!(top, vec![b, a]);

    let all = session.top_citations(10);
    assert_eq!(all.len(), 3);
    assert_eq!(all[2], c);
}

#[test]
fn verification_entries_do_not_count_as_citations() {
    let mut session = Session::new("s-1");
    session.record(HistoryEntry::Verification {
        record_id: "r-1".into(),
        claim_id: "c-1".into(),
        verdict: Verdict::Pass,
        support_score: 0.9,
        at: Utc::now(),
    });
    assert!(session.top_citations(5).is_empty());
}

// ─── Work ───

#[test]
fn new_work_starts_pending_at_version_zero() {
    let work = Work::new("w-1", "walden", "Walden");
    assert_eq!(work.version, 0);
    assert_eq!(work.status, WorkStatus::Pending);
    assert_eq!(work.chunk_count, 0);
    assert!(work.ingested_at.is_none());
}

#[test]
fn work_status_round_trips_through_strings() {
    for s in [WorkStatus::Pending, WorkStatus::Ingested, WorkStatus::Failed] {
        assert_eq!(WorkStatus::parse(s.as_str()).unwrap(), s);
    }
    assert!(WorkStatus::parse("processing").is_err());
}
