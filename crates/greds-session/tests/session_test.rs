//! Session lifecycle: recording, checkpoint, rehydrate, close.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use greds_core::config::SessionConfig;
use greds_core::constants::SNAPSHOT_FORMAT_VERSION;
use greds_core::errors::{LibraryError, LibraryResult};
use greds_core::models::{
    Chunk, ChunkId, Claim, SessionState, Snapshot, SnapshotPayload, SummarySet, Work,
};
use greds_core::traits::{IChunkStore, IGenerationProvider, ISessionStore};
use greds_providers::ExtractiveGenerator;
use greds_session::{cleanup_stale_sessions, SessionManager, DEFAULT_IDLE_TIMEOUT};
use greds_storage::StorageEngine;

fn make_manager() -> (Arc<StorageEngine>, SessionManager) {
    let store = Arc::new(StorageEngine::open_in_memory().unwrap());
    let manager = SessionManager::new(
        Arc::clone(&store) as Arc<dyn ISessionStore>,
        Arc::clone(&store) as Arc<dyn IChunkStore>,
        Arc::new(ExtractiveGenerator::new()),
        SessionConfig::default(),
    );
    (store, manager)
}

fn seed_chunks(store: &StorageEngine, slug: &str, count: u32) -> Vec<ChunkId> {
    store
        .register_work(&Work::new(format!("work-{slug}"), slug, slug.to_uppercase()))
        .unwrap();
    let chunks: Vec<Chunk> = (0..count)
        .map(|i| {
            let text = format!("chunk {i} of {slug} describes the pond in winter.");
            Chunk {
                id: ChunkId::new(slug, 1, i),
                work_id: format!("work-{slug}"),
                text: text.clone(),
                token_count: 8,
                content_hash: Chunk::compute_content_hash(&text),
                embedding: vec![1.0, 0.0],
                summaries: Some(SummarySet {
                    short: format!("short summary {i}"),
                    medium: format!("medium summary {i}"),
                    long: format!("long summary {i}"),
                    source_hash: Chunk::compute_content_hash(&text),
                }),
                created_at: Utc::now(),
            }
        })
        .collect();
    store
        .commit_version(&format!("work-{slug}"), 0, &chunks, "corr-seed")
        .unwrap();
    chunks.into_iter().map(|c| c.id).collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// LIFECYCLE & RECORDING
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn create_and_get_session() {
    let (_store, manager) = make_manager();
    let session = manager.create_session();
    assert_eq!(session.state, SessionState::Active);
    assert!(session.history.is_empty());

    let loaded = manager.get_session(&session.id).unwrap();
    assert_eq!(loaded.id, session.id);
    assert_eq!(manager.session_count(), 1);
}

#[test]
fn unknown_session_is_not_found() {
    let (_store, manager) = make_manager();
    assert!(matches!(
        manager.get_session("ghost").unwrap_err(),
        LibraryError::NotFound { .. }
    ));
    assert!(matches!(
        manager.record_query("ghost", "q", vec![]).unwrap_err(),
        LibraryError::NotFound { .. }
    ));
    assert!(matches!(
        manager.checkpoint("ghost").unwrap_err(),
        LibraryError::NotFound { .. }
    ));
    assert!(matches!(
        manager.close("ghost").unwrap_err(),
        LibraryError::NotFound { .. }
    ));
}

#[test]
fn recording_builds_history_in_order() {
    let (store, manager) = make_manager();
    let ids = seed_chunks(&store, "walden", 2);
    let session = manager.create_session();

    manager
        .record_query(&session.id, "pond in winter", ids.clone())
        .unwrap();
    manager
        .record_claim(&session.id, &Claim::new("claim-1", "the pond freezes", vec![ids[0].clone()]))
        .unwrap();

    let loaded = manager.get_session(&session.id).unwrap();
    assert_eq!(loaded.history.len(), 2);
    assert!(loaded.last_activity >= session.created_at);
}

// ═══════════════════════════════════════════════════════════════════════════
// CHECKPOINT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn checkpoint_persists_snapshot_and_flips_state() {
    let (store, manager) = make_manager();
    let ids = seed_chunks(&store, "walden", 2);
    let session = manager.create_session();
    manager.record_query(&session.id, "pond", ids).unwrap();

    let snapshot = manager.checkpoint(&session.id).unwrap();
    assert_eq!(snapshot.format_version, SNAPSHOT_FORMAT_VERSION);
    assert_eq!(snapshot.session_id, session.id);

    // Persisted and parseable.
    let stored = store.get_snapshot(&snapshot.id).unwrap().unwrap();
    let payload: SnapshotPayload = serde_json::from_str(&stored.payload).unwrap();
    assert_eq!(payload.session.id, session.id);
    assert_eq!(payload.session.history.len(), 1);
    assert!(!payload.condensed_summary.is_empty());

    let live = manager.get_session(&session.id).unwrap();
    assert_eq!(live.state, SessionState::Checkpointed);
    assert_eq!(live.checkpoint, Some(snapshot.id));
}

#[test]
fn recording_after_checkpoint_reactivates() {
    let (store, manager) = make_manager();
    let ids = seed_chunks(&store, "walden", 1);
    let session = manager.create_session();
    manager.record_query(&session.id, "pond", ids.clone()).unwrap();
    manager.checkpoint(&session.id).unwrap();

    manager.record_query(&session.id, "ice", ids).unwrap();
    assert_eq!(
        manager.get_session(&session.id).unwrap().state,
        SessionState::Active
    );
}

#[test]
fn checkpoint_records_most_cited_chunks_first() {
    let (store, manager) = make_manager();
    let ids = seed_chunks(&store, "walden", 3);
    let session = manager.create_session();

    // ids[1] cited three times, ids[0] twice, ids[2] once.
    manager
        .record_query(&session.id, "q1", vec![ids[0].clone(), ids[1].clone()])
        .unwrap();
    manager
        .record_query(&session.id, "q2", vec![ids[1].clone(), ids[2].clone()])
        .unwrap();
    manager
        .record_claim(
            &session.id,
            &Claim::new("c1", "claim", vec![ids[0].clone(), ids[1].clone()]),
        )
        .unwrap();

    let snapshot = manager.checkpoint(&session.id).unwrap();
    let payload: SnapshotPayload = serde_json::from_str(&snapshot.payload).unwrap();
    assert_eq!(payload.top_citations[0], ids[1]);
    assert_eq!(payload.top_citations[1], ids[0]);
    assert_eq!(payload.top_citations[2], ids[2]);
}

#[test]
fn concurrent_checkpoint_conflicts() {
    struct SlowGenerator;
    impl IGenerationProvider for SlowGenerator {
        fn generate(&self, _text: &str, _max_chars: usize) -> LibraryResult<String> {
            std::thread::sleep(Duration::from_millis(300));
            Ok("condensed".to_string())
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    let store = Arc::new(StorageEngine::open_in_memory().unwrap());
    let manager = Arc::new(SessionManager::new(
        Arc::clone(&store) as Arc<dyn ISessionStore>,
        Arc::clone(&store) as Arc<dyn IChunkStore>,
        Arc::new(SlowGenerator),
        SessionConfig::default(),
    ));
    let session = manager.create_session();

    let background = {
        let manager = Arc::clone(&manager);
        let id = session.id.clone();
        std::thread::spawn(move || manager.checkpoint(&id))
    };
    std::thread::sleep(Duration::from_millis(100));

    let err = manager.checkpoint(&session.id).unwrap_err();
    assert!(matches!(err, LibraryError::Conflict { .. }));

    assert!(background.join().unwrap().is_ok());
    // Slot released: a fresh checkpoint goes through.
    assert!(manager.checkpoint(&session.id).is_ok());
}

// ═══════════════════════════════════════════════════════════════════════════
// REHYDRATE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn rehydrate_spins_up_a_new_session_with_context() {
    let (store, manager) = make_manager();
    let ids = seed_chunks(&store, "walden", 2);
    let session = manager.create_session();
    manager.record_query(&session.id, "pond", ids.clone()).unwrap();
    let snapshot = manager.checkpoint(&session.id).unwrap();

    let context = manager.rehydrate(&snapshot.id).unwrap();
    assert_ne!(context.session_id, session.id);
    assert!(!context.condensed_summary.is_empty());
    assert_eq!(context.supporting_chunk_ids, ids);
    assert_eq!(context.top_short_summaries.len(), ids.len());
    assert_eq!(context.top_short_summaries[0], "short summary 0");

    let rehydrated = manager.get_session(&context.session_id).unwrap();
    assert_eq!(rehydrated.state, SessionState::Rehydrated);
    assert_eq!(rehydrated.rehydrated_from, Some(snapshot.id));
    assert_eq!(rehydrated.checkpoint, None, "new session has no snapshot yet");
    assert_eq!(rehydrated.history.len(), 1, "history carries over");

    // Recording into the new session resumes the active cycle.
    manager.record_query(&context.session_id, "ice", Vec::new()).unwrap();
    let resumed = manager.get_session(&context.session_id).unwrap();
    assert_eq!(resumed.state, SessionState::Active);
    assert_eq!(resumed.history.len(), 2);
}

#[test]
fn rehydrate_drops_chunks_that_no_longer_resolve() {
    let (store, manager) = make_manager();
    let ids = seed_chunks(&store, "walden", 2);
    let session = manager.create_session();
    manager.record_query(&session.id, "pond", ids.clone()).unwrap();
    let snapshot = manager.checkpoint(&session.id).unwrap();

    // Re-ingest replaces version 1 chunks with a single version 2 chunk.
    let replacement_text = "replacement chunk text.";
    let replacement = Chunk {
        id: ChunkId::new("walden", 2, 0),
        work_id: "work-walden".to_string(),
        text: replacement_text.to_string(),
        token_count: 3,
        content_hash: Chunk::compute_content_hash(replacement_text),
        embedding: vec![1.0, 0.0],
        summaries: None,
        created_at: Utc::now(),
    };
    store
        .commit_version("work-walden", 1, std::slice::from_ref(&replacement), "corr-2")
        .unwrap();

    let context = manager.rehydrate(&snapshot.id).unwrap();
    assert!(context.supporting_chunk_ids.is_empty());
    assert!(context.top_short_summaries.is_empty());
    assert!(!context.condensed_summary.is_empty());
}

#[test]
fn rehydrating_an_unknown_snapshot_is_not_found() {
    let (_store, manager) = make_manager();
    let err = manager.rehydrate("snap-ghost").unwrap_err();
    assert!(matches!(err, LibraryError::NotFound { .. }));
}

#[test]
fn each_snapshot_rehydrates_its_own_history() {
    let (store, manager) = make_manager();
    let ids = seed_chunks(&store, "walden", 1);
    let session = manager.create_session();

    manager.record_query(&session.id, "first", ids.clone()).unwrap();
    let first = manager.checkpoint(&session.id).unwrap();
    manager.record_query(&session.id, "second", ids).unwrap();
    let second = manager.checkpoint(&session.id).unwrap();

    let from_first = manager.rehydrate(&first.id).unwrap();
    let from_second = manager.rehydrate(&second.id).unwrap();
    assert_eq!(manager.get_session(&from_first.session_id).unwrap().history.len(), 1);
    assert_eq!(manager.get_session(&from_second.session_id).unwrap().history.len(), 2);
}

#[test]
fn unsupported_format_version_is_corrupt_state() {
    let (store, manager) = make_manager();
    let session = manager.create_session();

    store
        .put_snapshot(&Snapshot {
            id: "snap-future".to_string(),
            session_id: session.id.clone(),
            format_version: SNAPSHOT_FORMAT_VERSION + 1,
            payload: "{}".to_string(),
            created_at: Utc::now(),
        })
        .unwrap();

    let err = manager.rehydrate("snap-future").unwrap_err();
    assert!(matches!(err, LibraryError::CorruptState { .. }));
}

#[test]
fn undecodable_payload_is_corrupt_state() {
    let (store, manager) = make_manager();
    let session = manager.create_session();

    store
        .put_snapshot(&Snapshot {
            id: "snap-garbled".to_string(),
            session_id: session.id.clone(),
            format_version: SNAPSHOT_FORMAT_VERSION,
            payload: "not json at all".to_string(),
            created_at: Utc::now(),
        })
        .unwrap();

    let err = manager.rehydrate("snap-garbled").unwrap_err();
    assert!(matches!(err, LibraryError::CorruptState { .. }));
}

// ═══════════════════════════════════════════════════════════════════════════
// CLOSE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn close_is_terminal() {
    let (_store, manager) = make_manager();
    let session = manager.create_session();

    let closed = manager.close(&session.id).unwrap();
    assert_eq!(closed.state, SessionState::Closed);
    assert_eq!(manager.session_count(), 0);

    assert!(matches!(
        manager.get_session(&session.id).unwrap_err(),
        LibraryError::NotFound { .. }
    ));
    assert!(matches!(
        manager.record_query(&session.id, "q", vec![]).unwrap_err(),
        LibraryError::NotFound { .. }
    ));
    assert!(matches!(
        manager.checkpoint(&session.id).unwrap_err(),
        LibraryError::NotFound { .. }
    ));
}

#[test]
fn closed_session_can_still_rehydrate_from_its_snapshots() {
    let (store, manager) = make_manager();
    let ids = seed_chunks(&store, "walden", 1);
    let session = manager.create_session();
    manager.record_query(&session.id, "pond", ids).unwrap();
    let snapshot = manager.checkpoint(&session.id).unwrap();
    manager.close(&session.id).unwrap();

    let context = manager.rehydrate(&snapshot.id).unwrap();
    assert!(manager.get_session(&context.session_id).is_ok());
}

// ═══════════════════════════════════════════════════════════════════════════
// STALE-SESSION CLEANUP
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn fresh_sessions_survive_cleanup() {
    let (_store, manager) = make_manager();
    manager.create_session();
    manager.create_session();

    let removed = cleanup_stale_sessions(&manager, DEFAULT_IDLE_TIMEOUT);
    assert_eq!(removed, 0);
    assert_eq!(manager.session_count(), 2);
}

#[test]
fn idle_sessions_are_evicted() {
    let (_store, manager) = make_manager();
    let a = manager.create_session();
    let b = manager.create_session();
    std::thread::sleep(Duration::from_millis(10));

    let removed = cleanup_stale_sessions(&manager, chrono::Duration::zero());
    assert_eq!(removed, 2);
    assert_eq!(manager.session_count(), 0);
    assert!(manager.get_session(&a.id).is_err());
    assert!(manager.get_session(&b.id).is_err());
}

#[test]
fn evicted_session_still_rehydrates_from_its_checkpoint() {
    let (store, manager) = make_manager();
    let ids = seed_chunks(&store, "walden", 1);
    let session = manager.create_session();
    manager.record_query(&session.id, "pond", ids.clone()).unwrap();
    let snapshot = manager.checkpoint(&session.id).unwrap();
    std::thread::sleep(Duration::from_millis(10));

    assert_eq!(cleanup_stale_sessions(&manager, chrono::Duration::zero()), 1);
    assert_eq!(manager.session_count(), 0);

    let context = manager.rehydrate(&snapshot.id).unwrap();
    assert_eq!(context.supporting_chunk_ids, ids);
}
