use greds_core::config::*;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = LibraryConfig::from_toml("").unwrap();

    // Storage defaults
    assert_eq!(config.storage.db_path, "greds.db");
    assert_eq!(config.storage.read_pool_size, 4);

    // Chunking defaults
    assert_eq!(config.chunking.chunk_size_tokens, 1_024);
    assert!((config.chunking.overlap_fraction - 0.2).abs() < f64::EPSILON);

    // Retrieval defaults
    assert_eq!(config.retrieval.default_k, 10);
    assert_eq!(config.retrieval.max_k, 100);

    // Summary defaults
    assert_eq!(config.summary.short_max_chars, 160);
    assert_eq!(config.summary.medium_max_chars, 600);
    assert_eq!(config.summary.long_max_chars, 2_000);

    // Session defaults
    assert_eq!(config.session.checkpoint_citation_limit, 10);

    // Provider defaults
    assert_eq!(config.provider.embedding_dimensions, 384);
    assert_eq!(config.provider.timeout_ms, 2_000);
    assert_eq!(config.provider.max_retries, 3);
    assert_eq!(config.provider.backoff_ms, 100);

    // Observability defaults
    assert_eq!(config.observability.log_level, "info");
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[storage]
db_path = "/custom/library.db"
read_pool_size = 8

[retrieval]
default_k = 25
"#;
    let config = LibraryConfig::from_toml(toml).unwrap();
    assert_eq!(config.storage.db_path, "/custom/library.db");
    assert_eq!(config.storage.read_pool_size, 8);
    // Non-overridden fields keep defaults
    assert_eq!(config.retrieval.default_k, 25);
    assert_eq!(config.retrieval.max_k, 100);
}

#[test]
fn config_rejects_malformed_toml() {
    let result = LibraryConfig::from_toml("[storage\ndb_path = 3");
    assert!(result.is_err());
}

#[test]
fn config_loads_from_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("greds.toml");
    std::fs::write(&path, "[summary]\nshort_max_chars = 80\n").unwrap();

    let config = LibraryConfig::from_file(&path).unwrap();
    assert_eq!(config.summary.short_max_chars, 80);
    assert_eq!(config.summary.medium_max_chars, 600);

    let missing = LibraryConfig::from_file(&dir.path().join("absent.toml"));
    assert!(missing.is_err());
}

#[test]
fn validate_accepts_defaults() {
    LibraryConfig::default().validate().unwrap();
}

#[test]
fn validate_rejects_zero_chunk_size() {
    let mut config = LibraryConfig::default();
    config.chunking.chunk_size_tokens = 0;
    assert!(config.validate().is_err());
}

#[test]
fn validate_rejects_overlap_of_one_or_more() {
    let mut config = LibraryConfig::default();
    config.chunking.overlap_fraction = 1.0;
    assert!(config.validate().is_err());
}

#[test]
fn validate_rejects_default_k_above_max_k() {
    let mut config = LibraryConfig::default();
    config.retrieval.default_k = 500;
    assert!(config.validate().is_err());
}
