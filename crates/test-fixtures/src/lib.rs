//! Loader for the golden datasets under the workspace `test-fixtures/`
//! directory, plus the typed shapes of those files. Integration tests in
//! this crate's `tests/` drive the assembled library against them.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;

/// Root directory of the test-fixtures data folder.
fn fixtures_root() -> PathBuf {
    // Works from any crate in the workspace: walk up until the data
    // directory appears next to us.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);
    while !path.join("test-fixtures").join("golden").exists() {
        if !path.pop() {
            panic!("could not find test-fixtures/golden from CARGO_MANIFEST_DIR={manifest_dir}");
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("failed to parse fixture {}: {}", path.display(), e))
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// The golden corpus: a handful of public-domain works with distinct
/// vocabularies, small enough to ingest in every test run.
#[derive(Debug, Deserialize)]
pub struct CorpusFixture {
    pub works: Vec<WorkFixture>,
}

#[derive(Debug, Deserialize)]
pub struct WorkFixture {
    pub slug: String,
    pub title: String,
    pub tags: Vec<String>,
    pub text: String,
}

/// Retrieval cases over the golden corpus.
#[derive(Debug, Deserialize)]
pub struct QueryCases {
    pub cases: Vec<QueryCase>,
}

#[derive(Debug, Deserialize)]
pub struct QueryCase {
    pub query: String,
    /// Work tags the results must be filtered to. Empty = no filter.
    pub tags: Vec<String>,
    /// Slug of the work the top result must come from.
    pub expect_top_slug: String,
    /// When true, every result must come from the expected work.
    pub exclusive: bool,
}

/// Verification cases over the golden corpus. Each claim restates one
/// stored chunk verbatim, so its verdict is fully determined.
#[derive(Debug, Deserialize)]
pub struct ClaimCases {
    pub cases: Vec<ClaimCase>,
}

#[derive(Debug, Deserialize)]
pub struct ClaimCase {
    pub id: String,
    pub slug: String,
    pub ordinal: u32,
    pub expected_verdict: String,
}

pub fn golden_corpus() -> CorpusFixture {
    load_fixture("golden/corpus.json")
}

pub fn golden_queries() -> QueryCases {
    load_fixture("golden/queries.json")
}

pub fn golden_claims() -> ClaimCases {
    load_fixture("golden/claims.json")
}
