//! Taxonomy snapshots and finding-name matching for findval
//!
//! Provides:
//! - `TaxonomyCatalog`: an immutable, ordered snapshot of taxonomy entries with
//!   precomputed lookup keys (lowercase names, synonyms, fuzzy token sets)
//! - `NormalityMappings`: informal/negative phrasing → canonical name(s)
//! - `TaxonomyMatcher`: the exact → synonym → normality → fuzzy cascade
//! - `TriageReport`: bulk-import classification of raw finding names
//!
//! Nothing in this crate mutates a snapshot after it is built. A new taxonomy
//! means a new `TaxonomyCatalog`; every cache is rebuilt eagerly.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

pub mod catalog;
pub mod entry;
pub mod matcher;
pub mod normality;
pub mod normalize;
pub mod triage;

pub use catalog::TaxonomyCatalog;
pub use entry::{BaseTier, TaxonomyEntry};
pub use matcher::{
    FuzzyMatch, MatchTier, TaxonomyMatch, TaxonomyMatcher, INTERACTIVE_FUZZY_THRESHOLD,
    TRIAGE_FUZZY_THRESHOLD,
};
pub use normality::{NormalityMappings, NormalityTarget};
pub use normalize::{jaccard, normalize_name, MODIFIER_STOPLIST};
pub use triage::{FuzzyCandidate, TriageHit, TriageReport, FUZZY_AUTO_ACCEPT_SCORE};

// ============================================================================
// Table loading
// ============================================================================

/// Errors raised while reading external tables or building a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to read table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse table {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate taxonomy id `{0}`")]
    DuplicateId(String),
}

/// Read and deserialize a JSON table from disk.
///
/// Shared by every crate that loads a collaborator-supplied table
/// (taxonomy, attribute config, rules, normality mappings).
pub fn read_json_table<T: DeserializeOwned>(path: &Path) -> Result<T, TableError> {
    let text = std::fs::read_to_string(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| TableError::Json {
        path: path.to_path_buf(),
        source,
    })
}
