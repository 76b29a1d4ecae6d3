//! Bulk-import triage of raw finding names.
//!
//! Imported extraction files carry free-text finding names. Before anything
//! is written, each distinct name is bucketed:
//! - `matched`: resolved by exact, synonym or normality tiers (trusted),
//! - `fuzzy`: a token-overlap candidate at the triage threshold, pending
//!   operator confirmation,
//! - `unmatched`: kept as a custom finding.
//!
//! Fuzzy candidates scoring at least `FUZZY_AUTO_ACCEPT_SCORE` start out
//! accepted; the operator can toggle any candidate.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::matcher::{MatchTier, TaxonomyMatcher, TRIAGE_FUZZY_THRESHOLD};

/// Fuzzy candidates at or above this score are pre-accepted.
pub const FUZZY_AUTO_ACCEPT_SCORE: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageHit {
    pub id: String,
    pub name: String,
    pub tier: MatchTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyCandidate {
    pub id: String,
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriageReport {
    pub matched: BTreeMap<String, TriageHit>,
    pub fuzzy: BTreeMap<String, FuzzyCandidate>,
    pub unmatched: Vec<String>,
    /// Raw names whose fuzzy candidate is accepted.
    pub accepted: BTreeSet<String>,
}

impl TriageReport {
    pub fn is_accepted(&self, raw: &str) -> bool {
        self.accepted.contains(raw)
    }

    /// Flip acceptance of a fuzzy candidate and return the new state.
    /// `None` when `raw` has no fuzzy candidate; such names are never
    /// accepted.
    pub fn toggle_accept(&mut self, raw: &str) -> Option<bool> {
        if !self.fuzzy.contains_key(raw) {
            return None;
        }
        if self.accepted.remove(raw) {
            Some(false)
        } else {
            self.accepted.insert(raw.to_string());
            Some(true)
        }
    }

    /// Name to store for an imported finding: the canonical name when matched
    /// or when an accepted fuzzy candidate exists, else the raw name.
    pub fn resolved_name<'r>(&'r self, raw: &'r str) -> &'r str {
        if let Some(hit) = self.matched.get(raw) {
            return &hit.name;
        }
        match self.fuzzy.get(raw) {
            Some(candidate) if self.is_accepted(raw) => &candidate.name,
            _ => raw,
        }
    }

    pub fn total(&self) -> usize {
        self.matched.len() + self.fuzzy.len() + self.unmatched.len()
    }
}

impl<'a> TaxonomyMatcher<'a> {
    /// Triage raw finding names. Duplicates are collapsed and names are
    /// processed in sorted order.
    pub fn triage<I, S>(&self, names: I) -> TriageReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: BTreeSet<String> = names
            .into_iter()
            .map(|n| n.as_ref().to_string())
            .collect();

        let mut report = TriageReport::default();
        for name in unique {
            if let Some(hit) = self.match_exact_or_normality(&name) {
                report.matched.insert(
                    name,
                    TriageHit {
                        id: hit.entry.id.clone(),
                        name: hit.entry.name.clone(),
                        tier: hit.tier,
                    },
                );
            } else if let Some(hit) = self.fuzzy_match(&name, TRIAGE_FUZZY_THRESHOLD) {
                if hit.score >= FUZZY_AUTO_ACCEPT_SCORE {
                    report.accepted.insert(name.clone());
                }
                report.fuzzy.insert(
                    name,
                    FuzzyCandidate {
                        id: hit.entry.id.clone(),
                        name: hit.entry.name.clone(),
                        score: hit.score,
                    },
                );
            } else {
                report.unmatched.push(name);
            }
        }

        tracing::info!(
            matched = report.matched.len(),
            fuzzy = report.fuzzy.len(),
            unmatched = report.unmatched.len(),
            "triaged imported finding names"
        );
        report
    }
}
