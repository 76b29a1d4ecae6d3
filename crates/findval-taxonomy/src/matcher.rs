//! Finding-name → taxonomy matching cascade.
//!
//! Tiers, in order, each tried only when the previous ones found nothing:
//!
//! 1. `Exact`: normalized name equals a canonical name
//! 2. `Synonym`: normalized name equals a synonym
//! 3. `Normality`: normality-mapping table points at a canonical name
//! 4. `Fuzzy`: best Jaccard token overlap above a threshold
//!
//! Within a tier the first entry in scan order wins. "No match" is an ordinary
//! outcome (the finding is treated as unmapped/custom) and is returned as
//! `None`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::TaxonomyCatalog;
use crate::entry::TaxonomyEntry;
use crate::normality::NormalityMappings;
use crate::normalize::{content_tokens, jaccard, normalize_name, spaced};

/// Fuzzy acceptance threshold for interactive matching.
pub const INTERACTIVE_FUZZY_THRESHOLD: f64 = 0.5;

/// Fuzzy acceptance threshold for bulk-import triage, where an operator
/// confirms every fuzzy candidate.
pub const TRIAGE_FUZZY_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    Synonym,
    Normality,
    Fuzzy,
}

impl MatchTier {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchTier::Exact => "exact",
            MatchTier::Synonym => "synonym",
            MatchTier::Normality => "normality",
            MatchTier::Fuzzy => "fuzzy",
        }
    }

    fn resolve<'a>(
        self,
        matcher: &TaxonomyMatcher<'a>,
        query: &MatchQuery<'_>,
    ) -> Option<TaxonomyMatch<'a>> {
        match self {
            MatchTier::Exact => exact_tier(matcher, query),
            MatchTier::Synonym => synonym_tier(matcher, query),
            MatchTier::Normality => normality_tier(matcher, query),
            MatchTier::Fuzzy => fuzzy_tier(matcher, query),
        }
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tiers that never guess: used where a silent fuzzy hit is unacceptable.
const STRICT_CASCADE: &[MatchTier] = &[MatchTier::Exact, MatchTier::Synonym, MatchTier::Normality];

const FULL_CASCADE: &[MatchTier] = &[
    MatchTier::Exact,
    MatchTier::Synonym,
    MatchTier::Normality,
    MatchTier::Fuzzy,
];

/// A resolved match and the tier that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxonomyMatch<'a> {
    pub entry: &'a TaxonomyEntry,
    pub tier: MatchTier,
    /// Jaccard score, present for fuzzy hits only.
    pub score: Option<f64>,
}

/// A fuzzy hit with its raw score, for operator confirmation of borderline
/// matches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatch<'a> {
    pub entry: &'a TaxonomyEntry,
    pub score: f64,
}

/// Per-call derived forms of the raw name.
struct MatchQuery<'q> {
    raw: &'q str,
    normalized: String,
    spaced: String,
    threshold: f64,
}

impl<'q> MatchQuery<'q> {
    fn new(raw: &'q str, threshold: f64) -> Self {
        let normalized = normalize_name(raw);
        let spaced = spaced(&normalized);
        Self {
            raw,
            normalized,
            spaced,
            threshold,
        }
    }
}

/// Matches raw finding names against one taxonomy snapshot.
///
/// Holds only shared references; cheap to copy and safe to use from any
/// number of threads.
#[derive(Debug, Clone, Copy)]
pub struct TaxonomyMatcher<'a> {
    catalog: &'a TaxonomyCatalog,
    normality: Option<&'a NormalityMappings>,
}

impl<'a> TaxonomyMatcher<'a> {
    pub fn new(catalog: &'a TaxonomyCatalog) -> Self {
        Self {
            catalog,
            normality: None,
        }
    }

    pub fn with_normality(mut self, mappings: &'a NormalityMappings) -> Self {
        self.normality = Some(mappings);
        self
    }

    pub fn catalog(&self) -> &'a TaxonomyCatalog {
        self.catalog
    }

    /// Full cascade at the interactive fuzzy threshold.
    pub fn match_name(&self, raw: &str) -> Option<&'a TaxonomyEntry> {
        self.match_detailed(raw, INTERACTIVE_FUZZY_THRESHOLD)
            .map(|m| m.entry)
    }

    /// Full cascade with a caller-supplied fuzzy threshold, reporting which
    /// tier matched.
    pub fn match_detailed(&self, raw: &str, threshold: f64) -> Option<TaxonomyMatch<'a>> {
        self.run(FULL_CASCADE, &MatchQuery::new(raw, threshold))
    }

    /// Exact, synonym and normality tiers only.
    pub fn match_exact_or_normality(&self, raw: &str) -> Option<TaxonomyMatch<'a>> {
        self.run(STRICT_CASCADE, &MatchQuery::new(raw, 1.0))
    }

    /// Best token-overlap match, accepted only when `score >= threshold`.
    pub fn fuzzy_match(&self, raw: &str, threshold: f64) -> Option<FuzzyMatch<'a>> {
        let input = content_tokens(raw);
        if input.is_empty() {
            return None;
        }

        let mut best: Option<FuzzyMatch<'a>> = None;
        for (entry, tokens) in self.catalog.token_sets() {
            if tokens.is_empty() {
                continue;
            }
            let score = jaccard(&input, tokens);
            // Strictly greater: ties keep the earlier entry, and a zero
            // overlap never becomes a candidate.
            if score > best.map_or(0.0, |b| b.score) {
                best = Some(FuzzyMatch { entry, score });
            }
        }

        best.filter(|b| b.score >= threshold)
    }

    /// Every entry a normality mapping resolves to, in mapping order.
    ///
    /// The cascade only uses the first candidate; this exposes the full
    /// decomposition for callers that expand it into several findings.
    /// Candidate names missing from the taxonomy are skipped.
    pub fn normality_candidates(&self, raw: &str) -> Vec<&'a TaxonomyEntry> {
        let Some(target) = self.normality.and_then(|m| m.get(&normalize_name(raw))) else {
            return Vec::new();
        };
        target
            .candidates()
            .iter()
            .filter_map(|name| self.catalog.by_canonical_lower(&name.to_lowercase()))
            .collect()
    }

    fn run(&self, tiers: &[MatchTier], query: &MatchQuery<'_>) -> Option<TaxonomyMatch<'a>> {
        let hit = tiers.iter().find_map(|tier| tier.resolve(self, query));
        match &hit {
            Some(m) => tracing::debug!(
                raw = query.raw,
                tier = %m.tier,
                id = %m.entry.id,
                "matched finding name"
            ),
            None => tracing::debug!(raw = query.raw, "finding name left unmapped"),
        }
        hit
    }
}

// ============================================================================
// Tier resolvers
// ============================================================================

fn exact_tier<'a>(m: &TaxonomyMatcher<'a>, q: &MatchQuery<'_>) -> Option<TaxonomyMatch<'a>> {
    m.catalog
        .by_canonical_lower(&q.spaced)
        .map(|entry| TaxonomyMatch {
            entry,
            tier: MatchTier::Exact,
            score: None,
        })
}

fn synonym_tier<'a>(m: &TaxonomyMatcher<'a>, q: &MatchQuery<'_>) -> Option<TaxonomyMatch<'a>> {
    m.catalog
        .by_synonym_lower(&q.spaced)
        .map(|entry| TaxonomyMatch {
            entry,
            tier: MatchTier::Synonym,
            score: None,
        })
}

fn normality_tier<'a>(m: &TaxonomyMatcher<'a>, q: &MatchQuery<'_>) -> Option<TaxonomyMatch<'a>> {
    let target = m.normality?.get(&q.normalized)?.primary()?;
    m.catalog
        .by_canonical_lower(&target.to_lowercase())
        .map(|entry| TaxonomyMatch {
            entry,
            tier: MatchTier::Normality,
            score: None,
        })
}

fn fuzzy_tier<'a>(m: &TaxonomyMatcher<'a>, q: &MatchQuery<'_>) -> Option<TaxonomyMatch<'a>> {
    m.fuzzy_match(q.raw, q.threshold).map(|hit| TaxonomyMatch {
        entry: hit.entry,
        tier: MatchTier::Fuzzy,
        score: Some(hit.score),
    })
}
