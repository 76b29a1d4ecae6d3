//! Taxonomy entry types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Taxonomy-declared default actionability of a concept.
///
/// `Conditional` defers the decision to per-finding rules evaluated against
/// the finding's attributes; the other three are unconditional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseTier {
    Critical,
    Significant,
    Incidental,
    Conditional,
}

impl BaseTier {
    pub fn as_str(self) -> &'static str {
        match self {
            BaseTier::Critical => "critical",
            BaseTier::Significant => "significant",
            BaseTier::Incidental => "incidental",
            BaseTier::Conditional => "conditional",
        }
    }

    pub fn is_unconditional(self) -> bool {
        !matches!(self, BaseTier::Conditional)
    }
}

impl fmt::Display for BaseTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A canonical clinical concept in the controlled taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    pub id: String,
    /// Canonical display name (original casing).
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    /// Base tier; `None` for concepts that carry no actionability.
    #[serde(default, rename = "actionability")]
    pub base_tier: Option<BaseTier>,
}

impl TaxonomyEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: String::new(),
            synonyms: Vec::new(),
            base_tier: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms = synonyms.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_base_tier(mut self, tier: BaseTier) -> Self {
        self.base_tier = Some(tier);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_taxonomy_row_with_optional_fields() {
        let json = r#"[
            {"id": "F001", "name": "Pleural effusion", "category": "pleura",
             "synonyms": ["effusion"], "actionability": "conditional"},
            {"id": "F002", "name": "Pneumothorax"}
        ]"#;
        let entries: Vec<TaxonomyEntry> = serde_json::from_str(json).unwrap();

        assert_eq!(entries[0].base_tier, Some(BaseTier::Conditional));
        assert_eq!(entries[0].synonyms, vec!["effusion".to_string()]);
        assert_eq!(entries[1].category, "");
        assert!(entries[1].synonyms.is_empty());
        assert_eq!(entries[1].base_tier, None);
    }

    #[test]
    fn null_actionability_is_none() {
        let entry: TaxonomyEntry =
            serde_json::from_str(r#"{"id": "F9", "name": "Granuloma", "actionability": null}"#)
                .unwrap();
        assert_eq!(entry.base_tier, None);
    }

    #[test]
    fn only_conditional_defers_to_rules() {
        assert!(BaseTier::Critical.is_unconditional());
        assert!(BaseTier::Incidental.is_unconditional());
        assert!(!BaseTier::Conditional.is_unconditional());
    }
}
