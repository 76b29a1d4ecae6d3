//! Immutable taxonomy snapshot with precomputed lookup keys.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::entry::TaxonomyEntry;
use crate::normalize::content_tokens;
use crate::{read_json_table, TableError};

/// Lowercased comparison keys for one entry, built with the snapshot.
#[derive(Debug, Clone)]
struct EntryKeys {
    name: String,
    synonyms: Vec<String>,
    tokens: HashSet<String>,
}

impl EntryKeys {
    fn build(entry: &TaxonomyEntry) -> Self {
        Self {
            name: entry.name.to_lowercase(),
            synonyms: entry.synonyms.iter().map(|s| s.to_lowercase()).collect(),
            tokens: content_tokens(&entry.name),
        }
    }
}

/// An ordered taxonomy snapshot.
///
/// Scan order is the order entries were supplied in and decides every
/// tie-break. Ids are unique within a snapshot.
#[derive(Debug, Clone, Default)]
pub struct TaxonomyCatalog {
    entries: Vec<TaxonomyEntry>,
    keys: Vec<EntryKeys>,
    by_id: HashMap<String, usize>,
}

impl TaxonomyCatalog {
    pub fn new(entries: Vec<TaxonomyEntry>) -> Result<Self, TableError> {
        let mut by_id = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            if by_id.insert(entry.id.clone(), idx).is_some() {
                return Err(TableError::DuplicateId(entry.id.clone()));
            }
        }
        let keys = entries.iter().map(EntryKeys::build).collect();

        tracing::debug!(entries = entries.len(), "built taxonomy snapshot");
        Ok(Self {
            entries,
            keys,
            by_id,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, TableError> {
        let entries: Vec<TaxonomyEntry> =
            serde_json::from_str(json).map_err(|source| TableError::Json {
                path: "<inline>".into(),
                source,
            })?;
        Self::new(entries)
    }

    /// Load `taxonomy.json` (an array of entries).
    pub fn load(path: &Path) -> Result<Self, TableError> {
        Self::new(read_json_table(path)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in scan order.
    pub fn entries(&self) -> &[TaxonomyEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&TaxonomyEntry> {
        self.by_id.get(id).map(|&idx| &self.entries[idx])
    }

    /// Case-insensitive substring search over canonical names and synonyms.
    ///
    /// An empty query returns every entry. Results keep scan order.
    pub fn search(&self, query: &str) -> Vec<&TaxonomyEntry> {
        if query.is_empty() {
            return self.entries.iter().collect();
        }
        let q = query.to_lowercase();
        self.scan()
            .filter(|(_, keys)| {
                keys.name.contains(&q) || keys.synonyms.iter().any(|s| s.contains(&q))
            })
            .map(|(entry, _)| entry)
            .collect()
    }

    /// First entry whose canonical name or one of its synonyms equals `name`,
    /// ignoring case. Name and synonyms are checked per entry.
    pub fn find_by_name(&self, name: &str) -> Option<&TaxonomyEntry> {
        let lower = name.to_lowercase();
        self.scan()
            .find(|(_, keys)| keys.name == lower || keys.synonyms.iter().any(|s| *s == lower))
            .map(|(entry, _)| entry)
    }

    /// First entry whose lowercased canonical name equals `lower`.
    pub(crate) fn by_canonical_lower(&self, lower: &str) -> Option<&TaxonomyEntry> {
        self.scan()
            .find(|(_, keys)| keys.name == lower)
            .map(|(entry, _)| entry)
    }

    /// First entry with a lowercased synonym equal to `lower`.
    pub(crate) fn by_synonym_lower(&self, lower: &str) -> Option<&TaxonomyEntry> {
        self.scan()
            .find(|(_, keys)| keys.synonyms.iter().any(|s| s == lower))
            .map(|(entry, _)| entry)
    }

    /// Entries paired with their modifier-free name tokens, in scan order.
    pub(crate) fn token_sets(&self) -> impl Iterator<Item = (&TaxonomyEntry, &HashSet<String>)> {
        self.scan().map(|(entry, keys)| (entry, &keys.tokens))
    }

    fn scan(&self) -> impl Iterator<Item = (&TaxonomyEntry, &EntryKeys)> {
        self.entries.iter().zip(self.keys.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::BaseTier;

    fn catalog() -> TaxonomyCatalog {
        TaxonomyCatalog::new(vec![
            TaxonomyEntry::new("F001", "Pleural effusion")
                .with_category("pleura")
                .with_synonyms(["Effusion", "Hydrothorax"])
                .with_base_tier(BaseTier::Conditional),
            TaxonomyEntry::new("F002", "Pneumonia").with_synonyms(["PNA", "Consolidation"]),
            TaxonomyEntry::new("F003", "Pleural thickening"),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = TaxonomyCatalog::new(vec![
            TaxonomyEntry::new("F001", "A"),
            TaxonomyEntry::new("F001", "B"),
        ])
        .unwrap_err();
        assert!(matches!(err, TableError::DuplicateId(id) if id == "F001"));
    }

    #[test]
    fn get_by_id() {
        let c = catalog();
        assert_eq!(c.get("F002").map(|e| e.name.as_str()), Some("Pneumonia"));
        assert!(c.get("F999").is_none());
    }

    #[test]
    fn search_matches_names_and_synonyms_in_scan_order() {
        let c = catalog();
        let ids: Vec<&str> = c.search("PLEURAL").iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["F001", "F003"]);

        let ids: Vec<&str> = c.search("consol").iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["F002"]);

        assert_eq!(c.search("").len(), 3);
        assert!(c.search("fracture").is_empty());
    }

    #[test]
    fn find_by_name_checks_name_then_synonyms() {
        let c = catalog();
        assert_eq!(c.find_by_name("pneumonia").unwrap().id, "F002");
        assert_eq!(c.find_by_name("hydrothorax").unwrap().id, "F001");
        assert!(c.find_by_name("pleural").is_none());
    }

    #[test]
    fn parses_inline_json() {
        let c = TaxonomyCatalog::from_json_str(
            r#"[{"id": "F1", "name": "Cardiomegaly", "actionability": "significant"}]"#,
        )
        .unwrap();
        assert_eq!(c.len(), 1);
        assert_eq!(c.get("F1").unwrap().base_tier, Some(BaseTier::Significant));
    }
}
