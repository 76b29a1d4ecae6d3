//! Normality mappings: informal or negative phrasing → canonical names.
//!
//! A mapped value is either one canonical name or an ordered list of
//! candidates (decomposition: e.g. "normal cardiomediastinal silhouette"
//! covering several concepts at once). The matching cascade only consults the
//! first candidate; `candidates()` exposes the whole list.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;

use crate::normalize::normalize_name;
use crate::{read_json_table, TableError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NormalityTarget {
    Single(String),
    Decomposed(Vec<String>),
}

impl NormalityTarget {
    /// The target the cascade resolves: the single name, or the first
    /// decomposition candidate. An empty list has no primary.
    pub fn primary(&self) -> Option<&str> {
        match self {
            NormalityTarget::Single(name) => Some(name.as_str()),
            NormalityTarget::Decomposed(names) => names.first().map(String::as_str),
        }
    }

    pub fn candidates(&self) -> &[String] {
        match self {
            NormalityTarget::Single(name) => std::slice::from_ref(name),
            NormalityTarget::Decomposed(names) => names,
        }
    }

    pub fn is_decomposed(&self) -> bool {
        matches!(self, NormalityTarget::Decomposed(_))
    }
}

/// Normality-mapping table keyed by normalized (underscored) finding name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "HashMap<String, NormalityTarget>")]
pub struct NormalityMappings {
    map: HashMap<String, NormalityTarget>,
}

impl From<HashMap<String, NormalityTarget>> for NormalityMappings {
    fn from(raw: HashMap<String, NormalityTarget>) -> Self {
        raw.into_iter().collect()
    }
}

impl FromIterator<(String, NormalityTarget)> for NormalityMappings {
    fn from_iter<I: IntoIterator<Item = (String, NormalityTarget)>>(iter: I) -> Self {
        // Keys are normalized so hand-written tables ("No Effusion") line up
        // with the lookup key space. When several raw keys collapse onto one
        // normalized key, an already-normalized key wins, then the
        // lexicographically smallest raw key.
        let mut ranked: HashMap<String, (String, NormalityTarget)> = HashMap::new();
        for (raw, target) in iter {
            let key = normalize_name(&raw);
            match ranked.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert((raw, target));
                }
                Entry::Occupied(mut slot) => {
                    let key = slot.key();
                    let (kept, _) = slot.get();
                    if (raw != *key, &raw) < (kept != key, kept) {
                        tracing::warn!(kept = %raw, dropped = %kept, "normality keys collide");
                        slot.insert((raw, target));
                    } else {
                        tracing::warn!(kept = %kept, dropped = %raw, "normality keys collide");
                    }
                }
            }
        }
        Self {
            map: ranked
                .into_iter()
                .map(|(key, (_, target))| (key, target))
                .collect(),
        }
    }
}

impl NormalityMappings {
    pub fn from_json_str(json: &str) -> Result<Self, TableError> {
        serde_json::from_str(json).map_err(|source| TableError::Json {
            path: "<inline>".into(),
            source,
        })
    }

    /// Load `normality-mappings.json`.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        read_json_table(path)
    }

    /// Look up an already-normalized name.
    pub fn get(&self, normalized: &str) -> Option<&NormalityTarget> {
        self.map.get(normalized)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_and_decomposed_targets() {
        let m = NormalityMappings::from_json_str(
            r#"{
                "no_effusion": "Pleural effusion",
                "normal_cardiomediastinal_silhouette": ["Cardiomegaly", "Mediastinal widening"]
            }"#,
        )
        .unwrap();

        let single = m.get("no_effusion").unwrap();
        assert_eq!(single.primary(), Some("Pleural effusion"));
        assert!(!single.is_decomposed());

        let decomposed = m.get("normal_cardiomediastinal_silhouette").unwrap();
        assert_eq!(decomposed.primary(), Some("Cardiomegaly"));
        assert_eq!(decomposed.candidates().len(), 2);
    }

    #[test]
    fn keys_are_normalized_on_load() {
        let m = NormalityMappings::from_json_str(r#"{"No Pneumothorax": "Pneumothorax"}"#).unwrap();
        assert!(m.get("no_pneumothorax").is_some());
    }

    #[test]
    fn colliding_keys_prefer_the_normalized_spelling() {
        for _ in 0..16 {
            let m = NormalityMappings::from_json_str(
                r#"{"No Effusion": "A", "no_effusion": "B", "NO effusion": "C"}"#,
            )
            .unwrap();
            assert_eq!(m.len(), 1);
            assert_eq!(m.get("no_effusion").unwrap().primary(), Some("B"));
        }
    }

    #[test]
    fn colliding_raw_keys_fall_back_to_lexical_order() {
        let m: NormalityMappings = [
            ("No Effusion".to_string(), NormalityTarget::Single("A".into())),
            ("NO effusion".to_string(), NormalityTarget::Single("C".into())),
        ]
        .into_iter()
        .collect();
        assert_eq!(m.get("no_effusion").unwrap().primary(), Some("C"));

        let reversed: NormalityMappings = [
            ("NO effusion".to_string(), NormalityTarget::Single("C".into())),
            ("No Effusion".to_string(), NormalityTarget::Single("A".into())),
        ]
        .into_iter()
        .collect();
        assert_eq!(reversed.get("no_effusion").unwrap().primary(), Some("C"));
    }

    #[test]
    fn empty_decomposition_has_no_primary() {
        assert_eq!(NormalityTarget::Decomposed(vec![]).primary(), None);
    }
}
