//! Finding attributes and the attribute configuration table.
//!
//! Attribute values are opaque to resolution: either a single string or a
//! list of strings. Only `presence` and `temporal_status` carry meaning here.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use findval_taxonomy::{read_json_table, TableError};

pub const PRESENCE: &str = "presence";
pub const TEMPORAL_STATUS: &str = "temporal_status";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    List(Vec<String>),
}

impl AttributeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            AttributeValue::List(_) => None,
        }
    }

    /// The value's elements: one for text, all for a list.
    pub fn values(&self) -> &[String] {
        match self {
            AttributeValue::Text(s) => std::slice::from_ref(s),
            AttributeValue::List(items) => items,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(items: Vec<String>) -> Self {
        AttributeValue::List(items)
    }
}

/// Attribute name → value for one finding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, AttributeValue>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name)
    }

    /// Text value of an attribute; `None` when missing or list-valued.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttributeValue::as_text)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        self.0.remove(name)
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn presence(&self) -> Option<Presence> {
        self.text(PRESENCE).and_then(Presence::parse)
    }

    pub fn temporal_status(&self) -> Option<&str> {
        self.text(TEMPORAL_STATUS)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttributeValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Present,
    Absent,
    Indeterminate,
}

impl Presence {
    /// Exact lowercase match, as stored by the review workflow.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "present" => Some(Presence::Present),
            "absent" => Some(Presence::Absent),
            "indeterminate" => Some(Presence::Indeterminate),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Presence::Present => "present",
            Presence::Absent => "absent",
            Presence::Indeterminate => "indeterminate",
        }
    }
}

/// A reviewed or extracted finding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub name: String,
    #[serde(default)]
    pub taxonomy_id: Option<String>,
    #[serde(default)]
    pub attributes: Attributes,
}

// ============================================================================
// Attribute configuration
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    String,
    Enum,
    Array,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSpec {
    #[serde(rename = "type")]
    pub kind: AttributeKind,
    #[serde(default)]
    pub values: Vec<String>,
}

/// Attribute name → type and allowed values.
///
/// Resolution never consults this table; it drives how edited values are
/// shaped before they reach a finding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeConfig(HashMap<String, AttributeSpec>);

impl AttributeConfig {
    pub fn from_json_str(json: &str) -> Result<Self, TableError> {
        serde_json::from_str(json).map_err(|source| TableError::Json {
            path: "<inline>".into(),
            source,
        })
    }

    /// Load `attributes.json`.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        read_json_table(path)
    }

    pub fn get(&self, name: &str) -> Option<&AttributeSpec> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Attribute names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.0.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Shape a raw edited value for attribute `name`.
    ///
    /// `array` attributes split on commas (trimmed, empties dropped); all
    /// others keep the value exactly as typed. Only an empty value yields
    /// `None`, meaning the attribute should be removed.
    pub fn parse_value(&self, name: &str, raw: &str) -> Option<AttributeValue> {
        if raw.is_empty() {
            return None;
        }
        match self.get(name).map(|spec| spec.kind) {
            Some(AttributeKind::Array) => Some(AttributeValue::List(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
            _ => Some(AttributeValue::Text(raw.to_string())),
        }
    }

    /// Apply an edit to `attributes`: set the parsed value or remove the
    /// attribute when the value is empty.
    pub fn apply_edit(&self, attributes: &mut Attributes, name: &str, raw: &str) {
        match self.parse_value(name, raw) {
            Some(value) => attributes.set(name, value),
            None => {
                attributes.remove(name);
            }
        }
    }
}
