//! Per-concept actionability rules.
//!
//! On disk a rule is either `{"default": tier}` or
//! `{"when": {attr: value | [values], ...}, "tier": tier}`. In memory it is
//! the tagged `ActionabilityRule`, so evaluation runs over a fixed shape.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

use findval_taxonomy::{read_json_table, TableError};

use crate::attributes::{AttributeValue, Attributes};
use crate::tier::ActionabilityTier;

/// Values a condition accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedValues {
    One(String),
    AnyOf(Vec<String>),
}

impl AllowedValues {
    pub fn allows(&self, value: &str) -> bool {
        match self {
            AllowedValues::One(allowed) => allowed == value,
            AllowedValues::AnyOf(allowed) => allowed.iter().any(|a| a == value),
        }
    }

    /// Attribute values are strings, so only JSON strings can ever be
    /// allowed. Anything else (null, numbers, objects) becomes a clause
    /// that never holds.
    fn from_json(value: Value) -> Self {
        match value {
            Value::String(s) => AllowedValues::One(s),
            Value::Array(items) => AllowedValues::AnyOf(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => AllowedValues::AnyOf(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub attribute: String,
    pub allowed: AllowedValues,
}

impl Condition {
    pub fn new(attribute: impl Into<String>, allowed: AllowedValues) -> Self {
        Self {
            attribute: attribute.into(),
            allowed,
        }
    }

    /// Only a single text value can satisfy a condition. Missing and
    /// list-valued attributes fail.
    pub fn matches(&self, attributes: &Attributes) -> bool {
        match attributes.get(&self.attribute) {
            Some(AttributeValue::Text(value)) => self.allowed.allows(value),
            Some(AttributeValue::List(_)) | None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawRule")]
pub enum ActionabilityRule {
    /// Applies unconditionally.
    Default(ActionabilityTier),
    /// Applies when every condition holds. No conditions always holds.
    Conditional {
        conditions: Vec<Condition>,
        tier: ActionabilityTier,
    },
}

impl ActionabilityRule {
    /// The rule's tier if it applies to `attributes`.
    pub fn evaluate(&self, attributes: &Attributes) -> Option<ActionabilityTier> {
        match self {
            ActionabilityRule::Default(tier) => Some(*tier),
            ActionabilityRule::Conditional { conditions, tier } => conditions
                .iter()
                .all(|c| c.matches(attributes))
                .then_some(*tier),
        }
    }
}

#[derive(Deserialize)]
struct RawRule {
    #[serde(default)]
    default: Option<ActionabilityTier>,
    #[serde(default)]
    when: Option<Map<String, Value>>,
    #[serde(default)]
    tier: Option<ActionabilityTier>,
}

impl From<RawRule> for ActionabilityRule {
    fn from(raw: RawRule) -> Self {
        if let Some(tier) = raw.default {
            return ActionabilityRule::Default(tier);
        }
        let conditions = raw
            .when
            .unwrap_or_default()
            .into_iter()
            .map(|(attribute, value)| Condition {
                attribute,
                allowed: AllowedValues::from_json(value),
            })
            .collect();
        ActionabilityRule::Conditional {
            conditions,
            tier: raw.tier.unwrap_or(ActionabilityTier::Conditional),
        }
    }
}

/// Taxonomy id → ordered rule list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RulesTable(HashMap<String, Vec<ActionabilityRule>>);

impl RulesTable {
    pub fn from_json_str(json: &str) -> Result<Self, TableError> {
        serde_json::from_str(json).map_err(|source| TableError::Json {
            path: "<inline>".into(),
            source,
        })
    }

    /// Load `actionability-rules.json`.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        read_json_table(path)
    }

    pub fn insert(&mut self, taxonomy_id: impl Into<String>, rules: Vec<ActionabilityRule>) {
        self.0.insert(taxonomy_id.into(), rules);
    }

    /// Rules for one concept, in evaluation order. Unknown ids have none.
    pub fn rules_for(&self, taxonomy_id: &str) -> &[ActionabilityRule] {
        self.0.get(taxonomy_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_and_conditional_rules_in_order() {
        let table = RulesTable::from_json_str(
            r#"{
                "F003": [
                    {"when": {"size": ["8-15mm", ">15mm"], "features": "spiculated"}, "tier": "critical"},
                    {"when": {"laterality": "left"}},
                    {"default": "incidental"}
                ]
            }"#,
        )
        .unwrap();

        let rules = table.rules_for("F003");
        assert_eq!(rules.len(), 3);
        match &rules[0] {
            ActionabilityRule::Conditional { conditions, tier } => {
                assert_eq!(*tier, ActionabilityTier::Critical);
                let names: Vec<&str> = conditions.iter().map(|c| c.attribute.as_str()).collect();
                assert_eq!(names, vec!["size", "features"]);
                assert_eq!(
                    conditions[0].allowed,
                    AllowedValues::AnyOf(vec!["8-15mm".to_string(), ">15mm".to_string()])
                );
            }
            other => panic!("unexpected rule: {other:?}"),
        }
        assert_eq!(
            rules[1],
            ActionabilityRule::Conditional {
                conditions: vec![Condition::new(
                    "laterality",
                    AllowedValues::One("left".to_string())
                )],
                tier: ActionabilityTier::Conditional,
            }
        );
        assert_eq!(rules[2], ActionabilityRule::Default(ActionabilityTier::Incidental));
        assert!(table.rules_for("F999").is_empty());
    }

    #[test]
    fn non_string_condition_values_never_match() {
        let table = RulesTable::from_json_str(
            r#"{"F1": [{"when": {"count": [2, 3]}, "tier": "significant"},
                       {"when": {"flagged": true}, "tier": "critical"}]}"#,
        )
        .unwrap();
        let attrs = Attributes::new().with("count", "3").with("flagged", "true");
        for rule in table.rules_for("F1") {
            assert_eq!(rule.evaluate(&attrs), None);
        }
    }

    #[test]
    fn malformed_condition_skips_rule_but_keeps_table() {
        let table = RulesTable::from_json_str(
            r#"{
                "F1": [
                    {"when": {"size": null}, "tier": "critical"},
                    {"when": {"size": {"min": 8}}, "tier": "significant"},
                    {"default": "incidental"}
                ],
                "F2": [{"default": "significant"}]
            }"#,
        )
        .unwrap();

        let attrs = Attributes::new().with("size", ">15mm");
        let first_hit = table
            .rules_for("F1")
            .iter()
            .find_map(|rule| rule.evaluate(&attrs));
        assert_eq!(first_hit, Some(ActionabilityTier::Incidental));
        assert_eq!(
            table.rules_for("F2")[0].evaluate(&Attributes::new()),
            Some(ActionabilityTier::Significant)
        );
    }

    #[test]
    fn condition_semantics() {
        let cond = Condition::new(
            "features",
            AllowedValues::AnyOf(vec!["spiculated".to_string(), "lobulated".to_string()]),
        );
        assert!(!cond.matches(&Attributes::new()));
        assert!(cond.matches(&Attributes::new().with("features", "lobulated")));
        assert!(!cond.matches(&Attributes::new().with("features", "calcified")));
    }

    #[test]
    fn list_valued_attribute_never_satisfies_a_condition() {
        let cond = Condition::new(
            "features",
            AllowedValues::AnyOf(vec!["spiculated".to_string()]),
        );
        assert!(!cond.matches(&Attributes::new().with(
            "features",
            vec!["calcified".to_string(), "spiculated".to_string()]
        )));
        assert!(!cond.matches(&Attributes::new().with("features", vec!["spiculated".to_string()])));
        assert!(!cond.matches(&Attributes::new().with("features", Vec::<String>::new())));
    }

    #[test]
    fn empty_when_always_applies() {
        let rule: ActionabilityRule = serde_json::from_str(r#"{"when": {}, "tier": "significant"}"#).unwrap();
        assert_eq!(
            rule.evaluate(&Attributes::new()),
            Some(ActionabilityTier::Significant)
        );
    }
}
