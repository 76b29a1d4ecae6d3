//! Tier resolution.

use std::collections::HashMap;

use findval_taxonomy::{BaseTier, TaxonomyCatalog};

use crate::attributes::{Attributes, Finding, Presence};
use crate::rules::RulesTable;
use crate::tier::ActionabilityTier;

/// Taxonomy id → base tier, for entries that declare one.
///
/// Built once per taxonomy snapshot and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseTierLookup(HashMap<String, BaseTier>);

impl BaseTierLookup {
    pub fn from_catalog(catalog: &TaxonomyCatalog) -> Self {
        catalog
            .entries()
            .iter()
            .filter_map(|e| e.base_tier.map(|tier| (e.id.clone(), tier)))
            .collect()
    }

    pub fn get(&self, taxonomy_id: &str) -> Option<BaseTier> {
        self.0.get(taxonomy_id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, BaseTier)> for BaseTierLookup {
    fn from_iter<I: IntoIterator<Item = (K, BaseTier)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Resolve the actionability tier of a finding.
///
/// Returns `None` when the concept has no base tier. Otherwise, in order:
/// absent presence → `NotActionable`; unconditional base tier → that tier;
/// `temporal_status == "unchanged"` → `Incidental`; first matching rule;
/// `Conditional`.
pub fn resolve(
    taxonomy_id: &str,
    attributes: &Attributes,
    lookup: &BaseTierLookup,
    rules: &RulesTable,
) -> Option<ActionabilityTier> {
    let base = lookup.get(taxonomy_id)?;

    if attributes.presence() == Some(Presence::Absent) {
        return Some(ActionabilityTier::NotActionable);
    }
    if base.is_unconditional() {
        return Some(base.into());
    }
    if attributes.temporal_status() == Some("unchanged") {
        return Some(ActionabilityTier::Incidental);
    }

    for (idx, rule) in rules.rules_for(taxonomy_id).iter().enumerate() {
        if let Some(tier) = rule.evaluate(attributes) {
            tracing::trace!(taxonomy_id, rule = idx, %tier, "actionability rule matched");
            return Some(tier);
        }
    }
    Some(ActionabilityTier::Conditional)
}

/// Base-tier lookup and rules table for one session.
#[derive(Debug, Clone, Default)]
pub struct ActionabilityResolver {
    lookup: BaseTierLookup,
    rules: RulesTable,
}

impl ActionabilityResolver {
    pub fn new(lookup: BaseTierLookup, rules: RulesTable) -> Self {
        Self { lookup, rules }
    }

    pub fn from_catalog(catalog: &TaxonomyCatalog, rules: RulesTable) -> Self {
        Self::new(BaseTierLookup::from_catalog(catalog), rules)
    }

    pub fn lookup(&self) -> &BaseTierLookup {
        &self.lookup
    }

    pub fn rules(&self) -> &RulesTable {
        &self.rules
    }

    pub fn resolve(&self, taxonomy_id: &str, attributes: &Attributes) -> Option<ActionabilityTier> {
        resolve(taxonomy_id, attributes, &self.lookup, &self.rules)
    }

    /// Tier of a finding; unmapped findings have none.
    pub fn resolve_finding(&self, finding: &Finding) -> Option<ActionabilityTier> {
        let id = finding.taxonomy_id.as_deref()?;
        self.resolve(id, &finding.attributes)
    }
}
