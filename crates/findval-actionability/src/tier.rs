use serde::{Deserialize, Serialize};
use std::fmt;

use findval_taxonomy::BaseTier;

/// Resolved clinical follow-up priority of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionabilityTier {
    Critical,
    Significant,
    Incidental,
    Conditional,
    NotActionable,
}

impl ActionabilityTier {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionabilityTier::Critical => "critical",
            ActionabilityTier::Significant => "significant",
            ActionabilityTier::Incidental => "incidental",
            ActionabilityTier::Conditional => "conditional",
            ActionabilityTier::NotActionable => "not_actionable",
        }
    }
}

impl From<BaseTier> for ActionabilityTier {
    fn from(base: BaseTier) -> Self {
        match base {
            BaseTier::Critical => ActionabilityTier::Critical,
            BaseTier::Significant => ActionabilityTier::Significant,
            BaseTier::Incidental => ActionabilityTier::Incidental,
            BaseTier::Conditional => ActionabilityTier::Conditional,
        }
    }
}

impl fmt::Display for ActionabilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
