//! Actionability tier resolution for reviewed findings
//!
//! Given a finding's resolved taxonomy id and its attributes, compute the
//! clinical follow-up priority:
//!
//! - absent findings are never actionable,
//! - unconditional base tiers (`critical`, `significant`, `incidental`) apply as is,
//! - `conditional` concepts are decided by the per-concept rule list.
//!
//! Resolution is pure and total; it is safe to call on every attribute edit.

pub mod attributes;
pub mod resolver;
pub mod rules;
pub mod tier;

pub use attributes::{
    AttributeConfig, AttributeKind, AttributeSpec, AttributeValue, Attributes, Finding, Presence,
};
pub use resolver::{resolve, ActionabilityResolver, BaseTierLookup};
pub use rules::{ActionabilityRule, AllowedValues, Condition, RulesTable};
pub use tier::ActionabilityTier;
