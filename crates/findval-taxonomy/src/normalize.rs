//! Name normalization and token-overlap scoring.

use std::collections::HashSet;

/// Clinical modifiers ignored by fuzzy matching.
///
/// Laterality, severity, size and chronicity adjectives describe a finding
/// instance rather than the concept, so "left lung nodule" should score as
/// "lung nodule".
pub const MODIFIER_STOPLIST: &[&str] = &[
    "right",
    "left",
    "bilateral",
    "mild",
    "moderate",
    "severe",
    "small",
    "medium",
    "large",
    "acute",
    "chronic",
    "new",
    "stable",
    "focal",
    "diffuse",
    "minimal",
    "subtle",
    "extensive",
];

/// Normalize a finding name for lookup: lowercase, trim, and replace each
/// remaining whitespace character with `_`.
///
/// The underscored form is the key space of the normality-mapping table.
///
/// ```
/// use findval_taxonomy::normalize_name;
///
/// assert_eq!(normalize_name("  Pleural Effusion "), "pleural_effusion");
/// assert_eq!(normalize_name("pleural_effusion"), "pleural_effusion");
/// ```
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// The spaced form of a normalized name, compared against canonical names
/// and synonyms.
pub fn spaced(normalized: &str) -> String {
    normalized.replace('_', " ")
}

pub fn is_modifier(token: &str) -> bool {
    MODIFIER_STOPLIST.contains(&token)
}

/// Lowercased whitespace tokens with clinical modifiers removed.
pub fn content_tokens(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|t| !is_modifier(t))
        .map(str::to_string)
        .collect()
}

/// Jaccard similarity |a ∩ b| / |a ∪ b|. Two empty sets score 0.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let intersection = a.iter().filter(|t| b.contains(*t)).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}
