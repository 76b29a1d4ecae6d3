//! Output shapes for the CLI: serializable rows for `--json`, colored lines
//! otherwise.

use colored::{ColoredString, Colorize};
use serde::Serialize;

use findval_actionability::ActionabilityTier;
use findval_taxonomy::{BaseTier, MatchTier, TaxonomyEntry, TaxonomyMatch};

#[derive(Debug, Serialize)]
pub struct MatchRow {
    pub input: String,
    pub id: Option<String>,
    pub name: Option<String>,
    pub tier: Option<MatchTier>,
    pub score: Option<f64>,
}

impl MatchRow {
    pub fn new(input: &str, hit: Option<TaxonomyMatch<'_>>) -> Self {
        Self {
            input: input.to_string(),
            id: hit.map(|m| m.entry.id.clone()),
            name: hit.map(|m| m.entry.name.clone()),
            tier: hit.map(|m| m.tier),
            score: hit.and_then(|m| m.score),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResolveRow {
    pub input: String,
    pub taxonomy_id: Option<String>,
    pub name: Option<String>,
    pub tier: Option<ActionabilityTier>,
}

#[derive(Debug, Serialize)]
pub struct AlignRow {
    pub fragment: String,
    pub index: Option<usize>,
    pub sentence: Option<String>,
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn match_tier(tier: MatchTier) -> ColoredString {
    match tier {
        MatchTier::Exact => tier.as_str().green(),
        MatchTier::Synonym => tier.as_str().cyan(),
        MatchTier::Normality => tier.as_str().blue(),
        MatchTier::Fuzzy => tier.as_str().yellow(),
    }
}

pub fn actionability(tier: ActionabilityTier) -> ColoredString {
    match tier {
        ActionabilityTier::Critical => tier.as_str().red().bold(),
        ActionabilityTier::Significant => tier.as_str().yellow().bold(),
        ActionabilityTier::Incidental => tier.as_str().cyan(),
        ActionabilityTier::Conditional => tier.as_str().magenta(),
        ActionabilityTier::NotActionable => tier.as_str().dimmed(),
    }
}

pub fn print_match(row: &MatchRow) {
    match (&row.id, &row.name, row.tier) {
        (Some(id), Some(name), Some(tier)) => {
            let score = row
                .score
                .map(|s| format!(" {:.2}", s))
                .unwrap_or_default();
            println!(
                "  {} {} {} [{}] {}{}",
                row.input,
                "→".cyan(),
                name.bold(),
                id.dimmed(),
                match_tier(tier),
                score.yellow(),
            );
        }
        _ => println!("  {} {} {}", row.input, "→".cyan(), "no match".red()),
    }
}

/// Label for an entry's base tier; concepts without one print `untiered`.
pub fn base_tier_label(entry: &TaxonomyEntry) -> &'static str {
    entry.base_tier.map_or("untiered", BaseTier::as_str)
}

pub fn print_entry(entry: &TaxonomyEntry) {
    let category = if entry.category.is_empty() {
        String::new()
    } else {
        format!(" {}", entry.category.dimmed())
    };
    println!(
        "  {} {} {}{}",
        entry.id.dimmed(),
        entry.name.bold(),
        base_tier_label(entry).magenta(),
        category
    );
    if !entry.synonyms.is_empty() {
        println!("      aka {}", entry.synonyms.join(", "));
    }
}
