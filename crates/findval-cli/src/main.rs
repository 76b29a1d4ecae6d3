//! findval CLI
//!
//! Command-line tools for checking extracted findings against the taxonomy:
//! - match raw names through the exact → synonym → normality → fuzzy cascade
//! - resolve actionability tiers from finding attributes
//! - segment reports and align evidence fragments to sentences
//! - triage bulk-import name lists

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use findval_actionability::Attributes;
use findval_report::{match_source_to_sentence, prepare_report, segment, Sentence};
use findval_taxonomy::{TaxonomyEntry, TriageReport, INTERACTIVE_FUZZY_THRESHOLD};

mod render;
mod tables;

use render::{AlignRow, MatchRow, ResolveRow};
use tables::{SessionTables, TablesArgs};

#[derive(Parser)]
#[command(name = "findval")]
#[command(author, version, about = "Finding resolution and report annotation tools")]
struct Cli {
    #[command(flatten)]
    tables: TablesArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match raw finding names to taxonomy entries
    Match {
        /// Raw finding names
        #[arg(required = true)]
        names: Vec<String>,

        /// Minimum Jaccard score for the fuzzy tier
        #[arg(long, default_value_t = INTERACTIVE_FUZZY_THRESHOLD)]
        threshold: f64,

        /// Stop after the exact, synonym and normality tiers
        #[arg(long)]
        no_fuzzy: bool,

        #[arg(long)]
        json: bool,
    },

    /// Search the taxonomy by name or synonym substring
    Search {
        /// Empty query lists every entry
        #[arg(default_value = "")]
        query: String,

        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        #[arg(long)]
        json: bool,
    },

    /// Resolve the actionability tier of a finding
    Resolve {
        /// Taxonomy id, or a raw name to match first
        finding: String,

        /// Attribute edit as key=value (arrays: comma-separated; empty value removes)
        #[arg(short = 'a', long = "attr", value_name = "KEY=VALUE")]
        attrs: Vec<String>,

        #[arg(long)]
        json: bool,
    },

    /// Split a report into numbered sentences
    Segment {
        /// Report text file (stdin when omitted)
        input: Option<PathBuf>,

        /// Segment only the FINDINGS section
        #[arg(long)]
        findings_only: bool,

        #[arg(long)]
        json: bool,
    },

    /// Align evidence fragments to report sentences
    Align {
        /// Report text file
        input: PathBuf,

        /// Evidence fragments quoted from the report
        #[arg(required = true)]
        fragments: Vec<String>,

        #[arg(long)]
        findings_only: bool,

        #[arg(long)]
        json: bool,
    },

    /// Triage a list of raw names (one per line) for bulk import
    Triage {
        /// Names file (stdin when omitted)
        input: Option<PathBuf>,

        /// Toggle acceptance of a fuzzy candidate by raw name
        #[arg(long, value_name = "NAME")]
        accept: Vec<String>,

        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Match {
            names,
            threshold,
            no_fuzzy,
            json,
        } => cmd_match(&cli.tables.dir, &names, threshold, no_fuzzy, json),
        Commands::Search { query, limit, json } => cmd_search(&cli.tables.dir, &query, limit, json),
        Commands::Resolve {
            finding,
            attrs,
            json,
        } => cmd_resolve(&cli.tables.dir, &finding, &attrs, json),
        Commands::Segment {
            input,
            findings_only,
            json,
        } => cmd_segment(input.as_deref(), findings_only, json),
        Commands::Align {
            input,
            fragments,
            findings_only,
            json,
        } => cmd_align(&input, &fragments, findings_only, json),
        Commands::Triage {
            input,
            accept,
            json,
        } => cmd_triage(&cli.tables.dir, input.as_deref(), &accept, json),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("findval=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_match(dir: &Path, names: &[String], threshold: f64, no_fuzzy: bool, json: bool) -> Result<()> {
    let tables = SessionTables::load(dir)?;
    let matcher = tables.matcher();

    let rows: Vec<MatchRow> = names
        .iter()
        .map(|name| {
            let hit = if no_fuzzy {
                matcher.match_exact_or_normality(name)
            } else {
                matcher.match_detailed(name, threshold)
            };
            MatchRow::new(name, hit)
        })
        .collect();

    if json {
        return render::print_json(&rows);
    }

    println!("{} {} name(s)", "Matching".green().bold(), rows.len());
    for row in &rows {
        render::print_match(row);
        let candidates = matcher.normality_candidates(&row.input);
        if candidates.len() > 1 {
            let names: Vec<&str> = candidates.iter().map(|e| e.name.as_str()).collect();
            println!("      decomposes to {}", names.join(", ").blue());
        }
    }
    Ok(())
}

fn cmd_search(dir: &Path, query: &str, limit: usize, json: bool) -> Result<()> {
    let tables = SessionTables::load(dir)?;
    let hits = tables.catalog.search(query);
    let shown: Vec<&TaxonomyEntry> = hits.iter().copied().take(limit).collect();

    if json {
        return render::print_json(&shown);
    }

    println!(
        "{} {} of {} entr{}",
        "Found".green().bold(),
        shown.len(),
        hits.len(),
        if hits.len() == 1 { "y" } else { "ies" }
    );
    for entry in shown {
        render::print_entry(entry);
    }
    Ok(())
}

fn cmd_resolve(dir: &Path, finding: &str, edits: &[String], json: bool) -> Result<()> {
    let tables = SessionTables::load(dir)?;

    let entry = tables
        .catalog
        .get(finding)
        .or_else(|| tables.matcher().match_name(finding));

    let mut attributes = Attributes::new();
    for edit in edits {
        let (key, value) = edit
            .split_once('=')
            .ok_or_else(|| anyhow!("attribute edit `{edit}` is not KEY=VALUE"))?;
        let key = key.trim();
        if tables.attributes.get(key).is_none() && !tables.attributes.is_empty() {
            tracing::warn!(attribute = key, "attribute not in attribute config");
        }
        tables.attributes.apply_edit(&mut attributes, key, value);
    }

    let tier = entry.and_then(|e| tables.resolver.resolve(&e.id, &attributes));
    let row = ResolveRow {
        input: finding.to_string(),
        taxonomy_id: entry.map(|e| e.id.clone()),
        name: entry.map(|e| e.name.clone()),
        tier,
    };

    if json {
        return render::print_json(&row);
    }

    match (&row.name, row.tier) {
        (Some(name), Some(tier)) => println!(
            "{} {} {} {}",
            "Resolved".green().bold(),
            name.bold(),
            "→".cyan(),
            render::actionability(tier)
        ),
        (Some(name), None) => println!(
            "{} {} has no actionability tier",
            "Unresolved".yellow().bold(),
            name.bold()
        ),
        (None, _) => println!(
            "{} `{}` matches no taxonomy entry",
            "Unresolved".yellow().bold(),
            finding
        ),
    }
    for (key, value) in attributes.iter() {
        println!("  {} {} = {}", "·".dimmed(), key, value.values().join(", "));
    }
    Ok(())
}

fn cmd_segment(input: Option<&Path>, findings_only: bool, json: bool) -> Result<()> {
    let text = read_input(input)?;
    let sentences = split_report(&text, findings_only);

    if json {
        return render::print_json(&sentences);
    }

    println!("{} {} sentence(s)", "Segmented".green().bold(), sentences.len());
    for sentence in &sentences {
        let (header, content) = sentence.header_and_content();
        let marker = if sentence.is_templated_none() {
            " (none)".dimmed().to_string()
        } else {
            String::new()
        };
        if header.is_empty() {
            println!("  [{}] {}{}", sentence.index, content, marker);
        } else {
            println!("  [{}] {} {}{}", sentence.index, header.cyan(), content, marker);
        }
    }
    Ok(())
}

fn cmd_align(input: &Path, fragments: &[String], findings_only: bool, json: bool) -> Result<()> {
    let text = read_input(Some(input))?;
    let sentences = split_report(&text, findings_only);

    let rows: Vec<AlignRow> = fragments
        .iter()
        .map(|fragment| {
            let index = match_source_to_sentence(fragment, &sentences);
            AlignRow {
                fragment: fragment.clone(),
                index,
                sentence: index.map(|i| sentences[i - 1].text.clone()),
            }
        })
        .collect();

    if json {
        return render::print_json(&rows);
    }

    for row in &rows {
        match (row.index, &row.sentence) {
            (Some(index), Some(sentence)) => {
                println!("  \"{}\" {} [{}] {}", row.fragment, "→".cyan(), index, sentence)
            }
            _ => println!("  \"{}\" {} {}", row.fragment, "→".cyan(), "no sentence".red()),
        }
    }
    Ok(())
}

fn cmd_triage(dir: &Path, input: Option<&Path>, accept: &[String], json: bool) -> Result<()> {
    let tables = SessionTables::load(dir)?;
    let text = read_input(input)?;

    let names = text.lines().map(str::trim).filter(|line| !line.is_empty());
    let mut report = tables.matcher().triage(names);
    for name in accept {
        match report.toggle_accept(name) {
            Some(accepted) => tracing::debug!(name = %name, accepted, "toggled fuzzy candidate"),
            None => tracing::warn!(name = %name, "no fuzzy candidate to toggle"),
        }
    }

    if json {
        return render::print_json(&report);
    }

    print_triage(&report);
    Ok(())
}

fn print_triage(report: &TriageReport) {
    println!(
        "{} {} name(s): {} matched, {} fuzzy, {} unmatched",
        "Triaged".green().bold(),
        report.total(),
        report.matched.len(),
        report.fuzzy.len(),
        report.unmatched.len()
    );

    for (raw, hit) in &report.matched {
        println!(
            "  {} {} {} {}",
            "✓".green(),
            raw,
            "→".cyan(),
            format!("{} [{}]", hit.name, render::match_tier(hit.tier))
        );
    }
    for (raw, candidate) in &report.fuzzy {
        let mark = if report.is_accepted(raw) {
            "✓".green()
        } else {
            "?".yellow()
        };
        println!(
            "  {} {} {} {} {}",
            mark,
            raw,
            "→".cyan(),
            candidate.name,
            format!("{:.2}", candidate.score).yellow()
        );
    }
    for raw in &report.unmatched {
        println!("  {} {} (custom)", "✗".red(), raw);
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading stdin")?;
            Ok(text)
        }
    }
}

fn split_report(text: &str, findings_only: bool) -> Vec<Sentence> {
    if findings_only {
        prepare_report(text)
    } else {
        segment(text)
    }
}
