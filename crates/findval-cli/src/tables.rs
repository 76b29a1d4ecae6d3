//! Session tables: the four collaborator-supplied JSON files, loaded once.
//!
//! Layout of the tables directory:
//! - `taxonomy.json` (required)
//! - `attributes.json`
//! - `actionability-rules.json`
//! - `normality-mappings.json`
//!
//! Optional tables that are missing load as empty with a warning.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use findval_actionability::{ActionabilityResolver, AttributeConfig, RulesTable};
use findval_taxonomy::{NormalityMappings, TaxonomyCatalog, TaxonomyMatcher};

pub const TAXONOMY_FILE: &str = "taxonomy.json";
pub const ATTRIBUTES_FILE: &str = "attributes.json";
pub const RULES_FILE: &str = "actionability-rules.json";
pub const NORMALITY_FILE: &str = "normality-mappings.json";

#[derive(Debug, Clone, Args)]
pub struct TablesArgs {
    /// Directory holding taxonomy.json and the optional rule/attribute/mapping tables
    #[arg(long = "tables", env = "FINDVAL_TABLES", default_value = "data", global = true)]
    pub dir: PathBuf,
}

pub struct SessionTables {
    pub catalog: TaxonomyCatalog,
    pub normality: NormalityMappings,
    pub attributes: AttributeConfig,
    pub resolver: ActionabilityResolver,
}

impl SessionTables {
    pub fn load(dir: &Path) -> Result<Self> {
        let catalog = TaxonomyCatalog::load(&dir.join(TAXONOMY_FILE))
            .with_context(|| format!("loading taxonomy from {}", dir.display()))?;

        let normality = load_optional(dir, NORMALITY_FILE, NormalityMappings::load)?;
        let attributes = load_optional(dir, ATTRIBUTES_FILE, AttributeConfig::load)?;
        let rules = load_optional(dir, RULES_FILE, RulesTable::load)?;
        let resolver = ActionabilityResolver::from_catalog(&catalog, rules);

        tracing::info!(
            dir = %dir.display(),
            entries = catalog.len(),
            tiered = resolver.lookup().len(),
            rules = resolver.rules().len(),
            mappings = normality.len(),
            "loaded session tables"
        );

        Ok(Self {
            catalog,
            normality,
            attributes,
            resolver,
        })
    }

    pub fn matcher(&self) -> TaxonomyMatcher<'_> {
        TaxonomyMatcher::new(&self.catalog).with_normality(&self.normality)
    }
}

fn load_optional<T, E>(dir: &Path, file: &str, load: fn(&Path) -> Result<T, E>) -> Result<T>
where
    T: Default,
    E: std::error::Error + Send + Sync + 'static,
{
    let path = dir.join(file);
    if !path.exists() {
        tracing::warn!(path = %path.display(), "optional table missing; using an empty one");
        return Ok(T::default());
    }
    load(&path).with_context(|| format!("loading {}", path.display()))
}
