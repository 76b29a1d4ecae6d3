use std::fs;

use findval_taxonomy::{
    BaseTier, MatchTier, NormalityMappings, TableError, TaxonomyCatalog, TaxonomyMatcher,
};

const TAXONOMY: &str = r#"[
    {"id": "F001", "name": "Pleural effusion", "category": "pleura",
     "synonyms": ["Hydrothorax"], "actionability": "conditional"},
    {"id": "F002", "name": "Pneumothorax", "category": "pleura", "actionability": "critical"},
    {"id": "F003", "name": "Granuloma", "category": "lung"}
]"#;

#[test]
fn loads_taxonomy_and_mappings_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let taxonomy_path = dir.path().join("taxonomy.json");
    let mappings_path = dir.path().join("normality-mappings.json");
    fs::write(&taxonomy_path, TAXONOMY).unwrap();
    fs::write(&mappings_path, r#"{"no_pneumothorax": "Pneumothorax"}"#).unwrap();

    let catalog = TaxonomyCatalog::load(&taxonomy_path).expect("taxonomy should load");
    let mappings = NormalityMappings::load(&mappings_path).expect("mappings should load");

    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.get("F002").unwrap().base_tier, Some(BaseTier::Critical));

    let hit = TaxonomyMatcher::new(&catalog)
        .with_normality(&mappings)
        .match_detailed("No pneumothorax", 0.5)
        .expect("normality mapping should resolve");
    assert_eq!(hit.entry.id, "F002");
    assert_eq!(hit.tier, MatchTier::Normality);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taxonomy.json");
    let err = TaxonomyCatalog::load(&path).unwrap_err();
    assert!(matches!(err, TableError::Io { .. }));
    assert!(err.to_string().contains("taxonomy.json"));
}

#[test]
fn malformed_json_is_a_table_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taxonomy.json");
    fs::write(&path, r#"[{"id": "F001"}]"#).unwrap();
    let err = TaxonomyCatalog::load(&path).unwrap_err();
    assert!(matches!(err, TableError::Json { .. }));
}
