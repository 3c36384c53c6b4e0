//! Integration tests for loading the sample catalog and requirement rules

use std::path::PathBuf;
use study_planner::core::catalog::parse_catalog_csv;
use study_planner::core::error::LoadError;
use study_planner::core::models::{Curriculum, Table};
use study_planner::core::planner::allowed_tables;
use study_planner::core::rules::RequirementRules;

fn sample(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("samples")
        .join(name)
}

#[test]
fn sample_catalog_loads_valid_rows() {
    let catalog = parse_catalog_csv(sample("catalog.csv")).expect("sample catalog parses");

    // Malformed row dropped, repeated exam ignored
    assert_eq!(catalog.len(), 9);
    assert!(catalog.get("Broken Row").is_none());

    let optics = catalog.get("Advanced Optics").unwrap();
    assert_eq!(optics.credits, 6);
    assert_eq!(optics.link, "https://courses.example.edu/optics");
    assert_eq!(optics.ordinamento, vec!["FBA", "F94"]);
}

#[test]
fn sample_catalog_handles_quotes_and_defaults() {
    let catalog = parse_catalog_csv(sample("catalog.csv")).unwrap();

    let nano = catalog.get("Nanophotonics, Devices and Materials").unwrap();
    assert_eq!(nano.subpillar, "Nano, Devices");
    assert_eq!(nano.availability, "Biennial Odd");

    let acoustics = catalog.get("Acoustics").unwrap();
    assert_eq!(acoustics.credits, 6);
    assert_eq!(acoustics.period, 1);

    let history = catalog.get("History of Physics").unwrap();
    assert!(allowed_tables(history, Curriculum::F94).is_empty());
    assert!(allowed_tables(history, Curriculum::Fba).is_empty());
}

#[test]
fn sample_catalog_tables_per_curriculum() {
    let catalog = parse_catalog_csv(sample("catalog.csv")).unwrap();
    let plasma = catalog.get("Plasma Physics").unwrap();

    assert_eq!(allowed_tables(plasma, Curriculum::F94), vec![Table::B, Table::C]);
    assert!(allowed_tables(plasma, Curriculum::Fba).is_empty());

    let lasers = catalog.get("Laser Engineering").unwrap();
    assert_eq!(allowed_tables(lasers, Curriculum::Fba), vec![Table::Two]);
    assert_eq!(allowed_tables(lasers, Curriculum::F94), vec![Table::C]);
}

#[test]
fn missing_catalog_is_io_error() {
    let err = parse_catalog_csv(sample("no-such-catalog.csv")).unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}

#[test]
fn sample_rules_json_and_toml_agree() {
    let json = RequirementRules::load(sample("rules.json")).expect("JSON rules load");
    let toml = RequirementRules::load(sample("rules.toml")).expect("TOML rules load");

    assert_eq!(json, toml);
    assert_eq!(json.common.total_credits, 120);
    assert_eq!(json.mandatory_credits(), 54);
    assert_eq!(json.program(Curriculum::Fba).table_minimum(Table::Two), 42);
    assert_eq!(
        json.program(Curriculum::F94).aggregate().map(|a| a.min_credits),
        Some(48)
    );
}

#[test]
fn rules_with_unknown_extension_are_rejected() {
    let err = RequirementRules::load(sample("catalog.csv")).unwrap_err();
    assert!(matches!(err, LoadError::UnsupportedFormat(_)));
}
