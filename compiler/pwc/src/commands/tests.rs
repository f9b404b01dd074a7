use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use super::*;

const HERO: &str = r#"{
  "scopeName": "game",
  "name": "Hero",
  "symbol": "HRO",
  "schemaURI": "https://example.com/hero.json",
  "fields": [
    { "id": 0, "key": "power", "type": "uint128", "description": "Power" },
    { "id": 1, "key": "tags", "type": "uint16", "arrayLength": 4 },
    { "id": 2, "key": "friends", "type": "literef", "arrayLength": 0 }
  ],
  "features": []
}"#;

const CONFLICTING: &str = r#"{
  "scopeName": "game",
  "name": "Broken",
  "symbol": "BRK",
  "fields": [{ "id": 0, "key": "level", "type": "uint8" }],
  "features": ["PATCH", "ACCOUNTPATCH"]
}"#;

fn write_config(dir: &Path, file: &str, contents: &str) -> PathBuf {
    let path = dir.join(file);
    std::fs::write(&path, contents).unwrap();
    path
}

fn file_names(outcomes: &[WriteOutcome]) -> Vec<String> {
    outcomes
        .iter()
        .map(|o| o.path().file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn load_config_reads_camel_case_document() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "hero.json", HERO);

    let config = load_config(&path).unwrap();
    assert_eq!(config.scope_name, "game");
    assert_eq!(config.uris.schema, "https://example.com/hero.json");
    assert_eq!(config.fields.len(), 3);
    assert_eq!(config.fields[1].array_length, 4);
}

#[test]
fn missing_config_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_config(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, DriverError::Io { .. }));
}

#[test]
fn malformed_config_is_a_json_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "bad.json", "{ \"name\": ");
    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, DriverError::Json { .. }));
    assert!(err.to_string().contains("bad.json"));
}

#[test]
fn check_reports_feature_conflicts() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "broken.json", CONFLICTING);

    let err = check_file(&path).unwrap_err();
    assert!(matches!(err, DriverError::Schema { .. }));

    let hero = write_config(dir.path(), "hero.json", HERO);
    assert_eq!(check_file(&hero).unwrap().slot_count(), 2);
}

#[test]
fn generate_writes_all_three_documents() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "hero.json", HERO);
    let out = dir.path().join("out");

    let options = GenerateOptions {
        output_dir: Some(out.clone()),
        force_wrapper: false,
    };
    let outcomes = generate(&[config], &options).unwrap();

    assert_eq!(
        file_names(&outcomes),
        vec!["HeroGenerated.sol", "Hero-schema.json", "Hero.sol"]
    );
    assert!(outcomes.iter().all(|o| matches!(o, WriteOutcome::Written(_))));

    let implementation = std::fs::read_to_string(out.join("HeroGenerated.sol")).unwrap();
    assert!(implementation.contains("contract HeroGenerated"));
    let wrapper = std::fs::read_to_string(out.join("Hero.sol")).unwrap();
    assert!(wrapper.contains("contract Hero is HeroGenerated"));
}

#[test]
fn generate_defaults_to_the_config_directory() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "hero.json", HERO);

    generate(&[config], &GenerateOptions::default()).unwrap();
    assert!(dir.path().join("HeroGenerated.sol").exists());
    assert!(dir.path().join("Hero-schema.json").exists());
}

#[test]
fn existing_wrapper_is_kept_unless_forced() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "hero.json", HERO);
    let wrapper = dir.path().join("Hero.sol");
    std::fs::write(&wrapper, "// user edits\n").unwrap();
    std::fs::write(dir.path().join("HeroGenerated.sol"), "stale").unwrap();

    let outcomes = generate(std::slice::from_ref(&config), &GenerateOptions::default()).unwrap();
    assert_eq!(outcomes[2], WriteOutcome::Kept(wrapper.clone()));
    assert_eq!(std::fs::read_to_string(&wrapper).unwrap(), "// user edits\n");
    assert_ne!(
        std::fs::read_to_string(dir.path().join("HeroGenerated.sol")).unwrap(),
        "stale"
    );

    let forced = GenerateOptions {
        output_dir: None,
        force_wrapper: true,
    };
    let outcomes = generate(&[config], &forced).unwrap();
    assert_eq!(outcomes[2], WriteOutcome::Written(wrapper.clone()));
    assert!(std::fs::read_to_string(&wrapper)
        .unwrap()
        .contains("contract Hero is HeroGenerated"));
}

#[test]
fn one_invalid_config_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let hero = write_config(dir.path(), "hero.json", HERO);
    let broken = write_config(dir.path(), "broken.json", CONFLICTING);
    let out = dir.path().join("out");

    let options = GenerateOptions {
        output_dir: Some(out.clone()),
        force_wrapper: false,
    };
    let err = generate(&[hero, broken], &options).unwrap_err();
    assert!(err.to_string().contains("broken.json"));
    assert!(!out.exists());
}

#[test]
fn generate_handles_several_configs() {
    let dir = TempDir::new().unwrap();
    let hero = write_config(dir.path(), "hero.json", HERO);
    let rock = write_config(
        dir.path(),
        "rock.json",
        r#"{ "scopeName": "game", "name": "Rock", "symbol": "RCK",
             "fields": [{ "id": 0, "key": "weight", "type": "uint32" }] }"#,
    );

    let outcomes = generate(&[hero, rock], &GenerateOptions::default()).unwrap();
    assert_eq!(outcomes.len(), 6);
    assert!(dir.path().join("RockGenerated.sol").exists());
}

#[test]
fn layout_table_lists_words_and_dynamic_fields() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "hero.json", HERO);

    let table = layout_file(&path).unwrap();
    let rows: Vec<Vec<&str>> = table.lines().map(|l| l.split_whitespace().collect()).collect();
    assert_eq!(
        rows,
        vec![
            vec!["Hero:", "2", "storage", "words"],
            vec!["slot", "0"],
            vec!["power", "uint128", "0..128"],
            vec!["slot", "1"],
            vec!["tags", "uint16[4]", "0..64", "elements", "0..=3"],
            vec!["dynamic"],
            vec!["friends", "literef[]"],
        ]
    );
}
