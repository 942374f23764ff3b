#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};

use term_standards::{ContextError, ContextStore};

fn dictionaries_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../dictionaries")
}

fn unique_temp_dir(name: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "termdict-{}-{}-{}",
        name,
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    dir
}

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

const MINIMAL_TERMINOLOGY: &str = r#"{
  "@schema": "https://raw.githubusercontent.com/qiicr/dcmqi/master/doc/schemas/segment-context-schema.json#",
  "SegmentationCategoryTypeContextName": "User list",
  "SegmentationCodes": {
    "Category": [
      {
        "CodeMeaning": "Tissue",
        "CodingSchemeDesignator": "SCT",
        "CodeValue": "85756007",
        "Type": [
          {
            "CodeMeaning": "Artery",
            "CodingSchemeDesignator": "SCT",
            "CodeValue": "51114001",
            "recommendedDisplayRGBValue": [216, 101, 79]
          }
        ]
      }
    ]
  }
}"#;

#[test]
fn test_load_shipped_dictionaries() {
    let root = dictionaries_dir();
    if !root.exists() {
        return; // Skip if dictionaries not available
    }

    let store = ContextStore::with_defaults_from(&root).expect("load baseline dictionaries");

    let terminologies = store.terminology_names();
    assert!(terminologies.contains(&"Segmentation category and type - General Anatomy list"));
    assert!(terminologies.contains(&"Segmentation category and type - DICOM master list"));

    let anatomic = store.anatomic_names();
    assert_eq!(anatomic, vec!["Anatomic codes - DICOM master list"]);

    let general = store
        .terminology("Segmentation category and type - General Anatomy list")
        .expect("general anatomy registered");
    assert!(!general.categories().is_empty());
}

#[test]
fn test_unknown_schema_is_rejected() {
    let dir = unique_temp_dir("unknown-schema");
    let path = dir.join("weird.json");
    write(&path, r#"{ "@schema": "https://example.org/other#", "SegmentationCategoryTypeContextName": "X" }"#);

    let mut store = ContextStore::new();
    let error = store.load_file(&path).unwrap_err();
    assert!(matches!(error, ContextError::UnknownSchema { .. }));
    assert!(store.terminology_names().is_empty(), "nothing registered");
}

#[test]
fn test_missing_schema_is_rejected() {
    let dir = unique_temp_dir("missing-schema");
    let path = dir.join("no-schema.json");
    write(&path, r#"{ "SegmentationCategoryTypeContextName": "X" }"#);

    let mut store = ContextStore::new();
    let error = store.load_file(&path).unwrap_err();
    assert!(matches!(error, ContextError::MissingSchema { .. }));
}

#[test]
fn test_user_directory_scan_skips_bad_entries() {
    let dir = unique_temp_dir("user-scan");
    write(&dir.join("good.json"), MINIMAL_TERMINOLOGY);
    write(&dir.join("bad.json"), r#"{ "@schema": "https://example.org/other#" }"#);
    write(&dir.join("notes.txt"), "not a dictionary");
    fs::create_dir_all(dir.join("subdir")).unwrap();
    write(&dir.join("subdir/nested.json"), MINIMAL_TERMINOLOGY);

    let mut store = ContextStore::new();
    let loaded = store.load_user_directory(&dir).expect("scan directory");

    // Only the good top-level file loads; bad files and the subdirectory
    // are skipped without aborting the scan.
    assert_eq!(loaded, vec!["User list".to_string()]);
    assert_eq!(store.terminology_names(), vec!["User list"]);
}

#[test]
fn test_reload_replaces_previous_document() {
    let dir = unique_temp_dir("reload");
    let path = dir.join("ctx.json");
    write(&path, MINIMAL_TERMINOLOGY);

    let mut store = ContextStore::new();
    store.load_file(&path).expect("first load");
    assert_eq!(
        store.terminology("User list").unwrap().categories().len(),
        1
    );

    // Same context name, different content: the old tree is discarded.
    write(
        &path,
        r#"{
          "@schema": "https://raw.githubusercontent.com/qiicr/dcmqi/master/doc/schemas/segment-context-schema.json#",
          "SegmentationCategoryTypeContextName": "User list",
          "SegmentationCodes": { "Category": [] }
        }"#,
    );
    store.load_file(&path).expect("reload");
    assert!(store.terminology("User list").unwrap().categories().is_empty());
    assert_eq!(store.terminology_names(), vec!["User list"]);
}

#[test]
fn test_failed_reload_leaves_store_untouched() {
    let dir = unique_temp_dir("failed-reload");
    let path = dir.join("ctx.json");
    write(&path, MINIMAL_TERMINOLOGY);

    let mut store = ContextStore::new();
    store.load_file(&path).expect("first load");

    write(&path, "{ not json");
    assert!(store.load_file(&path).is_err());
    assert_eq!(
        store.terminology("User list").unwrap().categories().len(),
        1,
        "previous document still registered"
    );
}
