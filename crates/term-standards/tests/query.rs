#![allow(missing_docs)]

use std::path::PathBuf;

use term_model::{
    Category, CodeIdentifier, ModelError, RecommendedColor, TerminologyContext, TypeTerm,
};
use term_standards::{ContextError, ContextStore, entry_from_slicer_label};

fn dictionaries_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../dictionaries")
}

/// Store with terminology "Tissue-ctx" holding one category "Tissue" and
/// one type "Artery".
fn tissue_store() -> ContextStore {
    let mut terminology = TerminologyContext::new("", "Tissue-ctx");
    let mut tissue = Category::from_code(CodeIdentifier::new("SCT", "85756007", "Tissue"));
    let mut artery = TypeTerm::from_code(CodeIdentifier::new("SCT", "51114001", "Artery"));
    artery.recommended_display_rgb = Some(RecommendedColor::new(216, 101, 79));
    tissue.types.push(artery);
    terminology.codes.categories.push(tissue);

    let mut store = ContextStore::new();
    store.insert_terminology(terminology);
    store
}

#[test]
fn test_type_lookup_returns_populated_record() {
    let store = tissue_store();
    let tissue = CodeIdentifier::new("SCT", "85756007", "");
    let artery = CodeIdentifier::new("SCT", "51114001", "");

    let record = store
        .type_term("Tissue-ctx", &tissue, &artery)
        .expect("artery present");
    assert_eq!(record.code.meaning, "Artery");
    assert_eq!(record.display_color(), RecommendedColor::new(216, 101, 79));
}

#[test]
fn test_search_types_by_substring() {
    let store = tissue_store();
    let tissue = CodeIdentifier::new("SCT", "85756007", "");

    let hits = store
        .find_types("Tissue-ctx", &tissue, "art")
        .expect("category present");
    let meanings: Vec<&str> = hits.iter().map(|t| t.code.meaning.as_str()).collect();
    assert_eq!(meanings, vec!["Artery"]);

    let all = store
        .find_types("Tissue-ctx", &tissue, "")
        .expect("category present");
    assert_eq!(all.len(), 1, "empty search returns everything");

    assert!(store.find_types("Tissue-ctx", &tissue, "vein").unwrap().is_empty());
    assert!(store.find_types("missing", &tissue, "").is_none());
}

#[test]
fn test_search_equals_filtered_all() {
    let root = dictionaries_dir();
    if !root.exists() {
        return; // Skip if dictionaries not available
    }
    let store = ContextStore::with_defaults_from(&root).expect("load dictionaries");
    let name = "Segmentation category and type - General Anatomy list";
    let context = store.terminology(name).expect("general anatomy loaded");

    let search = "structure";
    let found = context.categories_matching(search);
    let by_hand: Vec<&Category> = context
        .categories()
        .iter()
        .filter(|c| c.code.meaning.to_lowercase().contains(search))
        .collect();
    assert_eq!(found.len(), by_hand.len());
    for (a, b) in found.iter().zip(by_hand.iter()) {
        assert_eq!(a.code, b.code);
    }
}

#[test]
fn test_nth_accessors_are_bounds_checked() {
    let store = tissue_store();
    let tissue = CodeIdentifier::new("SCT", "85756007", "");

    assert_eq!(
        store.nth_category("Tissue-ctx", 0).unwrap().code.meaning,
        "Tissue"
    );
    let error = store.nth_category("Tissue-ctx", 1).unwrap_err();
    assert!(matches!(
        error,
        ContextError::Model(ModelError::IndexOutOfRange { index: 1, count: 1 })
    ));

    let error = store.nth_type("Tissue-ctx", &tissue, 5).unwrap_err();
    assert!(matches!(
        error,
        ContextError::Model(ModelError::IndexOutOfRange { index: 5, count: 1 })
    ));

    let error = store.nth_category("missing", 0).unwrap_err();
    assert!(matches!(error, ContextError::ContextNotFound { .. }));
}

#[test]
fn test_region_queries_mirror_type_queries() {
    let mut anatomic = term_model::AnatomicContext::new("", "A1");
    let mut kidney = TypeTerm::from_code(CodeIdentifier::new("SCT", "64033007", "Kidney"));
    kidney
        .modifiers
        .push(TypeTerm::from_code(CodeIdentifier::new("SCT", "7771000", "Left")));
    anatomic.codes.regions.push(kidney);
    anatomic
        .codes
        .regions
        .push(TypeTerm::from_code(CodeIdentifier::new("SCT", "10200004", "Liver")));

    let mut store = ContextStore::new();
    store.insert_anatomic(anatomic);

    let hits = store.find_regions("A1", "liv").expect("context present");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].code.meaning, "Liver");

    let kidney_id = CodeIdentifier::new("SCT", "64033007", "");
    let left = store
        .region_modifier("A1", &kidney_id, &CodeIdentifier::new("SCT", "7771000", ""))
        .expect("modifier present");
    assert_eq!(left.code.meaning, "Left");

    assert_eq!(store.nth_region("A1", 1).unwrap().code.meaning, "Liver");
    assert!(store.nth_region("A1", 2).is_err());
    assert_eq!(
        store
            .nth_region_modifier("A1", &kidney_id, 0)
            .unwrap()
            .code
            .meaning,
        "Left"
    );
}

#[test]
fn test_by_meaning_chain() {
    let store = tissue_store();
    let tissue = CodeIdentifier::new("SCT", "85756007", "");

    let category = store
        .category_by_meaning("Tissue-ctx", "Tissue")
        .expect("category by meaning");
    assert_eq!(category.code.value, "85756007");

    let type_term = store
        .type_by_meaning("Tissue-ctx", &tissue, "Artery")
        .expect("type by meaning");
    assert_eq!(type_term.code.value, "51114001");

    assert!(store.type_by_meaning("Tissue-ctx", &tissue, "Vein").is_none());
}

#[test]
fn test_legacy_label_lookup() {
    let root = dictionaries_dir();
    if !root.exists() {
        return; // Skip if dictionaries not available
    }
    let store = ContextStore::with_defaults_from(&root).expect("load dictionaries");
    let name = "Segmentation category and type - General Anatomy list";

    // Label on a plain type.
    let entry = entry_from_slicer_label(&store, name, "artery").expect("artery label");
    assert_eq!(entry.category.as_ref().unwrap().code.meaning, "Tissue");
    assert_eq!(entry.type_term.as_ref().unwrap().code.meaning, "Artery");
    assert!(entry.type_modifier.is_none());
    assert!(entry.is_valid());

    // Label on a type modifier: the whole path is populated.
    let entry = entry_from_slicer_label(&store, name, "left kidney").expect("kidney label");
    assert_eq!(
        entry.category.as_ref().unwrap().code.meaning,
        "Anatomical Structure"
    );
    assert_eq!(entry.type_term.as_ref().unwrap().code.meaning, "Kidney");
    assert_eq!(entry.type_modifier.as_ref().unwrap().code.meaning, "Left");

    assert!(entry_from_slicer_label(&store, name, "no such label").is_none());
    assert!(entry_from_slicer_label(&store, "missing context", "artery").is_none());
}

#[test]
fn test_show_anatomy_flag_survives_loading() {
    let root = dictionaries_dir();
    if !root.exists() {
        return;
    }
    let store = ContextStore::with_defaults_from(&root).expect("load dictionaries");
    let name = "Segmentation category and type - General Anatomy list";
    let context = store.terminology(name).expect("general anatomy loaded");

    let tissue = context
        .category(&CodeIdentifier::new("SCT", "85756007", ""))
        .expect("tissue category");
    assert!(tissue.show_anatomy);

    let anatomical = context
        .category(&CodeIdentifier::new("SCT", "123037004", ""))
        .expect("anatomical structure category");
    assert!(!anatomical.show_anatomy);
}
