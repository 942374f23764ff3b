//! Terminology and anatomic context documents.
//!
//! A terminology context is a named dictionary of category -> type ->
//! type-modifier coded terms; an anatomic context is a named dictionary of
//! region -> region-modifier coded terms. Both are owned, strongly-typed
//! trees: nodes never alias across documents, and anything that crosses a
//! document boundary is structurally cloned.
//!
//! Field names follow the dcmqi context file format, so the documents
//! round-trip through `serde_json` against the on-disk dictionaries.

use serde::{Deserialize, Deserializer, Serialize};

use crate::code::{Coded, CodeIdentifier, find_code};
use crate::color::RecommendedColor;
use crate::error::{ModelError, Result};

/// A segmentation category node owning its type array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(flatten)]
    pub code: CodeIdentifier,

    #[serde(rename = "SNOMEDCTConceptID", skip_serializing_if = "Option::is_none")]
    pub snomed_ct_concept_id: Option<String>,

    #[serde(rename = "UMLSConceptUID", skip_serializing_if = "Option::is_none")]
    pub umls_concept_uid: Option<String>,

    #[serde(rename = "cid", skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,

    #[serde(rename = "contextGroupName", skip_serializing_if = "Option::is_none")]
    pub context_group_name: Option<String>,

    /// Whether entries of this category allow selecting an anatomic region.
    #[serde(
        rename = "showAnatomy",
        default = "default_true",
        deserialize_with = "bool_or_string"
    )]
    pub show_anatomy: bool,

    #[serde(rename = "Type", default)]
    pub types: Vec<TypeTerm>,
}

impl Category {
    /// A category carrying only its code triple.
    pub fn from_code(code: CodeIdentifier) -> Self {
        Self {
            code,
            snomed_ct_concept_id: None,
            umls_concept_uid: None,
            cid: None,
            context_group_name: None,
            show_anatomy: true,
            types: Vec::new(),
        }
    }

    pub fn type_term(&self, id: &CodeIdentifier) -> Option<&TypeTerm> {
        find_code(&self.types, id).map(|(_, t)| t)
    }

    pub fn type_by_meaning(&self, meaning: &str) -> Option<&TypeTerm> {
        self.types.iter().find(|t| t.code.meaning == meaning)
    }

    /// Types whose meaning contains `search` (case-insensitive); an empty
    /// search returns all types in document order.
    pub fn types_matching(&self, search: &str) -> Vec<&TypeTerm> {
        self.types
            .iter()
            .filter(|t| meaning_matches(&t.code.meaning, search))
            .collect()
    }

    pub fn nth_type(&self, index: usize) -> Result<&TypeTerm> {
        nth(&self.types, index)
    }
}

impl Coded for Category {
    fn code(&self) -> &CodeIdentifier {
        &self.code
    }
}

/// A type-shaped node: category types, type modifiers, anatomic regions,
/// and region modifiers all share this record.
///
/// A node either carries a recommended display color or owns modifiers,
/// never both: when modifiers exist, the display color of a selection
/// comes from the chosen modifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeTerm {
    #[serde(flatten)]
    pub code: CodeIdentifier,

    /// Legacy short label kept for backward-compatible lookups.
    #[serde(rename = "3dSlicerLabel", skip_serializing_if = "Option::is_none")]
    pub slicer_label: Option<String>,

    #[serde(rename = "SNOMEDCTConceptID", skip_serializing_if = "Option::is_none")]
    pub snomed_ct_concept_id: Option<String>,

    #[serde(rename = "UMLSConceptUID", skip_serializing_if = "Option::is_none")]
    pub umls_concept_uid: Option<String>,

    #[serde(rename = "cid", skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,

    #[serde(rename = "contextGroupName", skip_serializing_if = "Option::is_none")]
    pub context_group_name: Option<String>,

    #[serde(
        rename = "recommendedDisplayRGBValue",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub recommended_display_rgb: Option<RecommendedColor>,

    #[serde(rename = "Modifier", default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<TypeTerm>,
}

impl TypeTerm {
    /// A type node carrying only its code triple.
    pub fn from_code(code: CodeIdentifier) -> Self {
        Self {
            code,
            slicer_label: None,
            snomed_ct_concept_id: None,
            umls_concept_uid: None,
            cid: None,
            context_group_name: None,
            recommended_display_rgb: None,
            modifiers: Vec::new(),
        }
    }

    pub fn has_modifiers(&self) -> bool {
        !self.modifiers.is_empty()
    }

    /// Own display color, or the sentinel gray when absent.
    pub fn display_color(&self) -> RecommendedColor {
        self.recommended_display_rgb.unwrap_or_default()
    }

    /// True when the node carries both modifiers and a color of its own,
    /// which the dictionary format does not allow.
    pub fn has_conflicting_color(&self) -> bool {
        self.has_modifiers() && self.recommended_display_rgb.is_some()
    }

    pub fn modifier(&self, id: &CodeIdentifier) -> Option<&TypeTerm> {
        find_code(&self.modifiers, id).map(|(_, m)| m)
    }

    pub fn modifier_by_meaning(&self, meaning: &str) -> Option<&TypeTerm> {
        self.modifiers.iter().find(|m| m.code.meaning == meaning)
    }

    pub fn modifiers_matching(&self, search: &str) -> Vec<&TypeTerm> {
        self.modifiers
            .iter()
            .filter(|m| meaning_matches(&m.code.meaning, search))
            .collect()
    }

    pub fn nth_modifier(&self, index: usize) -> Result<&TypeTerm> {
        nth(&self.modifiers, index)
    }
}

impl Coded for TypeTerm {
    fn code(&self) -> &CodeIdentifier {
        &self.code
    }
}

/// Category array wrapper matching the `SegmentationCodes` object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentationCodes {
    #[serde(rename = "Category", default)]
    pub categories: Vec<Category>,
}

/// A named category/type/type-modifier dictionary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminologyContext {
    #[serde(rename = "@schema", default)]
    pub schema: String,

    #[serde(rename = "SegmentationCategoryTypeContextName")]
    pub name: String,

    #[serde(rename = "SegmentationCodes", default)]
    pub codes: SegmentationCodes,
}

impl TerminologyContext {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            codes: SegmentationCodes::default(),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.codes.categories
    }

    pub fn category(&self, id: &CodeIdentifier) -> Option<&Category> {
        find_code(&self.codes.categories, id).map(|(_, c)| c)
    }

    pub fn category_by_meaning(&self, meaning: &str) -> Option<&Category> {
        self.codes
            .categories
            .iter()
            .find(|c| c.code.meaning == meaning)
    }

    pub fn categories_matching(&self, search: &str) -> Vec<&Category> {
        self.codes
            .categories
            .iter()
            .filter(|c| meaning_matches(&c.code.meaning, search))
            .collect()
    }

    pub fn nth_category(&self, index: usize) -> Result<&Category> {
        nth(&self.codes.categories, index)
    }

    /// Checks mandatory fields on every node of the tree.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ModelError::EmptyField {
                node: "terminology context".to_string(),
                field: "SegmentationCategoryTypeContextName",
            });
        }
        for category in &self.codes.categories {
            ensure_complete(&category.code, "category")?;
            for type_term in &category.types {
                ensure_complete(&type_term.code, "type")?;
                for modifier in &type_term.modifiers {
                    ensure_complete(&modifier.code, "type modifier")?;
                }
            }
        }
        Ok(())
    }
}

/// Region array wrapper matching the `AnatomicCodes` object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnatomicCodes {
    #[serde(rename = "AnatomicRegion", default)]
    pub regions: Vec<TypeTerm>,
}

/// A named anatomic region/region-modifier dictionary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnatomicContext {
    #[serde(rename = "@schema", default)]
    pub schema: String,

    #[serde(rename = "AnatomicContextName")]
    pub name: String,

    #[serde(rename = "AnatomicCodes", default)]
    pub codes: AnatomicCodes,
}

impl AnatomicContext {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            codes: AnatomicCodes::default(),
        }
    }

    pub fn regions(&self) -> &[TypeTerm] {
        &self.codes.regions
    }

    pub fn region(&self, id: &CodeIdentifier) -> Option<&TypeTerm> {
        find_code(&self.codes.regions, id).map(|(_, r)| r)
    }

    pub fn region_by_meaning(&self, meaning: &str) -> Option<&TypeTerm> {
        self.codes.regions.iter().find(|r| r.code.meaning == meaning)
    }

    pub fn regions_matching(&self, search: &str) -> Vec<&TypeTerm> {
        self.codes
            .regions
            .iter()
            .filter(|r| meaning_matches(&r.code.meaning, search))
            .collect()
    }

    pub fn nth_region(&self, index: usize) -> Result<&TypeTerm> {
        nth(&self.codes.regions, index)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ModelError::EmptyField {
                node: "anatomic context".to_string(),
                field: "AnatomicContextName",
            });
        }
        for region in &self.codes.regions {
            ensure_complete(&region.code, "region")?;
            for modifier in &region.modifiers {
                ensure_complete(&modifier.code, "region modifier")?;
            }
        }
        Ok(())
    }
}

fn meaning_matches(meaning: &str, search: &str) -> bool {
    search.is_empty() || meaning.to_lowercase().contains(&search.to_lowercase())
}

fn nth<T>(items: &[T], index: usize) -> Result<&T> {
    items.get(index).ok_or(ModelError::IndexOutOfRange {
        index,
        count: items.len(),
    })
}

fn ensure_complete(code: &CodeIdentifier, node: &str) -> Result<()> {
    let field = if code.designator.trim().is_empty() {
        "CodingSchemeDesignator"
    } else if code.value.trim().is_empty() {
        "CodeValue"
    } else if code.meaning.trim().is_empty() {
        "CodeMeaning"
    } else {
        return Ok(());
    };
    Err(ModelError::EmptyField {
        node: format!("{node} {code}"),
        field,
    })
}

fn default_true() -> bool {
    true
}

/// Accepts `true`/`false` as JSON booleans or as strings; older dictionary
/// files carry the string form.
fn bool_or_string<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Text(text) => Ok(text.eq_ignore_ascii_case("true")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tissue_category() -> Category {
        let mut category = Category::from_code(CodeIdentifier::new("SCT", "85756007", "Tissue"));
        let mut artery = TypeTerm::from_code(CodeIdentifier::new("SCT", "51114001", "Artery"));
        artery.recommended_display_rgb = Some(RecommendedColor::new(216, 101, 79));
        let mut vein = TypeTerm::from_code(CodeIdentifier::new("SCT", "32603002", "Vein"));
        vein.recommended_display_rgb = Some(RecommendedColor::new(0, 151, 206));
        category.types = vec![artery, vein];
        category
    }

    #[test]
    fn search_filters_on_meaning_case_insensitively() {
        let category = tissue_category();
        let hits = category.types_matching("art");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code.meaning, "Artery");

        // Empty search returns everything in document order.
        let all = category.types_matching("");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].code.meaning, "Artery");
        assert_eq!(all[1].code.meaning, "Vein");
    }

    #[test]
    fn nth_is_bounds_checked() {
        let category = tissue_category();
        assert_eq!(category.nth_type(0).unwrap().code.meaning, "Artery");
        let err = category.nth_type(2).unwrap_err();
        assert!(matches!(
            err,
            ModelError::IndexOutOfRange { index: 2, count: 2 }
        ));
    }

    #[test]
    fn validate_rejects_blank_code_value() {
        let mut context = TerminologyContext::new("", "Test");
        let mut category = tissue_category();
        category.types[0].code.value = String::new();
        context.codes.categories.push(category);
        assert!(context.validate().is_err());
    }

    #[test]
    fn show_anatomy_accepts_string_form() {
        let json = r#"{
            "CodeMeaning": "Tissue",
            "CodingSchemeDesignator": "SCT",
            "CodeValue": "85756007",
            "showAnatomy": "false"
        }"#;
        let category: Category = serde_json::from_str(json).expect("parse category");
        assert!(!category.show_anatomy);

        let json = r#"{
            "CodeMeaning": "Tissue",
            "CodingSchemeDesignator": "SCT",
            "CodeValue": "85756007"
        }"#;
        let category: Category = serde_json::from_str(json).expect("parse category");
        assert!(category.show_anatomy, "showAnatomy defaults to true");
    }
}
