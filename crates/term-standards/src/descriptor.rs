//! Segment-descriptor import.
//!
//! A descriptor is an externally-produced flat document: one entry per
//! clinical label, each carrying its own category/type/modifier and
//! region/region-modifier code triples plus a recommended display color.
//! Importing merges those entries into a terminology context and, when
//! regions are present, an anatomic context, both registered under a
//! caller-supplied name. Every node that crosses from the descriptor
//! into a context is a structural copy; nodes are de-duplicated by code
//! identifier at every level, so re-importing the same descriptor never
//! duplicates or reorders anything.

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use term_model::{
    AnatomicContext, Category, CodeIdentifier, RecommendedColor, TerminologyContext, TypeTerm,
    find_code,
};

use crate::error::{ContextError, Result};
use crate::loader::{ANATOMIC_SCHEMAS, TERMINOLOGY_SCHEMAS};
use crate::store::ContextStore;

/// Top-level descriptor document. Descriptors carry no `@schema`.
#[derive(Debug, Clone, Deserialize)]
pub struct SegmentDescriptor {
    /// One inner list per clinical label; each inner list wraps a single
    /// attribute object.
    #[serde(rename = "segmentAttributes")]
    pub segment_attributes: Vec<Vec<SegmentAttributes>>,
}

/// Attributes of one labeled segment.
#[derive(Debug, Clone, Deserialize)]
pub struct SegmentAttributes {
    #[serde(rename = "SegmentedPropertyCategoryCodeSequence")]
    pub category: Option<CodeIdentifier>,

    #[serde(rename = "SegmentedPropertyTypeCodeSequence")]
    pub type_code: Option<CodeIdentifier>,

    #[serde(rename = "SegmentedPropertyTypeModifierCodeSequence")]
    pub type_modifier: Option<CodeIdentifier>,

    #[serde(rename = "AnatomicRegionSequence")]
    pub region: Option<CodeIdentifier>,

    #[serde(rename = "AnatomicRegionModifierSequence")]
    pub region_modifier: Option<CodeIdentifier>,

    #[serde(rename = "recommendedDisplayRGBValue")]
    pub recommended_display_rgb: Option<RecommendedColor>,
}

/// Outcome of a descriptor import.
#[derive(Debug, Clone)]
pub struct MergeSummary {
    /// Name the terminology (and any anatomic) context registered under.
    pub context_name: String,
    /// Elements merged into the contexts.
    pub merged: usize,
    /// Malformed elements skipped.
    pub skipped: usize,
}

/// Read and merge a descriptor file. See [`merge_descriptor`].
pub fn merge_descriptor_file(
    store: &mut ContextStore,
    context_name: &str,
    path: &Path,
) -> Result<MergeSummary> {
    let contents = std::fs::read_to_string(path).map_err(|e| ContextError::io(path, e))?;
    let descriptor: SegmentDescriptor =
        serde_json::from_str(&contents).map_err(|e| ContextError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;
    merge_descriptor(store, context_name, &descriptor)
}

/// Merge a descriptor into the store under `context_name`.
///
/// The named terminology context is extended in place (or created); an
/// anatomic context of the same name is touched only when an element
/// carries a region. Malformed elements are skipped and counted; a
/// descriptor where nothing merges is an error, and in that case the
/// store is left untouched.
pub fn merge_descriptor(
    store: &mut ContextStore,
    context_name: &str,
    descriptor: &SegmentDescriptor,
) -> Result<MergeSummary> {
    let mut terminology = store
        .terminology(context_name)
        .cloned()
        .unwrap_or_else(|| TerminologyContext::new(TERMINOLOGY_SCHEMAS[0], context_name));
    let mut anatomic: Option<AnatomicContext> = store.anatomic_context(context_name).cloned();

    let mut merged = 0usize;
    let mut skipped = 0usize;

    for (index, inner) in descriptor.segment_attributes.iter().enumerate() {
        let Some(attributes) = inner.first() else {
            warn!(element = index, "skipping empty inner list");
            skipped += 1;
            continue;
        };
        match merge_element(&mut terminology, &mut anatomic, context_name, attributes) {
            Ok(()) => merged += 1,
            Err(reason) => {
                warn!(element = index, reason, "skipping malformed segment attributes");
                skipped += 1;
            }
        }
    }

    if merged == 0 {
        return Err(ContextError::EmptyDescriptor);
    }

    info!(
        context = context_name,
        merged, skipped, "merged segment descriptor"
    );
    store.insert_terminology(terminology);
    if let Some(anatomic) = anatomic {
        store.insert_anatomic(anatomic);
    }
    Ok(MergeSummary {
        context_name: context_name.to_string(),
        merged,
        skipped,
    })
}

/// Merge one attribute object. Returns a human-readable reason on skip.
fn merge_element(
    terminology: &mut TerminologyContext,
    anatomic: &mut Option<AnatomicContext>,
    context_name: &str,
    attributes: &SegmentAttributes,
) -> std::result::Result<(), &'static str> {
    let category_id = identified(attributes.category.as_ref())
        .ok_or("missing or incomplete category code")?;
    let type_id =
        identified(attributes.type_code.as_ref()).ok_or("missing or incomplete type code")?;
    let color = attributes
        .recommended_display_rgb
        .ok_or("missing recommended display color")?;

    // Category and type: find or create, then write back at the original
    // index so repeated imports never reorder siblings.
    let (category_index, mut category) =
        match find_code(&terminology.codes.categories, category_id) {
            Some((index, found)) => (Some(index), found.clone()),
            None => (None, Category::from_code(category_id.clone())),
        };
    let (type_index, mut type_term) = match find_code(&category.types, type_id) {
        Some((index, found)) => (Some(index), found.clone()),
        None => (None, TypeTerm::from_code(type_id.clone())),
    };

    if let Some(modifier_id) = identified(attributes.type_modifier.as_ref()) {
        if find_code(&type_term.modifiers, modifier_id).is_none() {
            let mut modifier = TypeTerm::from_code(modifier_id.clone());
            modifier.recommended_display_rgb = Some(color);
            type_term.modifiers.push(modifier);
            // A node with modifiers has no color of its own.
            type_term.recommended_display_rgb = None;
        }
    } else if !type_term.has_modifiers() && type_term.recommended_display_rgb.is_none() {
        type_term.recommended_display_rgb = Some(color);
    }

    match type_index {
        Some(index) => category.types[index] = type_term,
        None => category.types.push(type_term),
    }
    match category_index {
        Some(index) => terminology.codes.categories[index] = category,
        None => terminology.codes.categories.push(category),
    }

    // Regions mirror the type handling without any color.
    if let Some(region_id) = identified(attributes.region.as_ref()) {
        let document = anatomic
            .get_or_insert_with(|| AnatomicContext::new(ANATOMIC_SCHEMAS[0], context_name));
        let (region_index, mut region) = match find_code(&document.codes.regions, region_id) {
            Some((index, found)) => (Some(index), found.clone()),
            None => (None, TypeTerm::from_code(region_id.clone())),
        };
        if let Some(modifier_id) = identified(attributes.region_modifier.as_ref()) {
            if find_code(&region.modifiers, modifier_id).is_none() {
                region.modifiers.push(TypeTerm::from_code(modifier_id.clone()));
            }
        }
        match region_index {
            Some(index) => document.codes.regions[index] = region,
            None => document.codes.regions.push(region),
        }
    }

    Ok(())
}

fn identified(code: Option<&CodeIdentifier>) -> Option<&CodeIdentifier> {
    code.filter(|c| c.has_identity())
}
