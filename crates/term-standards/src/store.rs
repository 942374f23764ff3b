//! Name-indexed store of loaded dictionary documents.
//!
//! Two registries, one per document kind, hold every loaded context for
//! the lifetime of the process. Loading a context whose name is already
//! registered replaces the old document wholesale; the old tree is
//! discarded only after the new one has fully parsed and validated, so a
//! failed reload leaves the store untouched. The store performs no
//! locking; an embedding application with concurrent access must
//! serialize calls externally.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use term_model::{AnatomicContext, Category, CodeIdentifier, TerminologyContext, TypeTerm};

use crate::error::{ContextError, Result};
use crate::loader::{LoadedContext, load_context_file};

/// Baseline dictionaries loaded at start-up, relative to the dictionaries
/// root.
pub const DEFAULT_DICTIONARIES: &[&str] = &[
    "terminologies/SegmentationCategoryTypeModifier-GeneralAnatomy.json",
    "terminologies/SegmentationCategoryTypeModifier-DICOM-Master.json",
    "anatomic/AnatomicRegionAndModifier-DICOM-Master.json",
];

/// Root directory of the shipped dictionaries.
///
/// `TERM_DICTIONARIES_DIR` overrides the repository-relative default.
pub fn default_dictionaries_root() -> PathBuf {
    if let Ok(root) = std::env::var("TERM_DICTIONARIES_DIR") {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../dictionaries")
}

#[derive(Debug, Clone, Default)]
pub struct ContextStore {
    terminologies: BTreeMap<String, TerminologyContext>,
    anatomic_contexts: BTreeMap<String, AnatomicContext>,
}

impl ContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store preloaded with the baseline dictionaries from the default
    /// root.
    pub fn with_defaults() -> Result<Self> {
        Self::with_defaults_from(&default_dictionaries_root())
    }

    /// A store preloaded with the baseline dictionaries from `root`.
    pub fn with_defaults_from(root: &Path) -> Result<Self> {
        let mut store = Self::new();
        for relative in DEFAULT_DICTIONARIES {
            store.load_file(&root.join(relative))?;
        }
        Ok(store)
    }

    /// Parse, validate, and register a dictionary file.
    ///
    /// Returns the name the document registered under. A document with
    /// the same name and kind as an already-loaded one replaces it.
    pub fn load_file(&mut self, path: &Path) -> Result<String> {
        let loaded = load_context_file(path)?;
        let name = loaded.name().to_string();
        info!(
            path = %path.display(),
            kind = %loaded.kind(),
            context = %name,
            "loaded dictionary"
        );
        match loaded {
            LoadedContext::Terminology(context) => self.insert_terminology(context),
            LoadedContext::Anatomic(context) => self.insert_anatomic(context),
        }
        Ok(name)
    }

    /// Scan a directory (non-recursively) for `*.json` dictionaries.
    ///
    /// Subdirectories, files without a `.json` suffix, and files that
    /// fail schema detection or validation are skipped without aborting
    /// the scan. Files load in path order, so on a name collision the
    /// last file wins. Returns the names that registered.
    pub fn load_user_directory(&mut self, dir: &Path) -> Result<Vec<String>> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(|e| ContextError::io(dir, e))?
            .flatten()
            .map(|entry| entry.path())
            .collect();
        paths.sort();

        let mut loaded = Vec::new();
        for path in paths {
            if !path.is_file() {
                debug!(path = %path.display(), "skipping non-file entry");
                continue;
            }
            let is_json = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if !is_json {
                debug!(path = %path.display(), "skipping non-json file");
                continue;
            }
            match self.load_file(&path) {
                Ok(name) => loaded.push(name),
                Err(error) => {
                    warn!(path = %path.display(), %error, "skipping dictionary file");
                }
            }
        }
        Ok(loaded)
    }

    /// Register a terminology context, replacing any previous document of
    /// the same name.
    pub fn insert_terminology(&mut self, context: TerminologyContext) {
        self.terminologies.insert(context.name.clone(), context);
    }

    /// Register an anatomic context, replacing any previous document of
    /// the same name.
    pub fn insert_anatomic(&mut self, context: AnatomicContext) {
        self.anatomic_contexts.insert(context.name.clone(), context);
    }

    pub fn terminology_names(&self) -> Vec<&str> {
        self.terminologies.keys().map(String::as_str).collect()
    }

    pub fn anatomic_names(&self) -> Vec<&str> {
        self.anatomic_contexts.keys().map(String::as_str).collect()
    }

    pub fn terminology(&self, name: &str) -> Option<&TerminologyContext> {
        self.terminologies.get(name)
    }

    pub fn anatomic_context(&self, name: &str) -> Option<&AnatomicContext> {
        self.anatomic_contexts.get(name)
    }

    // Chained accessors: each link returns None when the context is not
    // loaded or any parent node is absent. Absence is not an error here;
    // callers decide.

    pub fn category(&self, terminology: &str, id: &CodeIdentifier) -> Option<&Category> {
        self.terminology(terminology)?.category(id)
    }

    pub fn type_term(
        &self,
        terminology: &str,
        category_id: &CodeIdentifier,
        id: &CodeIdentifier,
    ) -> Option<&TypeTerm> {
        self.category(terminology, category_id)?.type_term(id)
    }

    pub fn type_modifier(
        &self,
        terminology: &str,
        category_id: &CodeIdentifier,
        type_id: &CodeIdentifier,
        id: &CodeIdentifier,
    ) -> Option<&TypeTerm> {
        self.type_term(terminology, category_id, type_id)?.modifier(id)
    }

    pub fn region(&self, anatomic: &str, id: &CodeIdentifier) -> Option<&TypeTerm> {
        self.anatomic_context(anatomic)?.region(id)
    }

    pub fn region_modifier(
        &self,
        anatomic: &str,
        region_id: &CodeIdentifier,
        id: &CodeIdentifier,
    ) -> Option<&TypeTerm> {
        self.region(anatomic, region_id)?.modifier(id)
    }

    // By-meaning accessors, used when re-resolving code-meaning lists.

    pub fn category_by_meaning(&self, terminology: &str, meaning: &str) -> Option<&Category> {
        self.terminology(terminology)?.category_by_meaning(meaning)
    }

    pub fn type_by_meaning(
        &self,
        terminology: &str,
        category_id: &CodeIdentifier,
        meaning: &str,
    ) -> Option<&TypeTerm> {
        self.category(terminology, category_id)?.type_by_meaning(meaning)
    }

    pub fn region_by_meaning(&self, anatomic: &str, meaning: &str) -> Option<&TypeTerm> {
        self.anatomic_context(anatomic)?.region_by_meaning(meaning)
    }

    // Search wrappers over a named context.

    pub fn find_categories(&self, terminology: &str, search: &str) -> Option<Vec<&Category>> {
        Some(self.terminology(terminology)?.categories_matching(search))
    }

    pub fn find_types(
        &self,
        terminology: &str,
        category_id: &CodeIdentifier,
        search: &str,
    ) -> Option<Vec<&TypeTerm>> {
        Some(self.category(terminology, category_id)?.types_matching(search))
    }

    pub fn find_regions(&self, anatomic: &str, search: &str) -> Option<Vec<&TypeTerm>> {
        Some(self.anatomic_context(anatomic)?.regions_matching(search))
    }

    // Positional accessors. Out-of-range indices and missing parents are
    // reported as errors, never as panics.

    pub fn nth_category(&self, terminology: &str, index: usize) -> Result<&Category> {
        let context = self
            .terminology(terminology)
            .ok_or_else(|| ContextError::ContextNotFound {
                name: terminology.to_string(),
            })?;
        Ok(context.nth_category(index)?)
    }

    pub fn nth_type(
        &self,
        terminology: &str,
        category_id: &CodeIdentifier,
        index: usize,
    ) -> Result<&TypeTerm> {
        let category = self.category(terminology, category_id).ok_or_else(|| {
            ContextError::CodeNotFound {
                what: "category",
                code: category_id.to_string(),
                scope: terminology.to_string(),
            }
        })?;
        Ok(category.nth_type(index)?)
    }

    pub fn nth_type_modifier(
        &self,
        terminology: &str,
        category_id: &CodeIdentifier,
        type_id: &CodeIdentifier,
        index: usize,
    ) -> Result<&TypeTerm> {
        let type_term = self
            .type_term(terminology, category_id, type_id)
            .ok_or_else(|| ContextError::CodeNotFound {
                what: "type",
                code: type_id.to_string(),
                scope: terminology.to_string(),
            })?;
        Ok(type_term.nth_modifier(index)?)
    }

    pub fn nth_region(&self, anatomic: &str, index: usize) -> Result<&TypeTerm> {
        let context = self
            .anatomic_context(anatomic)
            .ok_or_else(|| ContextError::ContextNotFound {
                name: anatomic.to_string(),
            })?;
        Ok(context.nth_region(index)?)
    }

    pub fn nth_region_modifier(
        &self,
        anatomic: &str,
        region_id: &CodeIdentifier,
        index: usize,
    ) -> Result<&TypeTerm> {
        let region = self.region(anatomic, region_id).ok_or_else(|| {
            ContextError::CodeNotFound {
                what: "region",
                code: region_id.to_string(),
                scope: anatomic.to_string(),
            }
        })?;
        Ok(region.nth_modifier(index)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_store() -> ContextStore {
        let mut context = TerminologyContext::new("", "T1");
        let mut tissue =
            Category::from_code(CodeIdentifier::new("SCT", "85756007", "Tissue"));
        tissue
            .types
            .push(TypeTerm::from_code(CodeIdentifier::new(
                "SCT", "51114001", "Artery",
            )));
        context.codes.categories.push(tissue);

        let mut store = ContextStore::new();
        store.insert_terminology(context);
        store
    }

    #[test]
    fn chained_lookup_propagates_absence() {
        let store = small_store();
        let tissue = CodeIdentifier::new("SCT", "85756007", "");
        let artery = CodeIdentifier::new("SCT", "51114001", "");

        assert!(store.type_term("T1", &tissue, &artery).is_some());
        assert!(store.type_term("T1", &tissue, &CodeIdentifier::new("SCT", "0", "")).is_none());
        assert!(store.type_term("missing", &tissue, &artery).is_none());
    }

    #[test]
    fn reload_replaces_wholesale() {
        let mut store = small_store();
        let replacement = TerminologyContext::new("", "T1");
        store.insert_terminology(replacement);
        let context = store.terminology("T1").expect("T1 still registered");
        assert!(context.categories().is_empty(), "old tree fully discarded");
    }
}
