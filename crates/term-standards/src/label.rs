//! Legacy short-label lookup.
//!
//! Older documents stored only a short display label instead of a full
//! coded entry. Upgrading such a record means scanning a terminology
//! context depth-first for the type or type modifier that carries the
//! label and rebuilding the full entry from its position in the tree.

use tracing::debug;

use term_model::TerminologyEntry;

use crate::store::ContextStore;

/// Find the entry whose type (or type modifier) carries `label`.
///
/// Exact string match against the optional short-label field, depth-first
/// over category -> type -> modifier; the first hit wins and the
/// remaining siblings are not searched. Intended only for upgrading
/// legacy label-only records, not for ordinary lookup.
pub fn entry_from_slicer_label(
    store: &ContextStore,
    terminology: &str,
    label: &str,
) -> Option<TerminologyEntry> {
    let context = store.terminology(terminology)?;
    for category in context.categories() {
        for type_term in &category.types {
            if type_term.slicer_label.as_deref() == Some(label) {
                return Some(TerminologyEntry {
                    terminology_context_name: Some(terminology.to_string()),
                    category: Some(category.clone()),
                    type_term: Some(type_term.clone()),
                    ..TerminologyEntry::default()
                });
            }
            for modifier in &type_term.modifiers {
                if modifier.slicer_label.as_deref() == Some(label) {
                    return Some(TerminologyEntry {
                        terminology_context_name: Some(terminology.to_string()),
                        category: Some(category.clone()),
                        type_term: Some(type_term.clone()),
                        type_modifier: Some(modifier.clone()),
                        ..TerminologyEntry::default()
                    });
                }
            }
        }
    }
    debug!(terminology, label, "no entry carries the legacy label");
    None
}
