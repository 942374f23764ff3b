//! A concrete terminology selection.

use serde::{Deserialize, Serialize};

use crate::color::RecommendedColor;
use crate::context::{Category, TypeTerm};

/// One selected path through a terminology context and, optionally, one
/// through an anatomic context.
///
/// Entries are transient value objects: the engine builds them per query
/// and never stores them. The records inside are structural copies of the
/// dictionary nodes they were resolved from, so an entry stays usable
/// after its source context is replaced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerminologyEntry {
    pub terminology_context_name: Option<String>,
    pub category: Option<Category>,
    pub type_term: Option<TypeTerm>,
    pub type_modifier: Option<TypeTerm>,
    pub anatomic_context_name: Option<String>,
    pub region: Option<TypeTerm>,
    pub region_modifier: Option<TypeTerm>,
}

impl TerminologyEntry {
    /// An entry is valid when category and type are both present with
    /// complete code triples.
    pub fn is_valid(&self) -> bool {
        let category_ok = self
            .category
            .as_ref()
            .is_some_and(|c| c.code.is_complete());
        let type_ok = self.type_term.as_ref().is_some_and(|t| t.code.is_complete());
        category_ok && type_ok
    }

    /// An entry is empty when every field is absent or blank.
    pub fn is_empty(&self) -> bool {
        self.terminology_context_name
            .as_deref()
            .unwrap_or_default()
            .trim()
            .is_empty()
            && self.category.is_none()
            && self.type_term.is_none()
            && self.type_modifier.is_none()
            && self
                .anatomic_context_name
                .as_deref()
                .unwrap_or_default()
                .trim()
                .is_empty()
            && self.region.is_none()
            && self.region_modifier.is_none()
    }

    /// Resets every field.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Display color of the selection.
    ///
    /// When the selected type has modifiers the color comes from the
    /// selected modifier; otherwise from the type itself. The sentinel
    /// gray is returned when nothing supplies a color.
    pub fn recommended_color(&self) -> RecommendedColor {
        let Some(type_term) = self.type_term.as_ref() else {
            return RecommendedColor::INVALID;
        };
        if type_term.has_modifiers() {
            return self
                .type_modifier
                .as_ref()
                .map(TypeTerm::display_color)
                .unwrap_or_default();
        }
        type_term.display_color()
    }
}
