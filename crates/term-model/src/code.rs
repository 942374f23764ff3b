#![deny(unsafe_code)]

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A coded concept triple as used by DICOM code sequences.
///
/// Identity is the (designator, value) pair; the meaning is descriptive
/// text and is excluded from equality and hashing. Two dictionaries may
/// carry different meanings for the same code and still refer to the same
/// concept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeIdentifier {
    /// Coding scheme designator (e.g., "SCT" for SNOMED CT).
    #[serde(rename = "CodingSchemeDesignator")]
    pub designator: String,

    /// Code value within the coding scheme (e.g., "85756007").
    #[serde(rename = "CodeValue")]
    pub value: String,

    /// Human-readable code meaning (e.g., "Tissue").
    #[serde(rename = "CodeMeaning")]
    pub meaning: String,
}

impl CodeIdentifier {
    pub fn new(
        designator: impl Into<String>,
        value: impl Into<String>,
        meaning: impl Into<String>,
    ) -> Self {
        Self {
            designator: designator.into(),
            value: value.into(),
            meaning: meaning.into(),
        }
    }

    /// Returns true when designator and value are both present.
    ///
    /// A code without an identity cannot be looked up or compared.
    pub fn has_identity(&self) -> bool {
        !self.designator.trim().is_empty() && !self.value.trim().is_empty()
    }

    /// Returns true when designator, value, and meaning are all present.
    pub fn is_complete(&self) -> bool {
        self.has_identity() && !self.meaning.trim().is_empty()
    }

    /// Returns true when every field is blank.
    pub fn is_empty(&self) -> bool {
        self.designator.trim().is_empty()
            && self.value.trim().is_empty()
            && self.meaning.trim().is_empty()
    }
}

impl PartialEq for CodeIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.designator == other.designator && self.value == other.value
    }
}

impl Eq for CodeIdentifier {}

impl Hash for CodeIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.designator.hash(state);
        self.value.hash(state);
    }
}

impl fmt::Display for CodeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, \"{}\")", self.designator, self.value, self.meaning)
    }
}

/// A node carrying a [`CodeIdentifier`].
///
/// Implemented by every dictionary node so sibling arrays can share one
/// lookup routine.
pub trait Coded {
    fn code(&self) -> &CodeIdentifier;
}

/// Linear scan of a sibling array for a code, first match wins.
///
/// Sibling arrays never contain duplicate codes, so the first match is
/// also the only match. Returns the index alongside the node so callers
/// that write back can preserve position.
pub fn find_code<'a, T: Coded>(items: &'a [T], id: &CodeIdentifier) -> Option<(usize, &'a T)> {
    items.iter().enumerate().find(|(_, item)| item.code() == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_ignores_meaning() {
        let a = CodeIdentifier::new("SCT", "85756007", "Tissue");
        let b = CodeIdentifier::new("SCT", "85756007", "Tissue (edited)");
        assert_eq!(a, b);

        let c = CodeIdentifier::new("SCT", "85756008", "Tissue");
        assert_ne!(a, c);
        let d = CodeIdentifier::new("DCM", "85756007", "Tissue");
        assert_ne!(a, d);
    }

    #[test]
    fn completeness_checks() {
        let full = CodeIdentifier::new("SCT", "51114001", "Artery");
        assert!(full.has_identity());
        assert!(full.is_complete());
        assert!(!full.is_empty());

        let no_meaning = CodeIdentifier::new("SCT", "51114001", "");
        assert!(no_meaning.has_identity());
        assert!(!no_meaning.is_complete());

        let blank = CodeIdentifier::default();
        assert!(blank.is_empty());
        assert!(!blank.has_identity());
    }
}
