use std::fmt;

use serde::{Deserialize, Serialize};

/// Display color recommended for a terminology type or type modifier.
///
/// Serialized as a 3-element JSON array of 8-bit channels, matching the
/// `recommendedDisplayRGBValue` field of the dictionary files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct RecommendedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RecommendedColor {
    /// Sentinel gray used when a node carries no color of its own.
    pub const INVALID: RecommendedColor = RecommendedColor {
        r: 127,
        g: 127,
        b: 127,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Returns false for the sentinel gray.
    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }
}

impl Default for RecommendedColor {
    fn default() -> Self {
        Self::INVALID
    }
}

impl From<[u8; 3]> for RecommendedColor {
    fn from(rgb: [u8; 3]) -> Self {
        Self {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
        }
    }
}

impl From<RecommendedColor> for [u8; 3] {
    fn from(color: RecommendedColor) -> Self {
        [color.r, color.g, color.b]
    }
}

impl fmt::Display for RecommendedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}
