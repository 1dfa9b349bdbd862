//! Unit code extraction.

use super::patterns::UNIT_PATTERN;
use super::{ExtractionMatch, FieldExtractor};

/// Unit code extractor.
///
/// Matches the fixed unit vocabulary anywhere in the text, case-insensitively,
/// and reports codes in uppercase.
pub struct UnitExtractor;

impl UnitExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UnitExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for UnitExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        UNIT_PATTERN.find(text).map(to_match)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        UNIT_PATTERN.find_iter(text).map(to_match).collect()
    }
}

fn to_match(m: regex::Match<'_>) -> ExtractionMatch<String> {
    ExtractionMatch::new(m.as_str().to_uppercase(), m.as_str()).with_position(m.start(), m.end())
}

/// Extract the first unit code from text.
pub fn extract_unit(text: &str) -> Option<String> {
    UnitExtractor::new().extract(text).map(|m| m.value)
}
