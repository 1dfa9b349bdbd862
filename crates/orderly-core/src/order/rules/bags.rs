//! Bag count extraction.

use super::patterns::BAGS_PATTERN;
use super::{ExtractionMatch, FieldExtractor};

/// Bag count extractor: `120 bags`, `75 bag`, `200bg`.
pub struct BagsExtractor;

impl BagsExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BagsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for BagsExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        BAGS_PATTERN
            .captures_iter(text)
            .filter_map(|caps| {
                let full = caps.get(0)?;
                Some(
                    ExtractionMatch::new(caps[1].to_string(), full.as_str())
                        .with_position(full.start(), full.end()),
                )
            })
            .collect()
    }
}

/// Extract the first bag count from text, digits as written.
pub fn extract_bags(text: &str) -> Option<String> {
    BagsExtractor::new().extract(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bag_word_variants() {
        assert_eq!(extract_bags("STL 120 bags to X"), Some("120".to_string()));
        assert_eq!(extract_bags("DV 75 bag"), Some("75".to_string()));
        assert_eq!(extract_bags("SKS 200 bg"), Some("200".to_string()));
        assert_eq!(extract_bags("40BAGS"), Some("40".to_string()));
    }

    #[test]
    fn test_requires_bag_word() {
        assert_eq!(extract_bags("STL 120 to Ravi"), None);
        assert_eq!(extract_bags("120 bagged"), None);
    }

    #[test]
    fn test_at_most_four_digits() {
        assert_eq!(extract_bags("12345 bags"), Some("2345".to_string()));
    }

    #[test]
    fn test_leading_zeros_kept() {
        assert_eq!(extract_bags("050 bags"), Some("050".to_string()));
    }
}
