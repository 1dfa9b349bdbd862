//! Rate extraction.

use regex::Regex;

use super::patterns::{rate_pattern, RATE_PATTERN};
use super::{ExtractionMatch, FieldExtractor};

/// Rate extractor.
///
/// Accepts a currency-prefixed amount with an optional `/bag` suffix
/// (`₹1345/bag`) or the keyword form (`rate 1345`). Only the number is kept.
#[derive(Clone)]
pub struct RateExtractor {
    pattern: Regex,
}

impl RateExtractor {
    /// Create an extractor recognizing the default currency symbol.
    pub fn new() -> Self {
        Self {
            pattern: RATE_PATTERN.clone(),
        }
    }

    /// Create an extractor recognizing the given currency symbols.
    pub fn with_currency_symbols<S: AsRef<str>>(symbols: &[S]) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: rate_pattern(symbols)?,
        })
    }
}

impl Default for RateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for RateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let full = caps.get(0)?;
                let amount = caps.name("symbol").or_else(|| caps.name("keyword"))?;
                Some(
                    ExtractionMatch::new(amount.as_str().to_string(), full.as_str())
                        .with_position(full.start(), full.end()),
                )
            })
            .collect()
    }
}

/// Extract the first rate from text using the default currency symbol.
pub fn extract_rate(text: &str) -> Option<String> {
    RateExtractor::new().extract(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_rate() {
        assert_eq!(extract_rate("broker Mani — rate 1345"), Some("1345".to_string()));
        assert_eq!(extract_rate("RATE:1299"), None);
        assert_eq!(extract_rate("Rate1299.50"), Some("1299.50".to_string()));
    }

    #[test]
    fn test_symbol_rate() {
        assert_eq!(extract_rate("40 bags @ ₹1320/bag"), Some("1320".to_string()));
        assert_eq!(extract_rate("₹ 1320 / bag"), Some("1320".to_string()));
        assert_eq!(extract_rate("₹99.75"), Some("99.75".to_string()));
    }

    #[test]
    fn test_first_rate_wins() {
        assert_eq!(extract_rate("₹1300 then rate 1400"), Some("1300".to_string()));
        assert_eq!(extract_rate("rate 1400 or ₹1300"), Some("1400".to_string()));
    }

    #[test]
    fn test_no_rate() {
        assert_eq!(extract_rate("STL 120 bags to Ravi"), None);
        assert_eq!(extract_rate("$1300"), None);
    }

    #[test]
    fn test_custom_symbols() {
        let extractor = RateExtractor::with_currency_symbols(&["Rs.", "INR"]).unwrap();

        assert_eq!(extractor.extract("@ Rs.1250/bag").map(|m| m.value), Some("1250".to_string()));
        assert_eq!(extractor.extract("inr 1250").map(|m| m.value), Some("1250".to_string()));
        assert_eq!(extractor.extract("₹1250"), None);
        assert_eq!(extractor.extract("rate 1250").map(|m| m.value), Some("1250".to_string()));
    }

    #[test]
    fn test_extract_all_rates() {
        let rates = RateExtractor::new().extract_all("₹1300/bag, later rate 1400");
        let values: Vec<_> = rates.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values, vec!["1300", "1400"]);
    }
}
