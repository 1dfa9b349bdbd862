//! Rule-based field extractors for order messages.
//!
//! Each extractor scans a piece of text on its own. Extractors never consume
//! text from each other, so the same digits may be seen by more than one rule.

pub mod bags;
pub mod dates;
pub mod names;
pub mod patterns;
pub mod rates;
pub mod units;

pub use bags::{extract_bags, BagsExtractor};
pub use dates::{resolve_date, DateResolver};
pub use names::{cleanup_name, extract_broker, extract_customer, BrokerExtractor, CustomerExtractor};
pub use patterns::{UNIT_CODES, DEFAULT_CURRENCY_SYMBOL};
pub use rates::{extract_rate, RateExtractor};
pub use units::{extract_unit, UnitExtractor};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value found in text, with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    /// Start offset of the match, 0 when unknown.
    pub fn start(&self) -> usize {
        self.position.map(|(start, _)| start).unwrap_or(0)
    }
}
