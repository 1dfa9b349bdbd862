//! Broker and customer name extraction.

use regex::Regex;

use super::patterns::{
    BAGS_PATTERN, BROKER_PATTERN, CUSTOMER_PATTERN, FIELD_CUE, NAME_DISALLOWED, NUMERIC_DATE,
    WHITESPACE,
};
use super::{ExtractionMatch, FieldExtractor};

/// Broker extractor: text after `broker`, `broker:` or `broker-`.
pub struct BrokerExtractor;

impl BrokerExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BrokerExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for BrokerExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        extract_name(&BROKER_PATTERN, text)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        extract_all_names(&BROKER_PATTERN, text)
    }
}

/// Customer extractor: text after `customer` or `to`.
pub struct CustomerExtractor;

impl CustomerExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CustomerExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CustomerExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        extract_name(&CUSTOMER_PATTERN, text)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        extract_all_names(&CUSTOMER_PATTERN, text)
    }
}

/// Extract the broker name from text.
pub fn extract_broker(text: &str) -> Option<String> {
    BrokerExtractor::new().extract(text).map(|m| m.value)
}

/// Extract the customer name from text.
pub fn extract_customer(text: &str) -> Option<String> {
    CustomerExtractor::new().extract(text).map(|m| m.value)
}

/// Normalize a captured name.
///
/// Collapses whitespace runs, drops every character other than ASCII
/// letters, digits, `&`, `.`, `-` and whitespace, then trims.
pub fn cleanup_name(name: &str) -> String {
    let collapsed = WHITESPACE.replace_all(name, " ");
    NAME_DISALLOWED.replace_all(&collapsed, "").trim().to_string()
}

// Only the first keyword occurrence is considered; an empty capture there
// means no name, even if a later keyword would have produced one.
fn extract_name(pattern: &Regex, text: &str) -> Option<ExtractionMatch<String>> {
    let caps = pattern.captures(text)?;
    name_from_capture(text, caps.get(1)?)
}

fn extract_all_names(pattern: &Regex, text: &str) -> Vec<ExtractionMatch<String>> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| name_from_capture(text, caps.get(1)?))
        .collect()
}

fn name_from_capture(text: &str, capture: regex::Match<'_>) -> Option<ExtractionMatch<String>> {
    let end = capture.start() + name_length(&text[capture.start()..], capture.len());
    let raw = &text[capture.start()..end];

    let name = cleanup_name(raw);
    if name.is_empty() {
        return None;
    }

    Some(ExtractionMatch::new(name, raw).with_position(capture.start(), end))
}

/// Length of the name at the start of `rest`, given a greedy capture of `captured` bytes.
///
/// The capture is cut where another field starts: a cue word (`on`, `broker`,
/// `today`, a weekday, ...), a bag quantity or a numeric date. A cue word that
/// opens the name is part of it ("Sun Traders").
fn name_length(rest: &str, captured: usize) -> usize {
    let cue = FIELD_CUE
        .find_iter(&rest[..captured])
        .map(|m| m.start())
        .find(|&start| start > 0);
    let bags = BAGS_PATTERN.find(rest).map(|m| m.start());
    let date = NUMERIC_DATE.find(rest).map(|m| m.start());

    [cue, bags, date]
        .into_iter()
        .flatten()
        .filter(|&start| start < captured)
        .fold(captured, usize::min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_name() {
        assert_eq!(cleanup_name("  Sri   Lakshmi, "), "Sri Lakshmi");
        assert_eq!(cleanup_name("A&B Traders."), "A&B Traders.");
        assert_eq!(cleanup_name("Mani —"), "Mani");
        assert_eq!(cleanup_name("K-Mart\n"), "K-Mart");
        assert_eq!(cleanup_name("!!!"), "");
    }

    #[test]
    fn test_broker() {
        assert_eq!(extract_broker("broker Mani — rate 1345"), Some("Mani".to_string()));
        assert_eq!(extract_broker("Broker: Arjun"), Some("Arjun".to_string()));
        assert_eq!(extract_broker("broker-K"), Some("K".to_string()));
        assert_eq!(extract_broker("broker M, SKS 30 bags"), Some("M".to_string()));
    }

    #[test]
    fn test_broker_stops_at_digits() {
        assert_eq!(extract_broker("broker Ravi 2 trucks"), Some("Ravi".to_string()));
    }

    #[test]
    fn test_broker_missing_or_empty() {
        assert_eq!(extract_broker("to Kumar"), None);
        assert_eq!(extract_broker("broker"), None);
        assert_eq!(extract_broker("broker 123"), None);
        assert_eq!(extract_broker("pawnbroker Ravi"), None);
    }

    #[test]
    fn test_customer_keywords() {
        assert_eq!(extract_customer("customer: Mohan"), Some("Mohan".to_string()));
        assert_eq!(extract_customer("120 bags to Sri Lakshmi"), Some("Sri Lakshmi".to_string()));
        assert_eq!(extract_customer("send to - ABC Traders"), Some("ABC Traders".to_string()));
    }

    #[test]
    fn test_customer_stops_at_other_fields() {
        assert_eq!(
            extract_customer("to Sri Lakshmi on 22/08 broker Mani"),
            Some("Sri Lakshmi".to_string())
        );
        assert_eq!(
            extract_customer("to Kumar Friday broker Arjun"),
            Some("Kumar".to_string())
        );
        assert_eq!(
            extract_customer("customer ABC today broker XYZ"),
            Some("ABC".to_string())
        );
        assert_eq!(extract_customer("to Ravi 22.08"), Some("Ravi".to_string()));
        assert_eq!(extract_customer("to Ravi 30 bags"), Some("Ravi".to_string()));
    }

    #[test]
    fn test_name_may_start_with_cue_word() {
        assert_eq!(extract_customer("to Sun Traders"), Some("Sun Traders".to_string()));
        assert_eq!(extract_customer("to Mon Ami Stores"), Some("Mon Ami Stores".to_string()));
        assert_eq!(extract_broker("broker Sat Pal"), Some("Sat Pal".to_string()));
        assert_eq!(
            extract_customer("to Sun Traders friday broker Sat Pal"),
            Some("Sun Traders".to_string())
        );
    }

    #[test]
    fn test_customer_keeps_digits() {
        assert_eq!(extract_customer("to Shop 7 Market"), Some("Shop 7 Market".to_string()));
    }

    #[test]
    fn test_customer_not_matched_inside_words() {
        assert_eq!(extract_customer("today 40 bags"), None);
        assert_eq!(extract_customer("tomato 40 bags"), None);
    }

    #[test]
    fn test_extract_all_customers() {
        let names = CustomerExtractor::new().extract_all("to A broker M, then to B broker N");
        let values: Vec<_> = names.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values, vec!["A", "B"]);
    }
}
