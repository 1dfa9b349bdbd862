//! Common regex patterns for order extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Recognized unit codes, in match priority order.
pub const UNIT_CODES: [&str; 11] = [
    "STL", "SKS", "DV", "FTL", "9477", "8677", "7144", "9499", "1616", "7827", "1497",
];

/// Currency symbol recognized in front of a rate when nothing else is configured.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Weekday names indexed from Sunday (0) to Saturday (6).
pub const WEEKDAY_NAMES: [&str; 7] = [
    "sun|sunday",
    "mon|monday",
    "tue|tues|tuesday",
    "wed|weds|wednesday",
    "thu|thur|thurs|thursday",
    "fri|friday",
    "sat|saturday",
];

lazy_static! {
    // Unit codes, unanchored: a code embedded in a longer token still counts
    pub static ref UNIT_PATTERN: Regex = Regex::new(
        &format!(r"(?i)({})", UNIT_CODES.join("|"))
    ).unwrap();

    // "120 bags", "75 bag", "200bg"; ASCII digits only
    pub static ref BAGS_PATTERN: Regex = Regex::new(
        r"(?i)([0-9]{1,4})\s*(?:bags?|bg)\b"
    ).unwrap();

    // "₹1345/bag" or "rate 1345"
    pub static ref RATE_PATTERN: Regex = rate_pattern(&[DEFAULT_CURRENCY_SYMBOL]).unwrap();

    // Party names
    pub static ref BROKER_PATTERN: Regex = Regex::new(
        r"(?i)\bbroker[:\-]?\s*([A-Za-z\s&.]+)"
    ).unwrap();

    pub static ref CUSTOMER_PATTERN: Regex = Regex::new(
        r"(?i)(?:\bcustomer\b|\bto\b)[:\-\s]*([A-Za-z0-9\s&.]+)"
    ).unwrap();

    // Words that open another field; a party name never runs past them
    pub static ref FIELD_CUE: Regex = Regex::new(
        &format!(
            r"(?i)\b(?:to|on|customer|broker|rate|bags?|bg|today|tomorrow|tmrw|tmr|{})\b",
            WEEKDAY_NAMES.join("|")
        )
    ).unwrap();

    pub static ref NAME_DISALLOWED: Regex = Regex::new(
        r"[^A-Za-z0-9&.\-\s]"
    ).unwrap();

    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    // Date cues, matched against lowercased text.
    // `Y-M-D` is tried before `D/M[/Y]` at each position, so an ISO date is
    // never read from its tail.
    pub static ref NUMERIC_DATE: Regex = Regex::new(
        r"\b(?:(?P<iso_year>[0-9]{4})[/\-.](?P<iso_month>[0-9]{1,2})[/\-.](?P<iso_day>[0-9]{1,2})\b|(?P<day>[0-9]{1,2})[/\-.](?P<month>[0-9]{1,2})(?:[/\-.](?P<year>[0-9]{2,4}))?)"
    ).unwrap();

    pub static ref TODAY: Regex = Regex::new(r"\btoday\b").unwrap();

    pub static ref TOMORROW: Regex = Regex::new(r"\b(?:tomorrow|tmrw|tmr)\b").unwrap();

    pub static ref WEEKDAYS: Vec<Regex> = WEEKDAY_NAMES
        .iter()
        .map(|names| Regex::new(&format!(r"\b(?:{})\b", names)).unwrap())
        .collect();
}

/// Build the rate pattern for a set of currency symbols.
///
/// The `symbol` group holds a symbol-prefixed amount, the `keyword` group the
/// amount after `rate`. An empty symbol list leaves only the `rate <n>` form.
pub fn rate_pattern<S: AsRef<str>>(symbols: &[S]) -> Result<Regex, regex::Error> {
    let symbols: Vec<String> = symbols
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .map(regex::escape)
        .collect();

    if symbols.is_empty() {
        return Regex::new(r"(?i)rate\s*(?P<keyword>[0-9]+(?:\.[0-9]+)?)");
    }

    Regex::new(&format!(
        r"(?i)(?:(?:{})\s?(?P<symbol>[0-9]+(?:\.[0-9]+)?)\s*(?:/\s*bag)?|rate\s*(?P<keyword>[0-9]+(?:\.[0-9]+)?))",
        symbols.join("|")
    ))
}
