//! Date resolution for order messages.
//!
//! Cues are tried in a fixed order against the lowercased text:
//! numeric `Y-M-D` or `D/M[/Y]`, `today`, `tomorrow`/`tmrw`/`tmr`, then weekday names.
//! A numeric date always decides the outcome, even when it is not a valid
//! calendar date.

use chrono::{Datelike, Days, NaiveDate};
use tracing::debug;

use super::patterns::{NUMERIC_DATE, TODAY, TOMORROW, WEEKDAYS};
use super::{ExtractionMatch, FieldExtractor};

/// Date resolver anchored on a reference date.
#[derive(Debug, Clone, Copy)]
pub struct DateResolver {
    today: NaiveDate,
}

impl DateResolver {
    /// Create a resolver that treats `today` as the current date.
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// The reference date.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Resolve the first date cue in `text`.
    pub fn resolve(&self, text: &str) -> Option<NaiveDate> {
        let lower = text.to_lowercase();

        if let Some(caps) = NUMERIC_DATE.captures(&lower) {
            let date = numeric_date(&caps, self.today);
            debug!("Numeric date cue {:?} resolved to {:?}", &caps[0], date);
            return date;
        }

        if TODAY.is_match(&lower) {
            return Some(self.today);
        }

        if TOMORROW.is_match(&lower) {
            return self.today.checked_add_days(Days::new(1));
        }

        WEEKDAYS
            .iter()
            .position(|pattern| pattern.is_match(&lower))
            .and_then(|index| self.next_weekday(index as u32))
    }

    /// Next date on or after today falling on the weekday `index` (Sunday = 0).
    fn next_weekday(&self, index: u32) -> Option<NaiveDate> {
        let current = self.today.weekday().num_days_from_sunday();
        let delta = (index + 7 - current) % 7;
        self.today.checked_add_days(Days::new(delta as u64))
    }
}

impl FieldExtractor for DateResolver {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let date = self.resolve(text)?;
        Some(ExtractionMatch::new(date, text))
    }

    /// Every cue that resolves to a valid date, in precedence order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let lower = text.to_lowercase();
        let mut results = Vec::new();

        for caps in NUMERIC_DATE.captures_iter(&lower) {
            if let (Some(date), Some(full)) = (numeric_date(&caps, self.today), caps.get(0)) {
                results.push(
                    ExtractionMatch::new(date, full.as_str())
                        .with_position(full.start(), full.end()),
                );
            }
        }

        if let Some(m) = TODAY.find(&lower) {
            results.push(
                ExtractionMatch::new(self.today, m.as_str()).with_position(m.start(), m.end()),
            );
        }

        if let Some(m) = TOMORROW.find(&lower) {
            if let Some(date) = self.today.checked_add_days(Days::new(1)) {
                results.push(
                    ExtractionMatch::new(date, m.as_str()).with_position(m.start(), m.end()),
                );
            }
        }

        for (index, pattern) in WEEKDAYS.iter().enumerate() {
            if let (Some(m), Some(date)) = (pattern.find(&lower), self.next_weekday(index as u32)) {
                results.push(ExtractionMatch::new(date, m.as_str()).with_position(m.start(), m.end()));
            }
        }

        results
    }
}

/// Resolve the first date cue in `text` relative to `today`.
pub fn resolve_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    DateResolver::new(today).resolve(text)
}

fn numeric_date(caps: &regex::Captures<'_>, today: NaiveDate) -> Option<NaiveDate> {
    if let Some(year) = caps.name("iso_year") {
        let year: i32 = year.as_str().parse().ok()?;
        let month: u32 = caps.name("iso_month")?.as_str().parse().ok()?;
        let day: u32 = caps.name("iso_day")?.as_str().parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    let day: u32 = caps.name("day")?.as_str().parse().ok()?;
    let month: u32 = caps.name("month")?.as_str().parse().ok()?;
    let year = match caps.name("year") {
        Some(y) => parse_year(y.as_str())?,
        None => today.year(),
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    if s.len() <= 2 {
        // Two-digit year: assume 2000s for 00-50, 1900s for 51-99
        if year <= 50 {
            Some(2000 + year)
        } else {
            Some(1900 + year)
        }
    } else {
        Some(year)
    }
}
