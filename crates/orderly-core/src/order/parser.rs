//! Order assembly and segmentation of multi-order messages.

use std::time::Instant;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::config::ExtractionConfig;
use crate::models::order::OrderRecord;

use super::rules::{
    BagsExtractor, BrokerExtractor, CustomerExtractor, DateResolver, FieldExtractor,
    RateExtractor, UnitExtractor,
};

/// Result of parsing a message.
#[derive(Debug, Clone, Serialize)]
pub struct ParseResult {
    /// Extracted orders, in message order.
    pub orders: Vec<OrderRecord>,
    /// Normalized message text.
    pub raw_text: String,
    /// Fields that look incomplete, one line per issue.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Part of a message assigned to one unit mention.
struct TextSpan<'a> {
    unit: String,
    text: &'a str,
}

/// Order extraction engine.
///
/// Holds no state between calls; the reference date is passed to every call.
#[derive(Clone, Default)]
pub struct OrderParser {
    rates: RateExtractor,
}

impl OrderParser {
    /// Create a parser recognizing the default currency symbol.
    pub fn new() -> Self {
        Self {
            rates: RateExtractor::new(),
        }
    }

    /// Create a parser from extraction settings.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        Ok(Self {
            rates: RateExtractor::with_currency_symbols(config.currency_symbols.as_slice())?,
        })
    }

    /// Extract a single order from the whole message.
    pub fn parse_order_at(&self, text: &str, today: NaiveDate) -> OrderRecord {
        self.assemble(&normalize_message(text), today)
    }

    /// Extract one order per unit mention.
    ///
    /// A message without any unit code yields exactly one order, possibly empty.
    pub fn parse_orders_at(&self, text: &str, today: NaiveDate) -> Vec<OrderRecord> {
        let text = normalize_message(text);
        self.segment(&text, today)
    }

    /// Extract orders and report incomplete fields.
    pub fn parse(&self, text: &str, today: NaiveDate) -> ParseResult {
        let start = Instant::now();
        let raw_text = normalize_message(text);

        info!("Parsing orders from {} characters of text", raw_text.len());

        let orders = self.segment(&raw_text, today);
        let mut warnings = Vec::new();

        if UnitExtractor::new().extract(&raw_text).is_none() {
            warnings.push("No unit code found; message treated as a single order".to_string());
        }
        warnings.extend(missing_field_warnings(&orders));

        debug!(
            "Extracted {} orders with {} warnings",
            orders.len(),
            warnings.len()
        );

        ParseResult {
            orders,
            raw_text,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Extract the whole message as one order and report its incomplete fields.
    pub fn parse_single(&self, text: &str, today: NaiveDate) -> ParseResult {
        let start = Instant::now();
        let raw_text = normalize_message(text);

        let orders = vec![self.assemble(&raw_text, today)];
        let warnings = missing_field_warnings(&orders);

        ParseResult {
            orders,
            raw_text,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Run every field extractor and the date resolver over one span.
    fn assemble(&self, span: &str, today: NaiveDate) -> OrderRecord {
        OrderRecord {
            unit: UnitExtractor::new().extract(span).map(|m| m.value),
            bags: BagsExtractor::new().extract(span).map(|m| m.value),
            rate: self.rates.extract(span).map(|m| m.value),
            customer: CustomerExtractor::new().extract(span).map(|m| m.value),
            broker: BrokerExtractor::new().extract(span).map(|m| m.value),
            date: DateResolver::new(today).resolve(span),
        }
    }

    fn segment(&self, text: &str, today: NaiveDate) -> Vec<OrderRecord> {
        let spans = split_spans(text);

        if spans.is_empty() {
            debug!("No unit code found, parsing message as one order");
            return vec![self.assemble(text, today)];
        }

        debug!("Found {} unit mentions", spans.len());

        spans
            .into_iter()
            .map(|span| {
                let order = self.assemble(span.text, today);
                debug!("Segment {} -> {:?}", span.unit, span.text);

                if order.unit.is_some() {
                    order
                } else {
                    OrderRecord {
                        unit: Some(span.unit),
                        ..order
                    }
                }
            })
            .filter(|order| !order.is_empty())
            .collect()
    }
}

/// One warning per missing bag count, customer or date, labelled by order.
fn missing_field_warnings(orders: &[OrderRecord]) -> Vec<String> {
    let mut warnings = Vec::new();

    for (i, order) in orders.iter().enumerate() {
        let label = match &order.unit {
            Some(unit) => format!("Order {} ({})", i + 1, unit),
            None => format!("Order {}", i + 1),
        };

        if order.bags.is_none() {
            warnings.push(format!("{}: could not extract bag count", label));
        }
        if order.customer.is_none() {
            warnings.push(format!("{}: could not extract customer", label));
        }
        if order.date.is_none() {
            warnings.push(format!("{}: could not resolve a date", label));
        }
    }

    warnings
}

/// Split a message into contiguous spans, each starting at a unit mention
/// and ending where the next one starts.
fn split_spans(text: &str) -> Vec<TextSpan<'_>> {
    let units = UnitExtractor::new().extract_all(text);

    units
        .iter()
        .enumerate()
        .map(|(i, unit)| {
            let start = unit.start();
            let end = units.get(i + 1).map(|next| next.start()).unwrap_or(text.len());
            TextSpan {
                unit: unit.value.clone(),
                text: &text[start..end],
            }
        })
        .collect()
}

/// Replace line breaks with spaces and trim.
pub fn normalize_message(text: &str) -> String {
    text.replace(['\r', '\n'], " ").trim().to_string()
}

/// Build one order from a span of text, exactly as given.
pub fn assemble_order(span: &str, today: NaiveDate) -> OrderRecord {
    OrderParser::new().assemble(span, today)
}

/// Split a message into orders, one per unit mention.
pub fn segment_orders(message: &str, today: NaiveDate) -> Vec<OrderRecord> {
    OrderParser::new().parse_orders_at(message, today)
}

/// Extract a single order, resolving dates against the local calendar date.
pub fn parse_order(text: &str) -> OrderRecord {
    OrderParser::new().parse_order_at(text, Local::now().date_naive())
}

/// Extract every order, resolving dates against the local calendar date.
pub fn parse_orders(text: &str) -> Vec<OrderRecord> {
    OrderParser::new().parse_orders_at(text, Local::now().date_naive())
}
