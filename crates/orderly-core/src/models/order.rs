//! Order record produced by the extraction engine.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{OrderlyError, Result};

/// Names of the fields of an [`OrderRecord`], in display order.
pub const FIELD_NAMES: [&str; 6] = ["unit", "date", "bags", "broker", "customer", "rate"];

/// A single order extracted from a message.
///
/// Every field is optional; `None` means the field was not detected.
/// Absent fields are omitted when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Unit code, uppercase (e.g. `STL`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Number of bags, as written in the message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bags: Option<String>,

    /// Rate per bag, without currency symbol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<String>,

    /// Customer name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,

    /// Broker name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker: Option<String>,

    /// Delivery date (`YYYY-MM-DD` on the wire).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl OrderRecord {
    /// Returns true when no field is set.
    pub fn is_empty(&self) -> bool {
        self.unit.is_none()
            && self.bags.is_none()
            && self.customer.is_none()
            && self.broker.is_none()
            && self.rate.is_none()
            && self.date.is_none()
    }

    /// Build a new record from this one, taking every field that is set in `overrides`.
    pub fn with_overrides(&self, overrides: &OrderRecord) -> OrderRecord {
        OrderRecord {
            unit: overrides.unit.clone().or_else(|| self.unit.clone()),
            bags: overrides.bags.clone().or_else(|| self.bags.clone()),
            rate: overrides.rate.clone().or_else(|| self.rate.clone()),
            customer: overrides.customer.clone().or_else(|| self.customer.clone()),
            broker: overrides.broker.clone().or_else(|| self.broker.clone()),
            date: overrides.date.or(self.date),
        }
    }

    /// Set a field by name on an owned record.
    ///
    /// An empty value clears the field. Unit codes are uppercased and dates
    /// must be `YYYY-MM-DD`.
    pub fn set_field(mut self, name: &str, value: &str) -> Result<Self> {
        let value = value.trim();
        let text = (!value.is_empty()).then(|| value.to_string());

        match name {
            "unit" => self.unit = text.map(|u| u.to_uppercase()),
            "bags" => self.bags = text,
            "rate" => self.rate = text,
            "customer" => self.customer = text,
            "broker" => self.broker = text,
            "date" => {
                self.date = match text {
                    Some(d) => Some(
                        NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                            .map_err(|_| OrderlyError::InvalidDate(d.clone()))?,
                    ),
                    None => None,
                }
            }
            other => {
                return Err(OrderlyError::Config(format!("unknown order field: {}", other)));
            }
        }

        Ok(self)
    }

    /// Get a field as display text, empty when absent.
    pub fn field(&self, name: &str) -> String {
        match name {
            "unit" => self.unit.clone().unwrap_or_default(),
            "bags" => self.bags.clone().unwrap_or_default(),
            "rate" => self.rate.clone().unwrap_or_default(),
            "customer" => self.customer.clone().unwrap_or_default(),
            "broker" => self.broker.clone().unwrap_or_default(),
            "date" => self.date.map(|d| d.to_string()).unwrap_or_default(),
            _ => String::new(),
        }
    }

    /// Order value: bags × rate, when both are present and numeric.
    pub fn amount(&self) -> Option<Decimal> {
        let bags = Decimal::from_str(self.bags.as_deref()?).ok()?;
        let rate = Decimal::from_str(self.rate.as_deref()?).ok()?;
        bags.checked_mul(rate)
    }
}
