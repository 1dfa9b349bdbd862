//! WASM bindings for order extraction.
//!
//! Orders cross the boundary as plain JS objects with the same field names as
//! the JSON output of the CLI. Absent fields are left out.

use chrono::NaiveDate;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use orderly_core::{OrderParser, OrderRecord};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extract a single order from the whole message, relative to the browser's local date.
#[wasm_bindgen(js_name = parseOrder)]
pub fn parse_order(text: &str) -> Result<JsValue, JsValue> {
    let today = local_today()?;
    to_js(&OrderParser::new().parse_order_at(text, today))
}

/// Extract one order per unit mention, relative to the browser's local date.
#[wasm_bindgen(js_name = parseOrders)]
pub fn parse_orders(text: &str) -> Result<JsValue, JsValue> {
    let today = local_today()?;
    to_js(&OrderParser::new().parse_orders_at(text, today))
}

/// Extract one order per unit mention, relative to `iso_date` (YYYY-MM-DD).
#[wasm_bindgen(js_name = parseOrdersAt)]
pub fn parse_orders_at(text: &str, iso_date: &str) -> Result<JsValue, JsValue> {
    let today = NaiveDate::parse_from_str(iso_date.trim(), "%Y-%m-%d")
        .map_err(|e| JsValue::from_str(&format!("invalid date {:?}: {}", iso_date, e)))?;
    to_js(&OrderParser::new().parse_orders_at(text, today))
}

/// Overlay the present fields of `overrides` onto `record`.
#[wasm_bindgen(js_name = applyOverrides)]
pub fn apply_overrides(record: JsValue, overrides: JsValue) -> Result<JsValue, JsValue> {
    let record: OrderRecord = from_js(record)?;
    let overrides: OrderRecord = from_js(overrides)?;
    to_js(&record.with_overrides(&overrides))
}

fn local_today() -> Result<NaiveDate, JsValue> {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
        .ok_or_else(|| JsValue::from_str("browser clock returned an invalid date"))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn from_js(value: JsValue) -> Result<OrderRecord, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(OrderRecord::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}
