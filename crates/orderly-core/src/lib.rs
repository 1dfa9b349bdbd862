//! Core library for extracting bag orders from free-form messages.
//!
//! This crate provides:
//! - Field extraction rules (unit code, bag count, rate, broker, customer)
//! - Relative date resolution ("today", "tmrw", weekday names, `22/08`)
//! - Segmentation of a message describing several orders into one record per order
//! - Order records and configuration models

pub mod error;
pub mod models;
pub mod order;

pub use error::{OrderlyError, Result};
pub use models::config::OrderlyConfig;
pub use models::order::OrderRecord;
pub use order::{
    assemble_order, parse_order, parse_orders, segment_orders, OrderParser, ParseResult,
};
