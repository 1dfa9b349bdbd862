//! Order extraction module.

mod parser;
pub mod rules;

pub use parser::{
    assemble_order, normalize_message, parse_order, parse_orders, segment_orders, OrderParser,
    ParseResult,
};
