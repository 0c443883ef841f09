//! Trade CSV ingestion pipeline: bytes -> text -> rows -> canonical records.
//!
//! Data flows strictly forward. Encoding detection and tokenization know
//! nothing about brokers; everything broker-specific is confined to the
//! schema descriptors.

pub mod encoding;
mod gmo_click;
mod kabucom;
pub mod parsers;
pub mod schema;
mod sbi_otc_cfd;
pub mod tokenizer;

pub use encoding::decode_csv_bytes;
pub use schema::{detect_csv_schema, map_rows_to_records, FieldIndexMap, TradeCsvSchema};
pub use tokenizer::parse_rows;

use crate::types::TradeRecord;

/// Parse a raw CSV byte buffer (file or network body) into trade records.
pub fn parse_trade_csv_bytes(bytes: &[u8]) -> Vec<TradeRecord> {
    let text = decode_csv_bytes(bytes);
    parse_trade_csv_text(&text)
}

/// Parse already-decoded CSV text (inline/uploaded content) into records.
pub fn parse_trade_csv_text(text: &str) -> Vec<TradeRecord> {
    let rows = parse_rows(text);
    map_rows_to_records(&rows)
}
