//! au Kabucom futures trade-history export.
//!
//! Date and time arrive in separate columns (`成立日`, `成立時間`). The
//! broker reports a settled P&L column (`確定損益`) that already nets out
//! fees, so net profit is taken from it directly; the fee column is carried
//! as-is and never re-derived.

use crate::ingest::parsers::{
    normalize_time_string, parse_currency, parse_decimal, parse_integer, to_iso_date,
};
use crate::ingest::schema::{read_field, read_trimmed_field, FieldIndexMap, TradeCsvSchema};
use crate::types::TradeRecord;

const REQUIRED_FIELDS: &[&str] = &["成立日", "売買", "取引数量（枚）", "確定損益"];

pub const SCHEMA: TradeCsvSchema = TradeCsvSchema {
    id: "kabucom",
    required_fields: REQUIRED_FIELDS,
    parse_record,
};

fn parse_record(row: &[String], field_indices: &FieldIndexMap) -> Option<TradeRecord> {
    let iso_date = to_iso_date(read_field(row, field_indices, "成立日"))?;

    let iso_time = normalize_time_string(read_field(row, field_indices, "成立時間"));

    Some(TradeRecord {
        iso_date_time: format!("{iso_date}T{iso_time}:00"),
        symbol: read_trimmed_field(row, field_indices, "銘柄"),
        contract_month: read_trimmed_field(row, field_indices, "限月"),
        side: read_trimmed_field(row, field_indices, "売買"),
        action: read_trimmed_field(row, field_indices, "取引"),
        quantity: parse_integer(read_field(row, field_indices, "取引数量（枚）")) as f64,
        price: parse_decimal(read_field(row, field_indices, "成立値段")),
        fee: parse_currency(read_field(row, field_indices, "手数料")),
        gross_profit: parse_currency(read_field(row, field_indices, "売買損益")),
        net_profit: parse_currency(read_field(row, field_indices, "確定損益")),
        iso_date,
        iso_time,
    })
}
