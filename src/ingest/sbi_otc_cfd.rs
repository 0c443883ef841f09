//! SBI Securities OTC CFD trade-history export.
//!
//! Settled P&L is spread across adjustment columns: position P&L plus
//! interest, price and funding-rate adjustments. The settlement amount
//! column (`受渡金額(円)`) is authoritative when non-zero; otherwise the
//! component sum stands in. SBI itemizes adjustments instead of charging a
//! fee, so `fee` is always zero, and OTC CFDs carry no contract month.

use crate::ingest::parsers::{parse_currency, parse_date_time, parse_decimal};
use crate::ingest::schema::{read_field, read_trimmed_field, FieldIndexMap, TradeCsvSchema};
use crate::types::TradeRecord;

const REQUIRED_FIELDS: &[&str] = &["約定日時", "売/買", "数量", "建玉損益(円)"];

pub const SCHEMA: TradeCsvSchema = TradeCsvSchema {
    id: "sbi_otc_cfd",
    required_fields: REQUIRED_FIELDS,
    parse_record,
};

fn parse_record(row: &[String], field_indices: &FieldIndexMap) -> Option<TradeRecord> {
    let date_time = parse_date_time(read_field(row, field_indices, "約定日時"))?;

    let gross_profit = parse_currency(read_field(row, field_indices, "建玉損益(円)"));
    let interest = parse_currency(read_field(row, field_indices, "金利調整額合計(円)"));
    let price_adjustment = parse_currency(read_field(row, field_indices, "価格調整額合計(円)"));
    let funding = parse_currency(read_field(row, field_indices, "ファンディングレート合計(円)"));
    let settlement_amount = parse_currency(read_field(row, field_indices, "受渡金額(円)"));

    let net_from_components = gross_profit + interest + price_adjustment + funding;
    let net_profit = if settlement_amount != 0.0 {
        settlement_amount
    } else {
        net_from_components
    };

    Some(TradeRecord {
        iso_date: date_time.iso_date,
        iso_time: date_time.iso_time,
        iso_date_time: date_time.iso_date_time,
        symbol: read_trimmed_field(row, field_indices, "銘柄"),
        contract_month: String::new(),
        side: read_trimmed_field(row, field_indices, "売/買"),
        action: read_trimmed_field(row, field_indices, "取引区分"),
        quantity: parse_decimal(read_field(row, field_indices, "数量")),
        price: parse_decimal(read_field(row, field_indices, "約定価格")),
        fee: 0.0,
        gross_profit,
        net_profit,
    })
}
