//! GMO Click CFD trade-history export.
//!
//! Realized P&L is reported twice: in account currency (`実現損益（円貨）`)
//! and as a yen-converted amount (`実現損益（円換算額）`). The converted
//! column is authoritative when present and non-zero. Fees are itemized
//! across four columns (open/close commission plus consumption tax on each)
//! and summed into a single figure.

use crate::ingest::parsers::{parse_currency, parse_date_time, parse_decimal};
use crate::ingest::schema::{read_field, read_trimmed_field, FieldIndexMap, TradeCsvSchema};
use crate::types::TradeRecord;

const REQUIRED_FIELDS: &[&str] = &[
    "約定日時",
    "取引区分",
    "売買区分",
    "約定数量",
    "約定単価",
    "銘柄名",
    "実現損益（円貨）",
];

pub const SCHEMA: TradeCsvSchema = TradeCsvSchema {
    id: "gmo_click",
    required_fields: REQUIRED_FIELDS,
    parse_record,
};

fn parse_record(row: &[String], field_indices: &FieldIndexMap) -> Option<TradeRecord> {
    let date_time = parse_date_time(read_field(row, field_indices, "約定日時"))?;

    let realized_profit = parse_currency(read_field(row, field_indices, "実現損益（円貨）"));
    let realized_profit_converted =
        parse_currency(read_field(row, field_indices, "実現損益（円換算額）"));
    let net_profit = if realized_profit_converted != 0.0 {
        realized_profit_converted
    } else {
        realized_profit
    };

    let fee = parse_currency(read_field(row, field_indices, "手数料"))
        + parse_currency(read_field(row, field_indices, "手数料消費税"))
        + parse_currency(read_field(row, field_indices, "新規手数料"))
        + parse_currency(read_field(row, field_indices, "新規手数料消費税"));

    Some(TradeRecord {
        iso_date: date_time.iso_date,
        iso_time: date_time.iso_time,
        iso_date_time: date_time.iso_date_time,
        symbol: read_trimmed_field(row, field_indices, "銘柄名"),
        contract_month: read_trimmed_field(row, field_indices, "限月"),
        side: read_trimmed_field(row, field_indices, "売買区分"),
        action: read_trimmed_field(row, field_indices, "取引区分"),
        quantity: parse_decimal(read_field(row, field_indices, "約定数量")),
        price: parse_decimal(read_field(row, field_indices, "約定単価")),
        fee,
        gross_profit: realized_profit,
        net_profit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::schema::build_field_index_map;

    fn header() -> Vec<String> {
        [
            "約定日時",
            "銘柄名",
            "限月",
            "取引区分",
            "売買区分",
            "約定数量",
            "約定単価",
            "手数料",
            "手数料消費税",
            "新規手数料",
            "新規手数料消費税",
            "実現損益（円貨）",
            "実現損益（円換算額）",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_converted_profit_preferred() {
        let indices = build_field_index_map(&header());
        let record = parse_record(
            &row(&[
                "2024/9/12 22:31:45",
                "米国NQ100",
                "",
                "決済",
                "売",
                "2",
                "19,540.5",
                "-20",
                "-2",
                "-20",
                "-2",
                "300",
                "44,100",
            ]),
            &indices,
        )
        .unwrap();

        assert_eq!(record.iso_date_time, "2024-09-12T22:31:45");
        assert_eq!(record.gross_profit, 300.0);
        assert_eq!(record.net_profit, 44100.0);
        assert_eq!(record.fee, -44.0);
        assert_eq!(record.quantity, 2.0);
        assert_eq!(record.price, 19540.5);
    }

    #[test]
    fn test_nominal_profit_when_converted_absent() {
        // Header without the converted column at all.
        let header: Vec<String> = [
            "約定日時",
            "銘柄名",
            "取引区分",
            "売買区分",
            "約定数量",
            "約定単価",
            "実現損益（円貨）",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let indices = build_field_index_map(&header);
        let record = parse_record(
            &row(&["2024/9/13", "金スポット", "決済", "買", "1", "2,510", "-850"]),
            &indices,
        )
        .unwrap();

        assert_eq!(record.net_profit, -850.0);
        assert_eq!(record.iso_date_time, "2024-09-13T00:00:00");
        assert_eq!(record.fee, 0.0);
    }

    #[test]
    fn test_bad_datetime_rejects_row() {
        let indices = build_field_index_map(&header());
        let result = parse_record(
            &row(&["", "", "", "", "", "", "", "", "", "", "", "", ""]),
            &indices,
        );
        assert!(result.is_none());
    }
}
