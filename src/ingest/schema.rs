//! Broker CSV schema descriptors and detection.
//!
//! Each supported broker export is a plain data descriptor: an id, the
//! header names that must be present, and a pure row-mapping function.
//! Everything broker-specific lives in these descriptors; the rest of the
//! pipeline stays broker-agnostic.

use std::collections::HashMap;

use crate::ingest::{gmo_click, kabucom, sbi_otc_cfd};
use crate::types::TradeRecord;

/// Header name -> column index, built from the (trimmed) header row.
pub type FieldIndexMap = HashMap<String, usize>;

/// A registered broker export format.
pub struct TradeCsvSchema {
    pub id: &'static str,
    pub required_fields: &'static [&'static str],
    pub parse_record: fn(&[String], &FieldIndexMap) -> Option<TradeRecord>,
}

/// Registration order is correctness-sensitive: detection is first-match, so
/// schemas with more specific required-field sets come before ones whose
/// required set could be a subset of another export's headers.
static REGISTERED_SCHEMAS: [TradeCsvSchema; 3] = [
    kabucom::SCHEMA,
    sbi_otc_cfd::SCHEMA,
    gmo_click::SCHEMA,
];

pub fn registered_schemas() -> &'static [TradeCsvSchema] {
    &REGISTERED_SCHEMAS
}

/// Select the first registered schema whose required headers are all present.
pub fn detect_csv_schema(field_indices: &FieldIndexMap) -> Option<&'static TradeCsvSchema> {
    REGISTERED_SCHEMAS.iter().find(|schema| {
        schema
            .required_fields
            .iter()
            .all(|field| field_indices.contains_key(*field))
    })
}

/// Build the header-name -> index map from a header row. Fields are trimmed;
/// the tokenizer has already removed any byte-order mark.
pub fn build_field_index_map(header: &[String]) -> FieldIndexMap {
    header
        .iter()
        .enumerate()
        .map(|(index, field)| (field.trim().to_string(), index))
        .collect()
}

/// Map tokenized rows to canonical records: detect the schema from the header
/// row, then run each data row through its extractor. An unrecognized header
/// set yields zero records, matching the "no data, not an error" policy.
pub fn map_rows_to_records(rows: &[Vec<String>]) -> Vec<TradeRecord> {
    let Some((header, data_rows)) = rows.split_first() else {
        return Vec::new();
    };
    let field_indices = build_field_index_map(header);
    let Some(schema) = detect_csv_schema(&field_indices) else {
        return Vec::new();
    };

    data_rows
        .iter()
        .filter_map(|row| (schema.parse_record)(row, &field_indices))
        .collect()
}

/// Read a field by header name; absent headers or short rows yield `None`,
/// so optional columns beyond a schema's required set degrade safely.
pub fn read_field<'a>(
    row: &'a [String],
    field_indices: &FieldIndexMap,
    field: &str,
) -> Option<&'a str> {
    let index = *field_indices.get(field)?;
    row.get(index).map(String::as_str)
}

/// Read a field and trim it, defaulting to an empty string.
pub fn read_trimmed_field(row: &[String], field_indices: &FieldIndexMap, field: &str) -> String {
    read_field(row, field_indices, field)
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_map(fields: &[&str]) -> FieldIndexMap {
        fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.to_string(), i))
            .collect()
    }

    #[test]
    fn test_detect_kabucom_any_column_order() {
        let indices = index_map(&["確定損益", "取引数量（枚）", "売買", "成立日"]);
        let schema = detect_csv_schema(&indices).unwrap();
        assert_eq!(schema.id, "kabucom");
    }

    #[test]
    fn test_detect_sbi_before_gmo() {
        // SBI headers also contain 約定日時; SBI is registered first and must
        // win for its own exports.
        let indices = index_map(&["約定日時", "売/買", "数量", "建玉損益(円)"]);
        let schema = detect_csv_schema(&indices).unwrap();
        assert_eq!(schema.id, "sbi_otc_cfd");
    }

    #[test]
    fn test_detect_gmo_click() {
        let indices = index_map(&[
            "約定日時",
            "取引区分",
            "売買区分",
            "約定数量",
            "約定単価",
            "銘柄名",
            "実現損益（円貨）",
        ]);
        let schema = detect_csv_schema(&indices).unwrap();
        assert_eq!(schema.id, "gmo_click");
    }

    #[test]
    fn test_registration_order() {
        let ids: Vec<&str> = registered_schemas().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["kabucom", "sbi_otc_cfd", "gmo_click"]);
    }

    #[test]
    fn test_first_match_wins_on_combined_headers() {
        // A header satisfying both SBI and GMO Click resolves to whichever
        // is registered first.
        let indices = index_map(&[
            "約定日時",
            "売/買",
            "数量",
            "建玉損益(円)",
            "取引区分",
            "売買区分",
            "約定数量",
            "約定単価",
            "銘柄名",
            "実現損益（円貨）",
        ]);
        let schema = detect_csv_schema(&indices).unwrap();
        assert_eq!(schema.id, "sbi_otc_cfd");
    }

    #[test]
    fn test_unknown_headers_yield_no_schema() {
        let indices = index_map(&["date", "profit"]);
        assert!(detect_csv_schema(&indices).is_none());
    }

    #[test]
    fn test_map_rows_unrecognized_format_is_empty() {
        let rows = vec![
            vec!["date".to_string(), "profit".to_string()],
            vec!["2024/1/5".to_string(), "100".to_string()],
        ];
        assert!(map_rows_to_records(&rows).is_empty());
    }

    #[test]
    fn test_read_field_missing_header_or_short_row() {
        let indices = index_map(&["a", "b", "c"]);
        let row = vec!["1".to_string()];
        assert_eq!(read_field(&row, &indices, "a"), Some("1"));
        assert_eq!(read_field(&row, &indices, "b"), None);
        assert_eq!(read_field(&row, &indices, "missing"), None);
        assert_eq!(read_trimmed_field(&row, &indices, "b"), "");
    }
}
