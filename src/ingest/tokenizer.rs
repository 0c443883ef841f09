//! CSV tokenization: decoded text in, rows of string fields out.
//!
//! RFC4180 quoting (`""` escapes, delimiters/newlines literal inside quotes)
//! via the csv crate with headerless, flexible records. On top of that:
//! a byte-order mark on the very first field is stripped, and rows whose
//! fields are all empty or whitespace-only are dropped entirely.
//!
//! The first surviving row is the header; callers consume it.

/// Split CSV text into rows of fields.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let Ok(record) = result else {
            continue;
        };
        let mut fields: Vec<String> = record.iter().map(str::to_string).collect();

        if rows.is_empty() {
            if let Some(first) = fields.first_mut() {
                if let Some(stripped) = first.strip_prefix('\u{feff}') {
                    *first = stripped.to_string();
                }
            }
        }

        if fields.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        rows.push(fields);
    }
    rows
}
