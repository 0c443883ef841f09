//! Shared numeric/locale normalizers used by every schema extractor.
//!
//! One policy throughout: malformed numeric or time input degrades to zero or
//! a default instead of rejecting the row. Only an unparsable *date* rejects,
//! because the date is the aggregation key; everything else is best-effort.

/// Full-width minus sign, used by some broker exports.
const FULLWIDTH_MINUS: char = '−';

/// Parse a currency amount: thousands separators and a trailing `円` glyph
/// are stripped, ASCII `-` and full-width `−` both negate, a bare minus is
/// zero, unparsable text is zero.
pub fn parse_currency(value: Option<&str>) -> f64 {
    let Some(value) = value else {
        return 0.0;
    };
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed == "−" {
        return 0.0;
    }

    let mut sign = 1.0;
    let mut rest = trimmed;
    if let Some(first) = trimmed.chars().next() {
        if first == '+' || first == '-' || first == FULLWIDTH_MINUS {
            if first != '+' {
                sign = -1.0;
            }
            rest = &trimmed[first.len_utf8()..];
        }
    }

    let digits: String = rest
        .chars()
        .filter(|c| *c != ',' && *c != '円')
        .collect();
    match digits.trim().parse::<f64>() {
        Ok(parsed) => parsed * sign,
        Err(_) => 0.0,
    }
}

/// Parse an integer quantity, stripping thousands separators. Zero on
/// absent/empty/unparsable input.
pub fn parse_integer(value: Option<&str>) -> i64 {
    let Some(value) = value else {
        return 0;
    };
    let normalized: String = value.trim().chars().filter(|c| *c != ',').collect();
    normalized.parse().unwrap_or(0)
}

/// Parse a decimal number, stripping thousands separators. Zero on
/// absent/empty/unparsable input.
pub fn parse_decimal(value: Option<&str>) -> f64 {
    let Some(value) = value else {
        return 0.0;
    };
    let normalized: String = value.trim().chars().filter(|c| *c != ',').collect();
    normalized.parse().unwrap_or(0.0)
}

/// Parse an integer with no separator handling. Zero on failure.
pub fn safe_integer(value: Option<&str>) -> i64 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

/// Zero-pad a time component to two digits; negative values clamp to zero.
pub fn pad_time_part(value: i64) -> String {
    format!("{:02}", value.max(0))
}

/// Normalize `H:MM` / `HH:MM[:SS]` text to zero-padded `HH:MM`. Missing or
/// unparsable components default to zero.
pub fn normalize_time_string(value: Option<&str>) -> String {
    let Some(value) = value else {
        return "00:00".to_string();
    };
    let mut parts = value.split(':');
    let hour = safe_integer(parts.next());
    let minute = safe_integer(parts.next());
    format!("{}:{}", pad_time_part(hour), pad_time_part(minute))
}

/// Convert `/`-separated broker date text (`YYYY/M/D`) to `YYYY-MM-DD`.
/// Returns `None` unless all three parts are present and numeric.
pub fn to_iso_date(value: Option<&str>) -> Option<String> {
    let value = value?;
    let mut parts = value.trim().split('/');
    let year = parts.next().unwrap_or("");
    let month = parts.next().unwrap_or("");
    let day = parts.next().unwrap_or("");
    if [year, month, day]
        .iter()
        .any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }
    Some(format!("{year:0>4}-{month:0>2}-{day:0>2}"))
}

/// A broker date/time split into the canonical ISO triplet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDateTime {
    pub iso_date: String,
    pub iso_time: String,
    pub iso_date_time: String,
}

/// Parse `YYYY/M/D[ H:MM[:SS]]` text. The time portion is optional and
/// best-effort; a missing or malformed date yields `None`.
pub fn parse_date_time(value: Option<&str>) -> Option<ParsedDateTime> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut parts = trimmed.split_whitespace();
    let iso_date = to_iso_date(parts.next())?;

    let Some(time_part) = parts.next() else {
        return Some(ParsedDateTime {
            iso_date_time: format!("{iso_date}T00:00:00"),
            iso_time: "00:00".to_string(),
            iso_date,
        });
    };

    let mut time_parts = time_part.split(':');
    let hh = pad_time_part(safe_integer(time_parts.next()));
    let mm = pad_time_part(safe_integer(time_parts.next()));
    let ss = pad_time_part(safe_integer(time_parts.next()));

    Some(ParsedDateTime {
        iso_date_time: format!("{iso_date}T{hh}:{mm}:{ss}"),
        iso_time: format!("{hh}:{mm}"),
        iso_date,
    })
}
