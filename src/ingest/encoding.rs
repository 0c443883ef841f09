//! Character-encoding detection for broker CSV exports.
//!
//! Brokers ship either UTF-8 or Shift_JIS, with no declared encoding. Both
//! candidates are decoded in replacement mode and the one producing fewer
//! U+FFFD replacement characters wins; ties favor UTF-8.

use encoding_rs::{SHIFT_JIS, UTF_8};

const REPLACEMENT: char = '\u{fffd}';

fn count_replacement_chars(text: &str) -> usize {
    text.chars().filter(|c| *c == REPLACEMENT).count()
}

/// Decode a raw CSV buffer into text.
///
/// Heuristic, not a guarantee: a buffer that is valid in both encodings
/// decodes as UTF-8 even if it was meant as Shift_JIS.
pub fn decode_csv_bytes(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }

    let (utf8_text, _, _) = UTF_8.decode(bytes);
    let utf8_replacements = count_replacement_chars(&utf8_text);
    if utf8_replacements == 0 {
        return utf8_text.into_owned();
    }

    let (sjis_text, _, _) = SHIFT_JIS.decode(bytes);
    let sjis_replacements = count_replacement_chars(&sjis_text);
    if sjis_replacements < utf8_replacements {
        return sjis_text.into_owned();
    }

    utf8_text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer() {
        assert_eq!(decode_csv_bytes(b""), "");
    }

    #[test]
    fn test_plain_ascii_stays_utf8() {
        assert_eq!(decode_csv_bytes(b"date,profit\n"), "date,profit\n");
    }

    #[test]
    fn test_valid_utf8_cjk_stays_utf8() {
        let text = "成立日,売買,確定損益\n";
        assert_eq!(decode_csv_bytes(text.as_bytes()), text);
    }

    #[test]
    fn test_shift_jis_bytes_decode_via_alternate() {
        // "成立日,売買" encoded as Shift_JIS is invalid UTF-8.
        let (encoded, _, _) = SHIFT_JIS.encode("成立日,売買,確定損益");
        assert_eq!(decode_csv_bytes(&encoded), "成立日,売買,確定損益");
    }

    #[test]
    fn test_garbage_falls_back_to_utf8() {
        // 0xff is invalid as a lead byte in both encodings, so neither side
        // wins and the UTF-8 result is returned.
        let decoded = decode_csv_bytes(&[0xff, 0xff, 0xff]);
        assert!(decoded.chars().all(|c| c == '\u{fffd}'));
    }
}
