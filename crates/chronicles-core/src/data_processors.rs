use crate::models::{UNKNOWN_DEVICE, UNKNOWN_MODEL};

// ── Quote characters ──────────────────────────────────────────────────────────

/// Characters that toggle quoted state in a packing-list line: the plain
/// double quote and the two curly variants emitted by CJK spreadsheet tools.
pub const QUOTE_CHARS: [char; 3] = ['"', '\u{201C}', '\u{201D}'];

/// Returns `true` for any of the [`QUOTE_CHARS`].
pub fn is_quote(c: char) -> bool {
    QUOTE_CHARS.contains(&c)
}

// ── IntegerParser ─────────────────────────────────────────────────────────────

/// Lenient integer parsing for spreadsheet cells.
pub struct IntegerParser;

impl IntegerParser {
    /// Parse the leading integer of `raw`.
    ///
    /// Leading whitespace and one optional `+`/`-` sign are accepted, followed
    /// by at least one ASCII digit. Anything after the digit run is ignored,
    /// so `"45930.5"` yields `45930` and `"12 pcs"` yields `12`.
    ///
    /// Returns `None` when there is no digit or the value overflows `i64`.
    pub fn parse_prefix(raw: &str) -> Option<i64> {
        let s = raw.trim_start();
        let (negative, digits) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let run = digits
            .bytes()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if run == 0 {
            return None;
        }

        let mut value: i64 = 0;
        for b in digits[..run].bytes() {
            value = value
                .checked_mul(10)?
                .checked_add(i64::from(b - b'0'))?;
        }

        Some(if negative { -value } else { value })
    }
}

// ── QuantityExtractor ─────────────────────────────────────────────────────────

/// Coerces the `Numbers` cell into a unit count.
pub struct QuantityExtractor;

impl QuantityExtractor {
    /// Parse the unit count, falling back to `0` for blank, non-numeric or
    /// negative cells.
    pub fn extract(raw: &str) -> u64 {
        IntegerParser::parse_prefix(raw)
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or(0)
    }
}

// ── TextNormalizer ────────────────────────────────────────────────────────────

/// Normalizes free-text columns that have display defaults.
pub struct TextNormalizer;

impl TextNormalizer {
    /// Remove every quote character from `raw`.
    pub fn strip_quotes(raw: &str) -> String {
        raw.chars().filter(|c| !is_quote(*c)).collect()
    }

    /// Quote-stripped device name, or [`UNKNOWN_DEVICE`] when nothing is left.
    pub fn device_name(raw: &str) -> String {
        let stripped = Self::strip_quotes(raw);
        if stripped.is_empty() {
            UNKNOWN_DEVICE.to_string()
        } else {
            stripped
        }
    }

    /// Model number, or [`UNKNOWN_MODEL`] when blank.
    pub fn model_number(raw: &str) -> String {
        if raw.is_empty() {
            UNKNOWN_MODEL.to_string()
        } else {
            raw.to_string()
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── is_quote ──────────────────────────────────────────────────────────────

    #[test]
    fn test_is_quote_variants() {
        assert!(is_quote('"'));
        assert!(is_quote('“'));
        assert!(is_quote('”'));
        assert!(!is_quote('\''));
        assert!(!is_quote('「'));
    }

    // ── IntegerParser ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_prefix_plain() {
        assert_eq!(IntegerParser::parse_prefix("45930"), Some(45_930));
        assert_eq!(IntegerParser::parse_prefix("0"), Some(0));
    }

    #[test]
    fn test_parse_prefix_signs_and_whitespace() {
        assert_eq!(IntegerParser::parse_prefix("  -12"), Some(-12));
        assert_eq!(IntegerParser::parse_prefix("+7"), Some(7));
    }

    #[test]
    fn test_parse_prefix_ignores_trailing_text() {
        assert_eq!(IntegerParser::parse_prefix("45930.75"), Some(45_930));
        assert_eq!(IntegerParser::parse_prefix("12pcs"), Some(12));
    }

    #[test]
    fn test_parse_prefix_rejects_non_numeric() {
        assert_eq!(IntegerParser::parse_prefix(""), None);
        assert_eq!(IntegerParser::parse_prefix("abc"), None);
        assert_eq!(IntegerParser::parse_prefix("-"), None);
        assert_eq!(IntegerParser::parse_prefix("x12"), None);
        assert_eq!(IntegerParser::parse_prefix(".5"), None);
    }

    #[test]
    fn test_parse_prefix_overflow() {
        assert_eq!(IntegerParser::parse_prefix("99999999999999999999999"), None);
    }

    // ── QuantityExtractor ─────────────────────────────────────────────────────

    #[test]
    fn test_quantity_numeric() {
        assert_eq!(QuantityExtractor::extract("3"), 3);
        assert_eq!(QuantityExtractor::extract(" 15 "), 15);
    }

    #[test]
    fn test_quantity_defaults_to_zero() {
        assert_eq!(QuantityExtractor::extract("x"), 0);
        assert_eq!(QuantityExtractor::extract(""), 0);
        assert_eq!(QuantityExtractor::extract("-4"), 0);
    }

    // ── TextNormalizer ────────────────────────────────────────────────────────

    #[test]
    fn test_strip_quotes_all_variants() {
        assert_eq!(
            TextNormalizer::strip_quotes("“波士頓科技”英吉尼\"X\""),
            "波士頓科技英吉尼X"
        );
    }

    #[test]
    fn test_device_name_default() {
        assert_eq!(TextNormalizer::device_name(""), "Unknown Device");
        assert_eq!(TextNormalizer::device_name("“”"), "Unknown Device");
        assert_eq!(TextNormalizer::device_name("\"Widget\""), "Widget");
    }

    #[test]
    fn test_device_name_keeps_inner_spacing() {
        assert_eq!(
            TextNormalizer::device_name("“美敦力” 博視達"),
            "美敦力 博視達"
        );
    }

    #[test]
    fn test_model_number_default() {
        assert_eq!(TextNormalizer::model_number(""), "Unknown");
        assert_eq!(TextNormalizer::model_number("L111"), "L111");
    }
}
