/// Format an integer unit count with thousands separators.
///
/// ```
/// use chronicles_core::formatting::format_units;
///
/// assert_eq!(format_units(0), "0");
/// assert_eq!(format_units(1_234_567), "1,234,567");
/// ```
pub fn format_units(value: u64) -> String {
    group_thousands(&value.to_string())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── format_units ─────────────────────────────────────────────────────────

    #[test]
    fn test_format_units_small() {
        assert_eq!(format_units(7), "7");
        assert_eq!(format_units(999), "999");
    }

    #[test]
    fn test_format_units_grouped() {
        assert_eq!(format_units(1_000), "1,000");
        assert_eq!(format_units(12_345), "12,345");
        assert_eq!(format_units(1_234_567), "1,234,567");
    }
}
