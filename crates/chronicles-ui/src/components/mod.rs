//! Reusable line-level widgets for the dashboard.

pub mod bar_list;
pub mod header;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Ellipsis appended to truncated cells.
pub const ELLIPSIS: char = '…';

/// Cut `text` so it occupies at most `max_width` terminal columns.
///
/// Wide characters (CJK device names) count as two columns. When the text is
/// cut, the last column is replaced with [`ELLIPSIS`].
pub fn fit_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push(ELLIPSIS);
    out
}

/// Right-pad `text` with spaces to exactly `width` columns, truncating first
/// when it is too wide.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let fitted = fit_width(text, width);
    let fill = width.saturating_sub(fitted.width());
    format!("{}{}", fitted, " ".repeat(fill))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_width_short_text_unchanged() {
        assert_eq!(fit_width("Widget", 10), "Widget");
        assert_eq!(fit_width("", 0), "");
    }

    #[test]
    fn test_fit_width_ascii() {
        assert_eq!(fit_width("Surgical Stapler", 8), "Surgica…");
        assert_eq!(fit_width("abc", 0), "");
    }

    #[test]
    fn test_fit_width_cjk_counts_two_columns() {
        // Each ideograph is two columns wide.
        let name = "人工水晶體";
        assert_eq!(name.width(), 10);
        let cut = fit_width(name, 6);
        assert_eq!(cut, "人工…");
        assert!(cut.width() <= 6);
    }

    #[test]
    fn test_fit_width_never_splits_wide_char() {
        let cut = fit_width("人工水晶體", 4);
        assert_eq!(cut, "人…");
        assert_eq!(cut.width(), 3);
    }

    #[test]
    fn test_pad_to_width() {
        assert_eq!(pad_to_width("ab", 4), "ab  ");
        assert_eq!(pad_to_width("人工", 5), "人工 ");
        assert_eq!(pad_to_width("abcdef", 4).width(), 4);
    }
}
