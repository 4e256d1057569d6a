use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Accent placed either side of the application title.
pub const ACCENT: &str = "◆ ◇";

/// Dashboard title.
pub const TITLE: &str = "GUDID CHRONICLES";

/// Dashboard header rendering four lines:
///
/// 1. Application title with accents.
/// 2. A 60-column `=` separator.
/// 3. `[ filtered / total records | filters | date range ]`.
/// 4. An empty line.
pub struct Header<'a> {
    /// Records left after filtering.
    pub filtered: usize,
    /// Records in the loaded dataset.
    pub total: usize,
    /// Filter description, e.g. `"Supplier=All, Device=All"`.
    pub filters: String,
    /// Date range label, e.g. `"Start to End"`.
    pub date_range: String,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(
        filtered: usize,
        total: usize,
        filters: String,
        date_range: String,
        theme: &'a Theme,
    ) -> Self {
        Self {
            filtered,
            total,
            filters,
            date_range,
            theme,
        }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        vec![
            Line::from(vec![
                Span::styled(ACCENT, self.theme.header_accent),
                Span::styled(format!(" {} ", TITLE), self.theme.header),
                Span::styled(ACCENT, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(
                    format!("{} / {} records", self.filtered, self.total),
                    self.theme.value,
                ),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.filters.clone(), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.date_range.clone(), self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn header(theme: &Theme) -> Header<'_> {
        Header::new(
            12,
            33,
            "Supplier=B00079, Device=All".to_string(),
            "2025-10-01 to End".to_string(),
            theme,
        )
    }

    #[test]
    fn test_header_to_lines_count() {
        let theme = Theme::dark();
        assert_eq!(header(&theme).to_lines().len(), 4);
    }

    #[test]
    fn test_header_title_line() {
        let theme = Theme::dark();
        let title = line_text(&header(&theme).to_lines()[0]);
        assert!(title.contains(TITLE));
        assert!(title.starts_with(ACCENT));
    }

    #[test]
    fn test_header_separator_is_sixty_columns() {
        let theme = Theme::dark();
        let sep = line_text(&header(&theme).to_lines()[1]);
        assert_eq!(sep, "=".repeat(60));
    }

    #[test]
    fn test_header_info_line() {
        let theme = Theme::light();
        let info = line_text(&header(&theme).to_lines()[2]);
        assert_eq!(
            info,
            "[ 12 / 33 records | Supplier=B00079, Device=All | 2025-10-01 to End ]"
        );
    }
}
