use chronicles_core::formatting::format_units;
use chronicles_core::models::NamedValue;
use ratatui::style::Style;
use ratatui::text::{Line, Span};

use super::pad_to_width;
use crate::themes::Theme;

const FILLED: char = '█';
const EMPTY: char = '░';

// ── BarList ──────────────────────────────────────────────────────────────────

/// Ranked horizontal bar chart: one line per entry, bars scaled against the
/// largest value in the list.
///
/// ```text
/// Widget        ██████████████░░░░░░  3
/// Gadget        ░░░░░░░░░░░░░░░░░░░░  0
/// ```
pub struct BarList<'a> {
    pub items: &'a [NamedValue],
    /// Columns reserved for the name.
    pub label_width: usize,
    /// Columns of the bar itself.
    pub bar_width: usize,
    pub bar_style: Style,
    pub theme: &'a Theme,
}

impl<'a> BarList<'a> {
    pub fn new(items: &'a [NamedValue], bar_style: Style, theme: &'a Theme) -> Self {
        Self {
            items,
            label_width: 24,
            bar_width: 20,
            bar_style,
            theme,
        }
    }

    pub fn with_widths(mut self, label_width: usize, bar_width: usize) -> Self {
        self.label_width = label_width;
        self.bar_width = bar_width;
        self
    }

    /// Filled cells for `value` when the list maximum is `max`.
    pub fn filled_cells(&self, value: u64, max: u64) -> usize {
        if max == 0 {
            return 0;
        }
        ((value as f64 / max as f64) * self.bar_width as f64).round() as usize
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        if self.items.is_empty() {
            return vec![Line::from(Span::styled("No data", self.theme.dim))];
        }

        let max = self.items.iter().map(|i| i.value).max().unwrap_or(0);
        self.items
            .iter()
            .map(|item| {
                let filled = self.filled_cells(item.value, max).min(self.bar_width);
                let empty = self.bar_width - filled;
                Line::from(vec![
                    Span::styled(pad_to_width(&item.name, self.label_width), self.theme.label),
                    Span::raw(" "),
                    Span::styled(FILLED.to_string().repeat(filled), self.bar_style),
                    Span::styled(EMPTY.to_string().repeat(empty), self.theme.bar_empty),
                    Span::styled(format!("  {}", format_units(item.value)), self.theme.value),
                ])
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
