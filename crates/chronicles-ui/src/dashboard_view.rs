//! Analytics dashboard for the GUDID Chronicles TUI.
//!
//! Two tabs share a common header: the charts tab (summary figures, units
//! per day, top devices, customer volume) and the preview tab (first rows of
//! the filtered set).

use chronicles_core::formatting::format_units;
use chronicles_data::analysis::AnalysisResult;
use chronicles_data::filter::FilterOptions;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Sparkline},
    Frame,
};

use crate::components::bar_list::BarList;
use crate::components::header::Header;
use crate::table_view;
use crate::themes::Theme;

// ── DashboardTab ──────────────────────────────────────────────────────────────

/// Which half of the dashboard is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardTab {
    #[default]
    Charts,
    Preview,
}

impl DashboardTab {
    pub fn toggle(self) -> Self {
        match self {
            Self::Charts => Self::Preview,
            Self::Preview => Self::Charts,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Charts => "Charts",
            Self::Preview => "Preview",
        }
    }
}

// ── Summary figures ───────────────────────────────────────────────────────────

/// The four headline figures as `(label, value)`.
pub fn summary_figures(result: &AnalysisResult) -> [(&'static str, String); 4] {
    let s = &result.summary;
    [
        ("Total Lines", format_units(s.total_lines as u64)),
        ("Total Units", format_units(s.total_units)),
        ("Suppliers", format_units(s.unique_suppliers as u64)),
        ("Customers", format_units(s.unique_customers as u64)),
    ]
}

/// Title of the units-per-day chart, including the covered date span.
pub fn time_series_title(result: &AnalysisResult) -> String {
    match result.summary.date_span() {
        Some((first, last)) if first == last => format!(" Units per Day ({}) ", first),
        Some((first, last)) => format!(" Units per Day ({} → {}) ", first, last),
        None => " Units per Day (no dated records) ".to_string(),
    }
}

// ── Render ────────────────────────────────────────────────────────────────────

/// Render the full dashboard into `area`.
pub fn render_dashboard(
    frame: &mut Frame,
    area: Rect,
    result: &AnalysisResult,
    options: &FilterOptions,
    tab: DashboardTab,
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let header = Header::new(
        result.metadata.filtered_records,
        result.metadata.total_records,
        result.criteria.describe(),
        result.criteria.date_range_label(),
        theme,
    );
    frame.render_widget(Paragraph::new(Text::from(header.to_lines())), chunks[0]);
    frame.render_widget(Paragraph::new(tab_line(tab, options, theme)), chunks[1]);

    if result.filtered.is_empty() {
        table_view::render_no_data(frame, chunks[2], theme);
        return;
    }

    match tab {
        DashboardTab::Charts => render_charts(frame, chunks[2], result, theme),
        DashboardTab::Preview => table_view::render_preview_table(
            frame,
            chunks[2],
            result.preview(),
            result.filtered.len(),
            theme,
        ),
    }
}

fn tab_line(active: DashboardTab, options: &FilterOptions, theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();
    for tab in [DashboardTab::Charts, DashboardTab::Preview] {
        let style = if tab == active {
            theme.tab_active
        } else {
            theme.tab_inactive
        };
        spans.push(Span::styled(format!(" {} ", tab.title()), style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(
        format!(
            " {} suppliers · {} devices in dataset   Tab: switch  q: quit",
            options.suppliers.len(),
            options.devices.len()
        ),
        theme.dim,
    ));
    Line::from(spans)
}

fn render_charts(frame: &mut Frame, area: Rect, result: &AnalysisResult, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Min(4),
        ])
        .split(area);

    // Headline figures.
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[0]);
    for (cell, (label, value)) in cells.iter().zip(summary_figures(result)) {
        let figure = Paragraph::new(Line::from(Span::styled(value, theme.value))).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.separator)
                .title(Span::styled(format!(" {} ", label), theme.label)),
        );
        frame.render_widget(figure, *cell);
    }

    // Units per day.
    let values: Vec<u64> = result
        .summary
        .time_series
        .iter()
        .map(|p| p.value)
        .collect();
    let sparkline = Sparkline::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.separator)
                .title(time_series_title(result)),
        )
        .data(values)
        .style(theme.sparkline);
    frame.render_widget(sparkline, rows[1]);

    // Rankings.
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);
    render_ranking(
        frame,
        halves[0],
        " Top Devices ",
        BarList::new(&result.summary.top_devices, theme.bar, theme),
        theme,
    );
    render_ranking(
        frame,
        halves[1],
        " Customer Volume ",
        BarList::new(&result.summary.customer_volume, theme.bar_alt, theme),
        theme,
    );
}

fn render_ranking(frame: &mut Frame, area: Rect, title: &str, list: BarList, theme: &Theme) {
    let inner = area.width.saturating_sub(2) as usize;
    let label_width = inner * 45 / 100;
    let bar_width = inner.saturating_sub(label_width + 12);
    let lines = list.with_widths(label_width, bar_width).to_lines();

    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.separator)
                .title(Span::styled(title.to_string(), theme.header)),
        ),
        area,
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────
