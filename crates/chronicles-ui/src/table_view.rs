//! Dataset preview table.
//!
//! Shows the first rows of the filtered packing list in a bordered
//! [`ratatui::widgets::Table`], one row per record with alternating styles.

use chronicles_core::formatting::format_units;
use chronicles_core::models::Record;
use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::components::fit_width;
use crate::themes::Theme;

/// Preview columns as `(title, width)`.
pub const PREVIEW_COLUMNS: [(&str, u16); 7] = [
    ("Supplier", 10),
    ("Delivered", 11),
    ("Customer", 10),
    ("Device", 30),
    ("Model", 16),
    ("Qty", 7),
    ("Unit", 6),
];

/// Display cells for one record, each cut to its column width.
pub fn preview_cells(record: &Record) -> [String; 7] {
    let delivered = record
        .delivery_day()
        .unwrap_or_else(|| record.deliver_date.clone());
    let raw = [
        record.supplier_name.clone(),
        delivered,
        record.customer.clone(),
        record.device_name.clone(),
        record.model_number.clone(),
        format_units(record.quantity),
        record.unit.clone(),
    ];
    let mut cells: [String; 7] = Default::default();
    for (i, value) in raw.iter().enumerate() {
        cells[i] = fit_width(value, PREVIEW_COLUMNS[i].1 as usize);
    }
    cells
}

/// Render `records` as the preview table. `total` is the size of the set the
/// rows were taken from and appears in the title.
pub fn render_preview_table(
    frame: &mut Frame,
    area: Rect,
    records: &[Record],
    total: usize,
    theme: &Theme,
) {
    let header = Row::new(
        PREVIEW_COLUMNS
            .iter()
            .map(|(title, _)| Cell::from(*title).style(theme.table_header)),
    )
    .height(1);

    let rows: Vec<Row> = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(preview_cells(record).into_iter().map(Cell::from)).style(style)
        })
        .collect();

    let widths = PREVIEW_COLUMNS.map(|(_, w)| Constraint::Length(w));

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Preview ({} of {} rows) ", records.len(), total)),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render a placeholder when the filtered set is empty.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No records match the current filters", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Widen the supplier, device or date filters.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" GUDID Chronicles "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn make_records() -> Vec<Record> {
        vec![
            Record {
                supplier_name: "B00079".to_string(),
                deliver_date: "45930".to_string(),
                deliver_date_parsed: chrono::Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).single(),
                customer: "C06052".to_string(),
                device_name: "人工水晶體 Intraocular Lens Extended Depth".to_string(),
                model_number: "ZXR00".to_string(),
                quantity: 1_200,
                unit: "pcs".to_string(),
                ..Default::default()
            },
            Record {
                supplier_name: "B00018".to_string(),
                deliver_date: "soon".to_string(),
                customer: "C05278".to_string(),
                device_name: "Widget".to_string(),
                model_number: "Unknown".to_string(),
                quantity: 2,
                ..Default::default()
            },
        ]
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    // ── Cells ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_preview_cells_use_parsed_day() {
        let cells = preview_cells(&make_records()[0]);
        assert_eq!(cells[0], "B00079");
        assert_eq!(cells[1], "2025-10-01");
        assert_eq!(cells[5], "1,200");
    }

    #[test]
    fn test_preview_cells_fall_back_to_raw_date() {
        let cells = preview_cells(&make_records()[1]);
        assert_eq!(cells[1], "soon");
    }

    #[test]
    fn test_preview_cells_fit_column_width() {
        use unicode_width::UnicodeWidthStr;
        let cells = preview_cells(&make_records()[0]);
        for (cell, (_, width)) in cells.iter().zip(PREVIEW_COLUMNS) {
            assert!(cell.width() <= width as usize, "{cell} wider than {width}");
        }
        assert!(cells[3].ends_with(crate::components::ELLIPSIS));
    }

    // ── Render ────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_preview_table() {
        let backend = TestBackend::new(110, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let records = make_records();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_preview_table(frame, area, &records, 33, &theme);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Preview (2 of 33 rows)"));
        assert!(text.contains("Supplier"));
        assert!(text.contains("C05278"));
    }

    #[test]
    fn test_render_preview_table_empty_does_not_panic() {
        let backend = TestBackend::new(80, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::light();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_preview_table(frame, area, &[], 0, &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_no_data() {
        let backend = TestBackend::new(80, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_no_data(frame, area, &theme);
            })
            .unwrap();

        assert!(buffer_text(&terminal).contains("No records match the current filters"));
    }
}
