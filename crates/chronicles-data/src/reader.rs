//! Packing-list CSV parsing for GUDID Chronicles.
//!
//! Turns raw delimited text into normalized [`Record`]s. Parsing is
//! best-effort: a malformed field degrades to its default and the row is
//! still emitted, so one bad line never fails the batch.

use std::path::Path;

use chronicles_core::data_processors::{is_quote, IntegerParser, QuantityExtractor, TextNormalizer};
use chronicles_core::models::{columns, Record};
use chronicles_core::time_utils::serial_to_datetime;
use chronicles_core::{ChroniclesError, Result};
use tracing::{debug, info};

/// Sample packing list bundled with the binary.
const SAMPLE_CSV: &str = include_str!("../data/sample_packing_list.csv");

const UTF8_BOM: char = '\u{feff}';

// ── Dataset ───────────────────────────────────────────────────────────────────

/// A parsed packing list: the header row (schema, in source order) plus one
/// record per non-blank data line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Per-batch counters, logged once at debug level.
#[derive(Debug, Default)]
struct ParseStats {
    rows: usize,
    blank_lines: usize,
    undated: usize,
    bad_quantity: usize,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse packing-list text into records.
///
/// Equivalent to [`parse_dataset`] without the header list.
pub fn parse_records(text: &str) -> Vec<Record> {
    parse_dataset(text).records
}

/// Parse packing-list text into a [`Dataset`].
///
/// A leading UTF-8 byte-order mark is ignored. The first line of the
/// trimmed text is the header row; it is split on
/// plain commas and every name is trimmed. Each following non-blank line is
/// split with [`split_fields`] and mapped positionally onto the headers.
/// Fewer than two lines yields an empty record list.
pub fn parse_dataset(text: &str) -> Dataset {
    let mut lines = text
        .trim_start_matches(UTF8_BOM)
        .trim()
        .split('\n').map(|l| l.trim_end_matches('\r'));

    let Some(header_line) = lines.next() else {
        return Dataset::default();
    };
    let headers: Vec<String> = header_line
        .split(',')
        .map(|h| h.trim().to_string())
        .collect();

    let mut stats = ParseStats::default();
    let mut records = Vec::new();

    for line in lines {
        if line.trim().is_empty() {
            stats.blank_lines += 1;
            continue;
        }
        let values = split_fields(line);
        records.push(build_record(&headers, values, &mut stats));
    }

    if records.is_empty() && headers.iter().all(|h| h.is_empty()) {
        return Dataset::default();
    }

    debug!(
        rows = stats.rows,
        blank_lines = stats.blank_lines,
        undated = stats.undated,
        bad_quantity = stats.bad_quantity,
        "parsed packing list"
    );

    Dataset { headers, records }
}

/// Split one data line into trimmed field values.
///
/// A comma inside a quoted span is not a separator. The plain double quote
/// and both curly quotes toggle the quoted state interchangeably and are
/// dropped from the output; there is no escaped-quote sequence.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;

    for c in line.chars() {
        if is_quote(c) {
            in_quote = !in_quote;
        } else if c == ',' && !in_quote {
            values.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(c);
        }
    }
    values.push(current.trim().to_string());

    values
}

/// Read and parse a packing-list CSV file from disk.
pub fn load_records(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).map_err(|source| ChroniclesError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = parse_dataset(&text);
    info!(
        records = dataset.len(),
        "loaded packing list from {}",
        path.display()
    );
    Ok(dataset)
}

/// The bundled sample packing list.
pub fn sample_dataset() -> Dataset {
    parse_dataset(SAMPLE_CSV)
}

/// Render `records` as CSV in the column order of `headers`.
///
/// Values containing a comma, a quote or a line break are wrapped in double
/// quotes with inner double quotes doubled.
pub fn to_csv(headers: &[String], records: &[Record]) -> String {
    let mut out = String::new();
    out.push_str(
        &headers
            .iter()
            .map(|h| escape_csv(h))
            .collect::<Vec<_>>()
            .join(","),
    );
    out.push('\n');

    for record in records {
        let row: Vec<String> = headers
            .iter()
            .map(|h| escape_csv(&record.field(h).unwrap_or_default()))
            .collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Map positional `values` onto `headers` and normalize the typed columns.
fn build_record(headers: &[String], values: Vec<String>, stats: &mut ParseStats) -> Record {
    let mut record = Record::default();
    let mut quantity_raw = String::new();
    let mut values = values.into_iter();

    for header in headers {
        // Missing trailing fields are empty; surplus fields are dropped.
        let value = values.next().unwrap_or_default();
        match header.as_str() {
            columns::SUPPLIER => record.supplier_name = value,
            columns::DELIVER_DATE => record.deliver_date = value,
            columns::CUSTOMER => record.customer = value,
            columns::LICENSE_ID => record.license_id = value,
            columns::DEVICE_CATEGORY => record.device_category = value,
            columns::UDI => record.udi = value,
            columns::DEVICE_NAME => record.device_name = value,
            columns::LOT_NUMBER => record.lot_number = value,
            columns::SERIAL_NUMBER => record.serial_number = value,
            columns::MODEL_NUMBER => record.model_number = value,
            columns::QUANTITY => quantity_raw = value,
            columns::UNIT => record.unit = value,
            other => {
                record.extra.insert(other.to_string(), value);
            }
        }
    }

    record.deliver_date_parsed =
        IntegerParser::parse_prefix(&record.deliver_date).and_then(serial_to_datetime);
    if record.deliver_date_parsed.is_none() {
        stats.undated += 1;
    }

    record.quantity = QuantityExtractor::extract(&quantity_raw);
    if record.quantity == 0 && IntegerParser::parse_prefix(&quantity_raw).map_or(true, |n| n < 0) {
        stats.bad_quantity += 1;
    }

    record.device_name = TextNormalizer::device_name(&record.device_name);
    record.model_number = TextNormalizer::model_number(&record.model_number);

    stats.rows += 1;
    record
}

fn escape_csv(value: &str) -> String {
    let needs_quoting = value
        .chars()
        .any(|c| c == ',' || c == '\n' || c == '\r' || is_quote(c));
    if needs_quoting {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const SCENARIO: &str = "Supplier,deliverdate,customer,DeviceName,Numbers\n\
                            S1,45930,C1,\"Widget\",3\n\
                            S2,abc,C2,Gadget,x\n";

    // ── split_fields ──────────────────────────────────────────────────────────

    #[test]
    fn test_split_fields_plain() {
        assert_eq!(split_fields("a, b ,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_fields_quoted_comma() {
        assert_eq!(
            split_fields("S1,\"Widget, large\",3"),
            vec!["S1", "Widget, large", "3"]
        );
    }

    #[test]
    fn test_split_fields_curly_quotes_are_interchangeable() {
        // Opening with a curly quote and closing with a plain one still pairs.
        assert_eq!(
            split_fields("“A,B\",“美敦力”博視達"),
            vec!["A,B", "美敦力博視達"]
        );
    }

    #[test]
    fn test_split_fields_trailing_empty() {
        assert_eq!(split_fields("a,,"), vec!["a", "", ""]);
    }

    // ── parse_records ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_scenario() {
        let records = parse_records(SCENARIO);
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.quantity, 3);
        assert_eq!(first.delivery_day().as_deref(), Some("2025-10-01"));
        assert_eq!(first.device_name, "Widget");
        assert_eq!(first.deliver_date, "45930");
        assert_eq!(first.customer, "C1");
        // "Supplier" is not the packing-list column name, so it stays opaque.
        assert_eq!(first.extra.get("Supplier").map(String::as_str), Some("S1"));
        assert_eq!(first.supplier_name, "");

        let second = &records[1];
        assert_eq!(second.quantity, 0);
        assert!(second.deliver_date_parsed.is_none());
        assert_eq!(second.deliver_date, "abc");
        assert_eq!(second.device_name, "Gadget");
    }

    #[test]
    fn test_parse_row_count_matches_data_lines() {
        let text = "Suppliername,Numbers\nA,1\n\nB,2\n   \nC,3";
        assert_eq!(parse_records(text).len(), 3);
    }

    #[test]
    fn test_parse_crlf_line_endings() {
        let records = parse_records("Suppliername,Numbers\r\nA,1\r\nB,2\r\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].supplier_name, "B");
        assert_eq!(records[1].quantity, 2);
    }

    #[test]
    fn test_parse_bom_prefixed_header() {
        let dataset = parse_dataset("\u{feff}Suppliername,Numbers\nB00018,4\n");
        assert_eq!(dataset.headers[0], "Suppliername");
        assert_eq!(dataset.records[0].supplier_name, "B00018");
        assert_eq!(dataset.records[0].quantity, 4);
        assert!(dataset.records[0].extra.is_empty());
    }

    #[test]
    fn test_parse_quantity_is_never_negative() {
        let text = "Numbers\n5\n-3\nabc\n\n7.9\n12pcs";
        let quantities: Vec<u64> = parse_records(text).iter().map(|r| r.quantity).collect();
        assert_eq!(quantities, vec![5, 0, 0, 7, 12]);
    }

    #[test]
    fn test_parse_serial_date_fractional_and_out_of_range() {
        let text = "deliverdate\n45930.75\n99999999999999\n";
        let records = parse_records(text);
        assert_eq!(records[0].delivery_day().as_deref(), Some("2025-10-01"));
        assert!(records[1].deliver_date_parsed.is_none());
        assert_eq!(records[1].deliver_date, "99999999999999");
    }

    #[test]
    fn test_parse_defaults_for_missing_columns() {
        let records = parse_records("Suppliername,customer\nB00079,C1\n");
        let r = &records[0];
        assert_eq!(r.device_name, "Unknown Device");
        assert_eq!(r.model_number, "Unknown");
        assert_eq!(r.quantity, 0);
        assert!(r.deliver_date_parsed.is_none());
    }

    #[test]
    fn test_parse_short_and_long_rows() {
        let text = "Suppliername,customer,ModelNum\nA\nB,C2,M1,surplus";
        let records = parse_records(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].customer, "");
        assert_eq!(records[0].model_number, "Unknown");
        assert_eq!(records[1].model_number, "M1");
        assert!(records[1].extra.is_empty());
    }

    #[test]
    fn test_parse_device_name_quote_only_defaults() {
        let records = parse_records("DeviceName\n“”\n");
        assert_eq!(records[0].device_name, "Unknown Device");
    }

    #[test]
    fn test_parse_empty_and_header_only() {
        assert!(parse_records("").is_empty());
        assert!(parse_records("   \n  ").is_empty());

        let header_only = parse_dataset("Suppliername,Numbers\n");
        assert!(header_only.is_empty());
        assert_eq!(header_only.headers, vec!["Suppliername", "Numbers"]);
    }

    #[test]
    fn test_parse_duplicate_header_last_wins() {
        let records = parse_records("customer,customer\nfirst,second\n");
        assert_eq!(records[0].customer, "second");
    }

    #[test]
    fn test_parse_preserves_header_order() {
        let dataset = parse_dataset(" Numbers , Warehouse ,Suppliername\n1,W1,S\n");
        assert_eq!(dataset.headers, vec!["Numbers", "Warehouse", "Suppliername"]);
        assert_eq!(dataset.records[0].field("Warehouse").as_deref(), Some("W1"));
    }

    // ── sample_dataset ────────────────────────────────────────────────────────

    #[test]
    fn test_sample_dataset_shape() {
        let dataset = sample_dataset();
        assert_eq!(dataset.headers.len(), 12);
        assert_eq!(dataset.headers, columns::ALL.to_vec());
        assert!(!dataset.is_empty());

        for record in &dataset.records {
            assert!(!record.device_name.is_empty());
            assert!(!record.device_name.chars().any(is_quote));
            assert!(!record.model_number.is_empty());
            assert!(record.deliver_date_parsed.is_some());
        }
    }

    // ── load_records ──────────────────────────────────────────────────────────

    #[test]
    fn test_load_records_strips_bom() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("list.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "\u{feff}Suppliername,Numbers\nB00018,4\n").unwrap();

        let dataset = load_records(&path).expect("load");
        assert_eq!(dataset.headers[0], "Suppliername");
        assert_eq!(dataset.records[0].supplier_name, "B00018");
        assert_eq!(dataset.records[0].quantity, 4);
    }

    #[test]
    fn test_load_records_missing_file() {
        let tmp = TempDir::new().expect("tempdir");
        let err = load_records(&tmp.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, ChroniclesError::FileRead { .. }));
    }

    // ── to_csv ────────────────────────────────────────────────────────────────

    #[test]
    fn test_to_csv_header_order_and_quoting() {
        let dataset = parse_dataset("DeviceName,Numbers,Note\n\"Stent, coated\",2,ok\n");
        let csv = to_csv(&dataset.headers, &dataset.records);
        assert_eq!(csv, "DeviceName,Numbers,Note\n\"Stent, coated\",2,ok\n");

        let reparsed = parse_records(&csv);
        assert_eq!(reparsed, dataset.records);
    }

    #[test]
    fn test_to_csv_writes_normalized_values() {
        let dataset = parse_dataset("ModelNum,Numbers\n,abc\n");
        let csv = to_csv(&dataset.headers, &dataset.records);
        assert_eq!(csv, "ModelNum,Numbers\nUnknown,0\n");
    }
}
