use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Header names of the fixed packing-list columns, as they appear in the
/// GUDID export.
pub mod columns {
    pub const SUPPLIER: &str = "Suppliername";
    pub const DELIVER_DATE: &str = "deliverdate";
    pub const CUSTOMER: &str = "customer";
    pub const LICENSE_ID: &str = "licenseID";
    pub const DEVICE_CATEGORY: &str = "DeviceCategory";
    pub const UDI: &str = "UDI";
    pub const DEVICE_NAME: &str = "DeviceName";
    pub const LOT_NUMBER: &str = "LotNumber";
    pub const SERIAL_NUMBER: &str = "SN";
    pub const MODEL_NUMBER: &str = "ModelNum";
    pub const QUANTITY: &str = "Numbers";
    pub const UNIT: &str = "Unit";

    /// Every fixed column, in export order.
    pub const ALL: [&str; 12] = [
        SUPPLIER,
        DELIVER_DATE,
        CUSTOMER,
        LICENSE_ID,
        DEVICE_CATEGORY,
        UDI,
        DEVICE_NAME,
        LOT_NUMBER,
        SERIAL_NUMBER,
        MODEL_NUMBER,
        QUANTITY,
        UNIT,
    ];
}

/// Device name substituted when the column is empty after quote stripping.
pub const UNKNOWN_DEVICE: &str = "Unknown Device";

/// Model number substituted when the column is empty.
pub const UNKNOWN_MODEL: &str = "Unknown";

/// One normalized supply-chain transaction line.
///
/// Created once while parsing an input line and never mutated afterwards.
/// Serializes with the original column names so downstream consumers see the
/// same shape as the uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Suppliername")]
    pub supplier_name: String,
    /// Raw delivery-date cell exactly as it appeared in the source.
    #[serde(rename = "deliverdate")]
    pub deliver_date: String,
    /// Delivery date decoded from the spreadsheet serial, if it was a number.
    #[serde(rename = "deliverdate_dt")]
    pub deliver_date_parsed: Option<DateTime<Utc>>,
    pub customer: String,
    #[serde(rename = "licenseID")]
    pub license_id: String,
    #[serde(rename = "DeviceCategory")]
    pub device_category: String,
    #[serde(rename = "UDI")]
    pub udi: String,
    /// Quote-stripped device name; never empty.
    #[serde(rename = "DeviceName")]
    pub device_name: String,
    #[serde(rename = "LotNumber")]
    pub lot_number: String,
    #[serde(rename = "SN")]
    pub serial_number: String,
    /// Never empty; `"Unknown"` when the source cell was blank.
    #[serde(rename = "ModelNum")]
    pub model_number: String,
    /// Units shipped on this line; `0` when the cell was not a number.
    #[serde(rename = "Numbers")]
    pub quantity: u64,
    #[serde(rename = "Unit")]
    pub unit: String,
    /// Columns present in the header but outside the fixed set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Record {
    /// Look up a column value by header name.
    ///
    /// Fixed columns return their normalized value (`Numbers` is rendered as a
    /// decimal string); any other header is looked up in [`Record::extra`].
    pub fn field(&self, name: &str) -> Option<String> {
        let value = match name {
            columns::SUPPLIER => self.supplier_name.clone(),
            columns::DELIVER_DATE => self.deliver_date.clone(),
            columns::CUSTOMER => self.customer.clone(),
            columns::LICENSE_ID => self.license_id.clone(),
            columns::DEVICE_CATEGORY => self.device_category.clone(),
            columns::UDI => self.udi.clone(),
            columns::DEVICE_NAME => self.device_name.clone(),
            columns::LOT_NUMBER => self.lot_number.clone(),
            columns::SERIAL_NUMBER => self.serial_number.clone(),
            columns::MODEL_NUMBER => self.model_number.clone(),
            columns::QUANTITY => self.quantity.to_string(),
            columns::UNIT => self.unit.clone(),
            other => return self.extra.get(other).cloned(),
        };
        Some(value)
    }

    /// Calendar date (UTC) of the delivery as `YYYY-MM-DD`, if parsed.
    pub fn delivery_day(&self) -> Option<String> {
        self.deliver_date_parsed
            .map(|dt| dt.format("%Y-%m-%d").to_string())
    }
}

/// Active supplier / device / date-range predicate.
///
/// Every field uses the empty string as "no constraint". Dates are kept as
/// entered (`YYYY-MM-DD` or RFC 3339) and resolved by the filter engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    /// Exact supplier name to keep.
    pub supplier: String,
    /// Exact device name to keep.
    pub device: String,
    /// Inclusive lower bound on the delivery date.
    pub start_date: String,
    /// Inclusive upper bound on the delivery date.
    pub end_date: String,
}

impl FilterCriteria {
    /// `true` when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.supplier.is_empty()
            && self.device.is_empty()
            && self.start_date.is_empty()
            && self.end_date.is_empty()
    }

    /// Human-readable supplier/device description, e.g.
    /// `"Supplier=B00079, Device=All"`.
    pub fn describe(&self) -> String {
        format!(
            "Supplier={}, Device={}",
            or_label(&self.supplier, "All"),
            or_label(&self.device, "All")
        )
    }

    /// Human-readable date range, e.g. `"2025-10-01 to End"`.
    pub fn date_range_label(&self) -> String {
        format!(
            "{} to {}",
            or_label(&self.start_date, "Start"),
            or_label(&self.end_date, "End")
        )
    }
}

fn or_label<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// A named total, used for the device and customer rankings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
    pub value: u64,
}

/// Units delivered on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatePoint {
    /// `YYYY-MM-DD` (UTC).
    pub date: String,
    pub value: u64,
}

/// Aggregate view of a (possibly filtered) record set.
///
/// A pure function of its input records; recomputed whenever the dataset or
/// the filter criteria change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    /// Number of records.
    pub total_lines: usize,
    /// Sum of `quantity` over all records.
    pub total_units: u64,
    /// Distinct supplier names (the empty name counts as one).
    pub unique_suppliers: usize,
    /// Distinct customer codes (the empty code counts as one).
    pub unique_customers: usize,
    /// Units per delivery day, ascending by date.
    pub time_series: Vec<DatePoint>,
    /// Up to ten devices ranked by units, descending.
    pub top_devices: Vec<NamedValue>,
    /// Up to ten customers ranked by units, descending.
    pub customer_volume: Vec<NamedValue>,
}

impl AnalyticsSummary {
    /// First and last day of the time series, if any record carried a date.
    pub fn date_span(&self) -> Option<(&str, &str)> {
        let first = self.time_series.first()?;
        let last = self.time_series.last()?;
        Some((first.date.as_str(), last.date.as_str()))
    }
}

/// Which side of the supply chain a graph node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeGroup {
    Supplier,
    Device,
    Customer,
}

impl NodeGroup {
    /// Prefix used when building node ids (`SUP:`, `DEV:`, `CUST:`).
    pub fn id_prefix(self) -> &'static str {
        match self {
            NodeGroup::Supplier => "SUP",
            NodeGroup::Device => "DEV",
            NodeGroup::Customer => "CUST",
        }
    }
}

/// A supplier, device or customer in the relationship graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// `"<prefix>:<label>"`, unique across the graph.
    pub id: String,
    pub group: NodeGroup,
    pub label: String,
    /// Units flowing through this node.
    pub total_units: u64,
}

/// A directed edge between two graph nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    pub value: u64,
}

/// Supplier → device → customer relationship graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipGraph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl RelationshipGraph {
    /// `true` when the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find a node by id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> Record {
        let mut extra = BTreeMap::new();
        extra.insert("Warehouse".to_string(), "TPE-2".to_string());
        Record {
            supplier_name: "B00079".to_string(),
            deliver_date: "45930".to_string(),
            deliver_date_parsed: DateTime::from_timestamp(20_361 * 86_400, 0),
            customer: "C06052".to_string(),
            device_name: "Pacemaker".to_string(),
            model_number: "L331".to_string(),
            quantity: 2,
            extra,
            ..Default::default()
        }
    }

    // ── Record ────────────────────────────────────────────────────────────────

    #[test]
    fn test_record_field_known_and_extra() {
        let record = sample_record();
        assert_eq!(record.field("Suppliername").as_deref(), Some("B00079"));
        assert_eq!(record.field("Numbers").as_deref(), Some("2"));
        assert_eq!(record.field("Warehouse").as_deref(), Some("TPE-2"));
        assert_eq!(record.field("Missing"), None);
    }

    #[test]
    fn test_record_delivery_day() {
        let record = sample_record();
        assert_eq!(record.delivery_day().as_deref(), Some("2025-10-01"));

        let undated = Record::default();
        assert!(undated.delivery_day().is_none());
    }

    #[test]
    fn test_record_serializes_with_source_column_names() {
        let value = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(value["Suppliername"], "B00079");
        assert_eq!(value["Numbers"], 2);
        assert_eq!(value["ModelNum"], "L331");
        // Extra columns are flattened next to the fixed ones.
        assert_eq!(value["Warehouse"], "TPE-2");
        assert!(value.get("extra").is_none());
    }

    // ── FilterCriteria ────────────────────────────────────────────────────────

    #[test]
    fn test_filter_criteria_default_is_empty() {
        let criteria = FilterCriteria::default();
        assert!(criteria.is_empty());
        assert_eq!(criteria.describe(), "Supplier=All, Device=All");
        assert_eq!(criteria.date_range_label(), "Start to End");
    }

    #[test]
    fn test_filter_criteria_describe_set_values() {
        let criteria = FilterCriteria {
            supplier: "B00018".to_string(),
            start_date: "2025-10-01".to_string(),
            ..Default::default()
        };
        assert!(!criteria.is_empty());
        assert_eq!(criteria.describe(), "Supplier=B00018, Device=All");
        assert_eq!(criteria.date_range_label(), "2025-10-01 to End");
    }

    #[test]
    fn test_filter_criteria_deserializes_camel_case_with_defaults() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"device":"Widget","endDate":"2025-12-31"}"#).unwrap();
        assert_eq!(criteria.device, "Widget");
        assert_eq!(criteria.end_date, "2025-12-31");
        assert!(criteria.supplier.is_empty());
    }

    // ── AnalyticsSummary ──────────────────────────────────────────────────────

    #[test]
    fn test_summary_serializes_camel_case() {
        let summary = AnalyticsSummary {
            total_lines: 1,
            total_units: 3,
            ..Default::default()
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["totalLines"], 1);
        assert_eq!(value["totalUnits"], 3);
        assert!(value["topDevices"].as_array().unwrap().is_empty());
        assert!(value["customerVolume"].is_array());
    }

    #[test]
    fn test_summary_date_span() {
        let mut summary = AnalyticsSummary::default();
        assert!(summary.date_span().is_none());

        summary.time_series = vec![
            DatePoint { date: "2025-10-01".to_string(), value: 4 },
            DatePoint { date: "2025-11-06".to_string(), value: 1 },
        ];
        assert_eq!(summary.date_span(), Some(("2025-10-01", "2025-11-06")));
    }

    // ── Graph ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_node_group_serialization_and_prefix() {
        assert_eq!(
            serde_json::to_value(NodeGroup::Customer).unwrap(),
            serde_json::json!("customer")
        );
        assert_eq!(NodeGroup::Supplier.id_prefix(), "SUP");
        assert_eq!(NodeGroup::Device.id_prefix(), "DEV");
    }

    #[test]
    fn test_relationship_graph_lookup() {
        let graph = RelationshipGraph {
            nodes: vec![GraphNode {
                id: "SUP:B00079".to_string(),
                group: NodeGroup::Supplier,
                label: "B00079".to_string(),
                total_units: 5,
            }],
            links: vec![],
        };
        assert!(!graph.is_empty());
        assert_eq!(graph.node("SUP:B00079").unwrap().total_units, 5);
        assert!(graph.node("DEV:x").is_none());
    }
}
