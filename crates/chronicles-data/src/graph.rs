//! Supplier → device → customer relationship graph.

use std::collections::HashMap;

use chronicles_core::models::{GraphLink, GraphNode, NodeGroup, Record, RelationshipGraph};

/// Default number of records fed into the graph.
pub const DEFAULT_GRAPH_LIMIT: usize = 150;

/// Build the relationship graph from the first `limit` records.
///
/// Every record contributes a supplier, a device and a customer node (created
/// on first sight, ids `SUP:`, `DEV:` and `CUST:` followed by the label) and
/// adds its quantity to each. It also adds a supplier → device link of value
/// 1 and a device → customer link carrying its quantity.
pub fn build_graph(records: &[Record], limit: usize) -> RelationshipGraph {
    let mut builder = GraphBuilder::default();

    for record in records.iter().take(limit) {
        let supplier = builder.touch(NodeGroup::Supplier, &record.supplier_name, record.quantity);
        let device = builder.touch(NodeGroup::Device, &record.device_name, record.quantity);
        let customer = builder.touch(NodeGroup::Customer, &record.customer, record.quantity);

        builder.links.push(GraphLink {
            source: supplier,
            target: device.clone(),
            value: 1,
        });
        builder.links.push(GraphLink {
            source: device,
            target: customer,
            value: record.quantity,
        });
    }

    RelationshipGraph {
        nodes: builder.nodes,
        links: builder.links,
    }
}

#[derive(Default)]
struct GraphBuilder {
    nodes: Vec<GraphNode>,
    links: Vec<GraphLink>,
    index: HashMap<String, usize>,
}

impl GraphBuilder {
    /// Add `units` to the node for `label`, creating it if needed; returns its id.
    fn touch(&mut self, group: NodeGroup, label: &str, units: u64) -> String {
        let id = format!("{}:{}", group.id_prefix(), label);
        match self.index.get(&id) {
            Some(&i) => self.nodes[i].total_units += units,
            None => {
                self.index.insert(id.clone(), self.nodes.len());
                self.nodes.push(GraphNode {
                    id: id.clone(),
                    group,
                    label: label.to_string(),
                    total_units: units,
                });
            }
        }
        id
    }
}
