//! Pure edits over a [`DiagramModel`].
//!
//! Every operation takes the current model by reference and hands back a new
//! one, so a render that is holding the old snapshot never sees a half-applied
//! change. `None` means the edit was rejected and the caller keeps what it had.

use super::types::{DataFlow, DiagramModel, EntityKind};

/// Append `name` (trimmed) to a category. Duplicates are allowed.
pub fn add_element(model: &DiagramModel, kind: EntityKind, name: &str) -> Option<DiagramModel> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let mut next = model.clone();
    next.elements_mut(kind).push(name.to_string());
    Some(next)
}

/// Remove `name` from a category, together with every flow that mentions it
/// in any position.
pub fn remove_element(model: &DiagramModel, kind: EntityKind, name: &str) -> DiagramModel {
    let mut next = model.clone();
    next.elements_mut(kind).retain(|existing| existing != name);
    next.data_flows.retain(|flow| !flow.references(name));
    next
}

/// Append a flow. The names are not checked against any category.
pub fn add_data_flow(
    model: &DiagramModel,
    source: &str,
    process: &str,
    target: &str,
) -> Option<DiagramModel> {
    let (source, process, target) = (source.trim(), process.trim(), target.trim());
    if source.is_empty() || process.is_empty() || target.is_empty() {
        return None;
    }

    let mut next = model.clone();
    next.data_flows.push(DataFlow::new(source, process, target));
    Some(next)
}

pub fn remove_data_flow_at(model: &DiagramModel, index: usize) -> Option<DiagramModel> {
    if index >= model.data_flows.len() {
        return None;
    }

    let mut next = model.clone();
    next.data_flows.remove(index);
    Some(next)
}

/// Every element name, entities first, then processes, then stores.
pub fn all_elements(model: &DiagramModel) -> Vec<&str> {
    EntityKind::ALL
        .iter()
        .flat_map(|&kind| model.elements(kind).iter().map(String::as_str))
        .collect()
}

/// Element counts per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub external_entities: usize,
    pub processes: usize,
    pub data_stores: usize,
    pub data_flows: usize,
    pub pii_items: usize,
}

impl Summary {
    pub fn of(model: &DiagramModel) -> Self {
        Self {
            external_entities: model.external_entities.len(),
            processes: model.processes.len(),
            data_stores: model.data_stores.len(),
            data_flows: model.data_flows.len(),
            pii_items: model.piidata.len(),
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} External Entities", self.external_entities)?;
        writeln!(f, "{} Processes", self.processes)?;
        writeln!(f, "{} Data Stores", self.data_stores)?;
        writeln!(f, "{} Data Flows", self.data_flows)?;
        write!(f, "{} PII Data Items", self.pii_items)
    }
}
