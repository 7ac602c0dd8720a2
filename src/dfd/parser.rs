use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::types::{DataFlow, DiagramModel, Warning};
use crate::error::ParseError;

pub const FEATURES_KEY: &str = "DFD features";

/// `3. User → Validate Data → Database`; the index prefix is optional.
static FLOW_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\d+\.)?\s*(.+?)\s*→\s*(.+?)\s*→\s*(.+)$")
        .unwrap_or_else(|e| panic!("flow pattern must compile: {e}"))
});

/// A model plus everything that was skipped on the way in.
#[derive(Debug, Clone, Default)]
pub struct Parsed {
    pub model: DiagramModel,
    pub warnings: Vec<Warning>,
}

/// Parse a JSON DFD description.
///
/// Only broken JSON or a missing `"DFD features"` object fail the parse.
/// Everything below that level is best effort: absent keys become empty,
/// unusable entries are dropped and reported in [`Parsed::warnings`].
pub fn parse_dfd(input: &str) -> Result<Parsed, ParseError> {
    let root: Value = serde_json::from_str(input)?;

    let features = match root.get(FEATURES_KEY) {
        None | Some(Value::Null) => return Err(ParseError::MissingFeatures),
        Some(value) => value
            .as_object()
            .ok_or_else(|| ParseError::FeaturesNotObject(json_kind(value)))?,
    };

    let mut warnings = Vec::new();

    let external_entities = name_list(features, "external_entities", &mut warnings);
    let processes = name_list(features, "processes", &mut warnings);
    let data_stores = name_list(features, "data_stores", &mut warnings);
    let piidata = name_list(features, "piidata", &mut warnings);
    let data_flows = flow_list(features, &mut warnings);
    let deployment = features
        .get("deployment")
        .and_then(scalar_text)
        .unwrap_or_default();

    log::debug!(
        "parsed DFD: {} entities, {} processes, {} stores, {} flows, {} warnings",
        external_entities.len(),
        processes.len(),
        data_stores.len(),
        data_flows.len(),
        warnings.len()
    );

    Ok(Parsed {
        model: DiagramModel {
            external_entities,
            processes,
            data_stores,
            data_flows,
            deployment,
            piidata,
        },
        warnings,
    })
}

/// Match a single `N. Source → Process → Target` string.
pub fn parse_flow(text: &str) -> Option<DataFlow> {
    let caps = FLOW_PATTERN.captures(text)?;
    let source = caps.get(1)?.as_str().trim();
    let process = caps.get(2)?.as_str().trim();
    let target = caps.get(3)?.as_str().trim();

    if source.is_empty() || process.is_empty() || target.is_empty() {
        return None;
    }

    Some(DataFlow::new(source, process, target))
}

fn name_list(
    features: &Map<String, Value>,
    field: &'static str,
    warnings: &mut Vec<Warning>,
) -> Vec<String> {
    let items = match features.get(field) {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => {
            warnings.push(Warning::NonStringValue { field, index: 0 });
            return Vec::new();
        }
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let name = scalar_text(item);
            if name.is_none() {
                warnings.push(Warning::NonStringValue { field, index });
            }
            name
        })
        .collect()
}

fn flow_list(features: &Map<String, Value>, warnings: &mut Vec<Warning>) -> Vec<DataFlow> {
    let items = match features.get("data_flows") {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => {
            warnings.push(Warning::NonStringValue {
                field: "data_flows",
                index: 0,
            });
            return Vec::new();
        }
    };

    let mut flows = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Some(text) = item.as_str() else {
            warnings.push(Warning::NonStringValue {
                field: "data_flows",
                index,
            });
            continue;
        };

        match parse_flow(text) {
            Some(flow) => flows.push(flow),
            None => warnings.push(Warning::UnmatchedFlow {
                index,
                text: text.to_string(),
            }),
        }
    }
    flows
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "DFD features": {
            "external_entities": ["User", "Payment Gateway"],
            "processes": ["Validate Data", "Process Payment"],
            "data_stores": ["Database"],
            "data_flows": [
                "1. User → Validate Data → Database",
                "2. Database → Process Payment → Payment Gateway",
                "User - Database"
            ],
            "deployment": "AWS VPC",
            "piidata": ["Email", "Card Number"]
        }
    }"#;

    #[test]
    fn test_parse_full_description() {
        let parsed = parse_dfd(SAMPLE).unwrap();
        let model = &parsed.model;

        assert_eq!(model.external_entities, vec!["User", "Payment Gateway"]);
        assert_eq!(model.processes, vec!["Validate Data", "Process Payment"]);
        assert_eq!(model.data_stores, vec!["Database"]);
        assert_eq!(model.deployment, "AWS VPC");
        assert_eq!(model.piidata, vec!["Email", "Card Number"]);
        assert_eq!(model.data_flows.len(), 2);
        assert_eq!(
            model.data_flows[1],
            DataFlow::new("Database", "Process Payment", "Payment Gateway")
        );
    }

    #[test]
    fn test_unmatched_flow_is_dropped_and_reported() {
        let parsed = parse_dfd(SAMPLE).unwrap();
        assert_eq!(
            parsed.warnings,
            vec![Warning::UnmatchedFlow {
                index: 2,
                text: "User - Database".to_string()
            }]
        );
    }

    #[test]
    fn test_parse_flow_string() {
        let flow = parse_flow("3. User → Validate Data → Database").unwrap();
        assert_eq!(flow.source, "User");
        assert_eq!(flow.process, "Validate Data");
        assert_eq!(flow.target, "Database");

        let spaced = parse_flow("12.   Admin   →  Audit  →  Logs  ").unwrap();
        assert_eq!(spaced, DataFlow::new("Admin", "Audit", "Logs"));

        let unnumbered = parse_flow("Admin → Audit → Logs").unwrap();
        assert_eq!(unnumbered, DataFlow::new("Admin", "Audit", "Logs"));
    }

    #[test]
    fn test_parse_flow_rejects_missing_arrows() {
        assert!(parse_flow("User - Database").is_none());
        assert!(parse_flow("1. User → Database").is_none());
        assert!(parse_flow("").is_none());
    }

    #[test]
    fn test_extra_arrows_stay_in_target() {
        let flow = parse_flow("4. A → B → C → D").unwrap();
        assert_eq!(flow.source, "A");
        assert_eq!(flow.process, "B");
        assert_eq!(flow.target, "C → D");
    }

    #[test]
    fn test_missing_features_key() {
        let err = parse_dfd(r#"{"foo": {}}"#).unwrap_err();
        assert!(matches!(err, ParseError::MissingFeatures));
        assert!(err.to_string().contains("\"DFD features\""));

        assert!(matches!(
            parse_dfd(r#"{"DFD features": null}"#),
            Err(ParseError::MissingFeatures)
        ));
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_dfd("{ not json").unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_features_must_be_object() {
        let err = parse_dfd(r#"{"DFD features": ["User"]}"#).unwrap_err();
        assert_eq!(err.to_string(), "\"DFD features\" must be an object, found an array");
    }

    #[test]
    fn test_missing_sub_keys_default_to_empty() {
        let parsed = parse_dfd(r#"{"DFD features": {}}"#).unwrap();
        assert_eq!(parsed.model, DiagramModel::default());
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_scalar_names_are_stringified() {
        let parsed = parse_dfd(
            r#"{"DFD features": {"processes": [42, true, null, "Sync"], "deployment": 3}}"#,
        )
        .unwrap();
        assert_eq!(parsed.model.processes, vec!["42", "true", "Sync"]);
        assert_eq!(parsed.model.deployment, "3");
        assert_eq!(
            parsed.warnings,
            vec![Warning::NonStringValue {
                field: "processes",
                index: 2
            }]
        );
    }

    #[test]
    fn test_non_string_flow_is_skipped() {
        let parsed = parse_dfd(
            r#"{"DFD features": {"data_flows": [7, "1. A → B → C"]}}"#,
        )
        .unwrap();
        assert_eq!(parsed.model.data_flows, vec![DataFlow::new("A", "B", "C")]);
        assert_eq!(
            parsed.warnings,
            vec![Warning::NonStringValue {
                field: "data_flows",
                index: 0
            }]
        );
    }
}
