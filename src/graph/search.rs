//! Node search over an inferred graph

use super::resource_graph::{GraphNode, LinkDirection, ResourceGraph};
use crate::core::error::{VizError, VizResult};
use crate::model::FieldPath;
use crate::model::path::display_value;
use serde_json::Value;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchMode {
  /// Case-insensitive substring of the node label
  Name,
  /// Value at a path in the node's document
  Field { path: FieldPath },
  /// Name matches, optionally followed by their direct neighbours
  Dependencies { include_connected: bool },
}

impl SearchMode {
  /// Build from CLI flags.
  pub fn from_args(mode: &str, field: Option<&str>, include_connected: bool) -> VizResult<Self> {
    match mode.to_lowercase().as_str() {
      "name" => Ok(Self::Name),
      "field" => {
        let path = field
          .map(FieldPath::parse)
          .filter(|p| !p.is_empty())
          .ok_or_else(|| VizError::with_help("Field search needs a path", "pass --field spec.some.path"))?;
        Ok(Self::Field { path })
      }
      "dependencies" | "deps" => Ok(Self::Dependencies { include_connected }),
      _ => Err(VizError::message(format!(
        "Unknown search mode '{}'. Valid modes: name, field, dependencies",
        mode
      ))),
    }
  }
}

/// Nodes matching `term` under `mode`, in graph node order.
///
/// A blank term matches nothing.
pub fn search<'g>(graph: &'g ResourceGraph, term: &str, mode: &SearchMode) -> Vec<&'g GraphNode> {
  let term = term.trim();
  if term.is_empty() {
    return Vec::new();
  }
  let lowered = term.to_lowercase();

  match mode {
    SearchMode::Name => graph.nodes().filter(|n| name_matches(n, &lowered)).collect(),
    SearchMode::Field { path } => graph
      .nodes()
      .filter(|n| path.lookup_defined(&n.data).is_some_and(|v| value_matches(v, term, &lowered)))
      .collect(),
    SearchMode::Dependencies { include_connected } => {
      let direct: Vec<&GraphNode> = graph.nodes().filter(|n| name_matches(n, &lowered)).collect();
      if !include_connected {
        return direct;
      }

      let mut seen: HashSet<&str> = direct.iter().map(|n| n.id.as_str()).collect();
      let mut connected: HashSet<&str> = HashSet::new();
      for node in &direct {
        if let Ok(neighbors) = graph.neighbors(&node.id, LinkDirection::Both) {
          connected.extend(neighbors.into_iter().map(|n| n.id.as_str()));
        }
      }

      let mut results = direct;
      for node in graph.nodes() {
        if connected.contains(node.id.as_str()) && seen.insert(node.id.as_str()) {
          results.push(node);
        }
      }
      results
    }
  }
}

fn name_matches(node: &GraphNode, lowered: &str) -> bool {
  node.label.to_lowercase().contains(lowered)
}

fn value_matches(value: &Value, term: &str, lowered: &str) -> bool {
  match value {
    Value::String(s) => s.to_lowercase().contains(lowered),
    Value::Object(map) => map
      .values()
      .any(|v| display_value(v).to_lowercase().contains(lowered)),
    Value::Array(items) => items
      .iter()
      .any(|v| display_value(v).to_lowercase().contains(lowered)),
    other => display_value(other).contains(term),
  }
}
