//! `crd-graph search` and `chain` - Find nodes and walk their dependencies

use crate::core::context::{AppContext, InstanceFilter};
use crate::core::error::VizResult;
use crate::graph::{GraphNode, LinkDirection, SearchMode, search};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NodeSummary<'a> {
  id: &'a str,
  label: &'a str,
  kind: &'a str,
  namespace: Option<&'a str>,
  cluster: &'a str,
  node_type: &'static str,
}

impl<'a> From<&'a GraphNode> for NodeSummary<'a> {
  fn from(node: &'a GraphNode) -> Self {
    Self {
      id: &node.id,
      label: &node.label,
      kind: &node.kind,
      namespace: node.namespace.as_deref(),
      cluster: &node.cluster,
      node_type: node.node_type.as_str(),
    }
  }
}

fn print_nodes(nodes: &[&GraphNode], json: bool, empty: &str) -> VizResult<()> {
  if json {
    let summaries: Vec<NodeSummary> = nodes.iter().map(|n| NodeSummary::from(*n)).collect();
    println!("{}", serde_json::to_string_pretty(&summaries)?);
    return Ok(());
  }

  if nodes.is_empty() {
    println!("{}", empty);
    return Ok(());
  }
  for node in nodes {
    println!("  {:<10} {} [{}]", node.node_type.as_str(), node.id, node.cluster);
  }
  Ok(())
}

/// Run the search command
pub fn run_search(
  ctx: &AppContext,
  term: String,
  mode: String,
  field: Option<String>,
  no_connected: bool,
  json: bool,
) -> VizResult<()> {
  let mode = SearchMode::from_args(&mode, field.as_deref(), !no_connected)?;
  let graph = ctx.graph(InstanceFilter::default());

  let results = search(&graph, &term, &mode);
  tracing::debug!(term = %term, results = results.len(), "search finished");

  if !json {
    println!("Found {} nodes", results.len());
  }
  print_nodes(&results, json, "No matching nodes")
}

/// Run the chain command
pub fn run_chain(ctx: &AppContext, node_id: String, direction: String, json: bool) -> VizResult<()> {
  let direction = LinkDirection::parse(&direction)?;
  let graph = ctx.graph(InstanceFilter::default());

  let chain = graph.dependency_chain(&node_id, direction)?;

  if !json
    && let Some(start) = graph.node(&node_id)
  {
    println!("Dependency chain of {} {} ({} nodes)", start.kind, start.label, chain.len());
  }
  print_nodes(&chain, json, "No dependencies")
}
