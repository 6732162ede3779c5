//! `crd-graph graph` - Show the inferred relationship graph
//!
//! Nodes are printed lane by lane (definitions, instances, references), followed
//! by every edge. Cross-cluster edges are marked and listed per source node.

use crate::core::context::{AppContext, InstanceFilter};
use crate::core::error::{VizError, VizResult};
use crate::graph::{NodeType, ResourceGraph};

/// Output format for the graph command
#[derive(Debug, Clone, Copy)]
enum OutputFormat {
  Text,
  Json,
  Dot,
}

impl OutputFormat {
  fn from_str(s: &str) -> VizResult<Self> {
    match s.to_lowercase().as_str() {
      "text" => Ok(Self::Text),
      "json" => Ok(Self::Json),
      "dot" | "graphviz" => Ok(Self::Dot),
      _ => Err(VizError::message(format!(
        "Unknown format '{}'. Valid formats: text, json, dot",
        s
      ))),
    }
  }
}

/// Run the graph command
pub fn run_graph(ctx: &AppContext, kind: Option<String>, namespace: Option<String>, format: String) -> VizResult<()> {
  let output_format = OutputFormat::from_str(&format)?;
  let filter = InstanceFilter {
    kind: kind.as_deref(),
    namespace: namespace.as_deref(),
  };

  let graph = ctx.graph(filter);

  match output_format {
    OutputFormat::Text => display_text(&graph),
    OutputFormat::Json => {
      println!("{}", serde_json::to_string_pretty(&graph.view())?);
      Ok(())
    }
    OutputFormat::Dot => {
      println!("{}", graph.to_dot());
      Ok(())
    }
  }
}

fn display_text(graph: &ResourceGraph) -> VizResult<()> {
  let summary = graph.summary();

  println!("Relationship Graph ({} nodes)", graph.node_count());
  println!("==================");
  println!();
  let clusters: Vec<&str> = summary.clusters.iter().map(String::as_str).collect();
  println!("Clusters: {}", clusters.join(", "));
  println!();

  for (node_type, heading, count) in [
    (NodeType::Definition, "Definitions", summary.definitions),
    (NodeType::Instance, "Instances", summary.instances),
    (NodeType::Reference, "References (not in store)", summary.references),
  ] {
    println!("{}: {}", heading, count);
    for node in graph.nodes().filter(|n| n.node_type == node_type) {
      let marker = if node.has_cross_cluster_dependencies { " ⇄" } else { "" };
      println!("  {} [{}]{}", node.id, node.cluster, marker);
    }
    println!();
  }

  println!("Edges: {} ({} cross-cluster)", summary.edges, summary.cross_cluster_edges);
  for edge in graph.edges() {
    let marker = if edge.cross_cluster { "  (cross-cluster)" } else { "" };
    println!("  {} --{}--> {}{}", edge.source, edge.label, edge.target, marker);
  }

  let crossing: Vec<_> = graph.nodes().filter(|n| n.has_cross_cluster_dependencies).collect();
  if !crossing.is_empty() {
    println!();
    println!("Cross-cluster dependencies:");
    for node in crossing {
      println!("  {}", node.key);
      for dep in &node.cross_cluster_dependencies {
        println!("    → {}", dep);
      }
    }
  }

  Ok(())
}
