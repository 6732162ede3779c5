//! Graph views over the demo dataset

use crate::helpers::*;
use anyhow::Result;

const PROMETHEUS: &str = "resource:Prometheus:monitoring:cluster-monitoring:monitoring";
const GATEWAY: &str = "resource:Service:prometheus:prometheus-gateway:production";

#[test]
fn test_graph_text_summary() -> Result<()> {
  let workspace = TestWorkspace::new()?;

  let stdout = workspace.stdout(&["graph"])?;
  assert!(stdout.contains("Definitions: 8"), "stdout:\n{}", stdout);
  assert!(stdout.contains("Instances: 25"), "stdout:\n{}", stdout);
  assert!(stdout.contains("Cross-cluster dependencies:"));
  assert!(stdout.contains("reference:Deployment:nonexistent-deployment:data"));

  // viewing never writes state
  assert!(!workspace.file_exists(".crd-graph/state.json"));
  Ok(())
}

#[test]
fn test_graph_json_lanes_and_cross_cluster() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let graph = workspace.json(&["graph", "--format", "json"])?;

  let nodes = graph["nodes"].as_array().expect("nodes array");
  let types: Vec<&str> = nodes.iter().filter_map(|n| n["nodeType"].as_str()).collect();
  assert_eq!(types.iter().filter(|t| **t == "definition").count(), 8);
  assert!(types[..8].iter().all(|t| *t == "definition"));
  assert_eq!(types.last(), Some(&"reference"));

  // definitions sit in the first lane, instances in the second
  assert_eq!(nodes[0]["position"]["x"], 50.0);
  assert_eq!(nodes[1]["position"]["y"], 400.0);
  assert_eq!(nodes[8]["position"]["x"], 450.0);

  let remote_write = format!("edge:remoteWrite:{}->{}", PROMETHEUS, GATEWAY);
  let edge = graph["edges"]
    .as_array()
    .and_then(|edges| edges.iter().find(|e| e["id"] == remote_write.as_str()))
    .expect("remote write edge");
  assert_eq!(edge["crossCluster"], true);
  assert_eq!(edge["style"]["stroke"], "#f97316");
  assert_eq!(edge["style"]["dashed"], true);

  let prometheus = nodes.iter().find(|n| n["id"] == PROMETHEUS).expect("prometheus node");
  assert_eq!(prometheus["hasCrossClusterDependencies"], true);
  assert_eq!(prometheus["color"], "#8b5cf6");
  Ok(())
}

#[test]
fn test_graph_kind_filter() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let graph = workspace.json(&["graph", "--kind", "KafkaTopic", "--format", "json"])?;

  let instances: Vec<&str> = graph["nodes"]
    .as_array()
    .expect("nodes array")
    .iter()
    .filter(|n| n["nodeType"] == "instance")
    .filter_map(|n| n["kind"].as_str())
    .collect();
  assert_eq!(instances, vec!["KafkaTopic"; 4]);

  // the topic owned by a missing Kafka cluster still points at a placeholder
  assert!(
    edge_ids(&graph)
      .iter()
      .any(|id| id.ends_with("->reference:Kafka:missing-kafka-cluster:data"))
  );
  Ok(())
}

#[test]
fn test_graph_dot() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let dot = workspace.stdout(&["graph", "--format", "dot"])?;
  assert!(dot.starts_with("digraph"));
  assert!(dot.contains("remoteWrite"));
  Ok(())
}

#[test]
fn test_graph_is_deterministic() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let first = workspace.json(&["graph", "--format", "json"])?;
  let second = workspace.json(&["graph", "--format", "json"])?;
  assert_eq!(edge_ids(&first), edge_ids(&second));
  assert_eq!(first["nodes"], second["nodes"]);
  Ok(())
}

#[test]
fn test_unknown_format_is_user_error() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let output = workspace.run_failing(&["graph", "--format", "svg"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown format 'svg'"));
  Ok(())
}

#[test]
fn test_list_raw_and_namespaces() -> Result<()> {
  let workspace = TestWorkspace::new()?;

  let rows = workspace.json(&["list", "--kind", "Service", "--json"])?;
  let names: Vec<&str> = rows
    .as_array()
    .expect("rows")
    .iter()
    .filter_map(|r| r["name"].as_str())
    .collect();
  assert_eq!(names, vec!["frontend-svc", "backend-svc", "analytics-svc", "prometheus-gateway"]);

  let raw = workspace.json(&["raw", "--kind", "Service", "--namespace", "analytics"])?;
  assert_eq!(raw[0]["metadata"]["name"], "analytics-svc");
  assert_eq!(raw[0]["spec"]["ports"][0]["port"], 8080);

  let namespaces = workspace.stdout(&["namespaces", "Application"])?;
  let listed: Vec<&str> = namespaces.lines().collect();
  assert_eq!(listed, vec!["analytics", "database", "default", "logging"]);

  let output = workspace.run_failing(&["namespaces", "Gadget"])?;
  assert_eq!(output.status.code(), Some(1));
  Ok(())
}
