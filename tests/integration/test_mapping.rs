//! Field mappings from the command line

use crate::helpers::*;
use anyhow::Result;

const ROUTE_TO_SERVICE: &[&str] = &[
  "mapping",
  "add",
  "--name",
  "route-to-service",
  "--source-kind",
  "IngressRoute",
  "--source-field",
  "spec.routes[0].services[0].name",
  "--target-kind",
  "Service",
  "--target-field",
  "metadata.name",
  "--description",
  "Traefik routes to their backing services",
];

#[test]
fn test_mapping_add_list_delete() -> Result<()> {
  let workspace = TestWorkspace::new()?;

  let stdout = workspace.stdout(&["mapping", "list"])?;
  assert!(stdout.contains("No mappings defined"));

  let stdout = workspace.stdout(ROUTE_TO_SERVICE)?;
  assert!(stdout.contains("Added mapping 'route-to-service'"), "stdout:\n{}", stdout);

  let mappings = workspace.json(&["mapping", "list", "--json"])?;
  let mapping = &mappings[0];
  assert_eq!(mapping["name"], "route-to-service");
  assert_eq!(mapping["sourceApiVersion"], "traefik.containo.us/v1alpha1");
  assert_eq!(mapping["targetApiVersion"], "v1");
  let id = mapping["id"].as_str().expect("mapping id").to_string();
  assert!(id.starts_with("mapping-"));

  assert_eq!(workspace.saved_state()?["customMappings"].as_array().map(Vec::len), Some(1));

  workspace.run(&["mapping", "delete", &id])?;
  assert_eq!(workspace.saved_state()?["customMappings"].as_array().map(Vec::len), Some(0));

  let output = workspace.run_failing(&["mapping", "delete", &id])?;
  assert_eq!(output.status.code(), Some(1));
  Ok(())
}

#[test]
fn test_mapping_adds_graph_edges() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.run(ROUTE_TO_SERVICE)?;

  let graph = workspace.json(&["graph", "--format", "json"])?;
  let mapping_edges: Vec<&serde_json::Value> = graph["edges"]
    .as_array()
    .expect("edges")
    .iter()
    .filter(|e| e["relation"] == "mapping")
    .collect();

  let pairs: Vec<(&str, &str)> = mapping_edges
    .iter()
    .filter_map(|e| Some((e["source"].as_str()?, e["target"].as_str()?)))
    .collect();
  assert_eq!(
    pairs,
    vec![
      (
        "resource:IngressRoute:default:frontend-route:production",
        "resource:Service:default:frontend-svc:production"
      ),
      (
        "resource:IngressRoute:default:backend-route:production",
        "resource:Service:default:backend-svc:production"
      ),
      (
        "resource:IngressRoute:analytics:analytics-route:monitoring",
        "resource:Service:analytics:analytics-svc:monitoring"
      ),
    ]
  );
  assert!(mapping_edges.iter().all(|e| e["label"] == "route-to-service"));
  assert!(mapping_edges.iter().all(|e| e["crossCluster"] == false));
  Ok(())
}

#[test]
fn test_mapping_unknown_kind() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let output = workspace.run_failing(&[
    "mapping",
    "add",
    "--name",
    "nope",
    "--source-kind",
    "Gadget",
    "--source-field",
    "spec.x",
    "--target-kind",
    "Service",
    "--target-field",
    "metadata.name",
  ])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Gadget"));
  assert!(!workspace.file_exists(".crd-graph/state.json"));
  Ok(())
}

#[test]
fn test_definition_fields() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let definitions = workspace.json(&["definitions", "--json"])?;
  assert_eq!(definitions.as_array().map(Vec::len), Some(8));

  let fields = workspace.stdout(&["definitions", "fields", "Application"])?;
  assert!(fields.lines().any(|l| l.trim() == "metadata.name"), "fields:\n{}", fields);
  Ok(())
}
