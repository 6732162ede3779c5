//! Persistence, deletion and configuration

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_status_before_and_after_first_change() -> Result<()> {
  let workspace = TestWorkspace::new()?;

  let status = workspace.json(&["status", "--json"])?;
  assert_eq!(status["persisted"], false);
  assert_eq!(status["definitions"], 8);
  assert_eq!(status["instances"], 25);
  assert_eq!(status["mappings"], 0);
  assert_eq!(status["clusters"]["production"], 11);
  assert_eq!(status["clusters"]["monitoring"], 9);
  assert_eq!(status["clusters"]["data"], 5);
  assert!(status["cross_cluster_edges"].as_u64().is_some_and(|n| n > 0));
  assert!(status["config_file"].is_null());

  workspace.run(&["delete", "instance", "svc-4"])?;

  let status = workspace.json(&["status", "--json"])?;
  assert_eq!(status["persisted"], true);
  assert_eq!(status["instances"], 24);
  Ok(())
}

#[test]
fn test_deleted_service_becomes_placeholder() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let stdout = workspace.stdout(&["delete", "instance", "svc-4"])?;
  assert!(stdout.contains("Service prometheus-gateway"));

  let saved = workspace.saved_state()?;
  let uids: Vec<&str> = saved["customResources"]
    .as_array()
    .expect("instances")
    .iter()
    .filter_map(|i| i["metadata"]["uid"].as_str())
    .collect();
  assert!(!uids.contains(&"svc-4"));

  let graph = workspace.json(&["graph", "--format", "json"])?;
  assert!(edge_ids(&graph).contains(
    &"edge:remoteWrite:resource:Prometheus:monitoring:cluster-monitoring:monitoring->reference:Service:prometheus-gateway:production"
      .to_string()
  ));
  Ok(())
}

#[test]
fn test_delete_unknown_uid() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let output = workspace.run_failing(&["delete", "instance", "no-such-uid"])?;
  assert_eq!(output.status.code(), Some(1));

  let output = workspace.run_failing(&["delete", "definition", "no-such-uid"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(!workspace.file_exists(".crd-graph/state.json"));
  Ok(())
}

#[test]
fn test_delete_definition_keeps_instances() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.run(&["delete", "definition", "crd-4"])?;

  let status = workspace.json(&["status", "--json"])?;
  assert_eq!(status["definitions"], 7);
  assert_eq!(status["instances"], 25);

  let graph = workspace.json(&["graph", "--format", "json"])?;
  assert!(
    !edge_ids(&graph)
      .iter()
      .any(|id| id.starts_with("edge:defines:crd:kafkatopics.kafka.strimzi.io"))
  );
  Ok(())
}

#[test]
fn test_state_file_keeps_other_keys() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_file(".crd-graph/state.json", r#"{"theme": "dark"}"#)?;

  // no saved collections yet: still the demo data
  let status = workspace.json(&["status", "--json"])?;
  assert_eq!(status["instances"], 25);

  workspace.run(&["delete", "instance", "app-1"])?;

  let raw: serde_json::Value = serde_json::from_str(&workspace.read_file(".crd-graph/state.json")?)?;
  assert_eq!(raw["theme"], "dark");
  assert_eq!(raw["crd-graph-storage"]["customResources"].as_array().map(Vec::len), Some(24));
  Ok(())
}

#[test]
fn test_config_store_location_and_rules() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_file(
    "crd-graph.toml",
    r#"[store]
dir = "state"
key = "team-graph"

[[inference.reference_rules]]
path = "spec.descriptor.type"
kind = "Team"
label = "team"
"#,
  )?;

  let status = workspace.json(&["status", "--json"])?;
  assert!(
    status["config_file"]
      .as_str()
      .is_some_and(|p| p.ends_with("crd-graph.toml"))
  );

  let graph = workspace.json(&["graph", "--kind", "Application", "--format", "json"])?;
  assert!(edge_ids(&graph).contains(
    &"edge:references:resource:Application:default:frontend-app:production->reference:Team:frontend:production".to_string()
  ));

  workspace.run(&["delete", "instance", "app-1"])?;
  assert!(workspace.file_exists("state/state.json"));
  assert!(!workspace.file_exists(".crd-graph/state.json"));

  let raw: serde_json::Value = serde_json::from_str(&workspace.read_file("state/state.json")?)?;
  assert!(raw.get("team-graph").is_some());
  Ok(())
}

#[test]
fn test_invalid_config_is_user_error() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_file("crd-graph.toml", "[layout]\nrow_spacing = 0\n")?;

  let output = workspace.run_failing(&["status"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("layout.row_spacing"));
  Ok(())
}
