//! Import, export and reset

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_import_yaml_documents_merges_into_demo() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_file("widgets.yaml", WIDGETS_YAML)?;

  let stdout = workspace.stdout(&["import", "widgets.yaml"])?;
  assert!(stdout.contains("Imported 1 definitions"), "stdout:\n{}", stdout);
  assert!(stdout.contains("2 instances"));

  let state = workspace.saved_state()?;
  assert_eq!(state["crds"].as_array().map(Vec::len), Some(9));
  assert_eq!(state["customResources"].as_array().map(Vec::len), Some(27));

  let rows = workspace.json(&["list", "--kind", "Widget", "--json"])?;
  let rows = rows.as_array().expect("rows");
  assert_eq!(rows.len(), 2);
  assert_eq!(rows[0]["uid"], "widget-1");
  assert_eq!(rows[0]["cluster"], "edge");
  // documents without a uid get one on import
  assert!(rows[1]["uid"].as_str().is_some_and(|uid| !uid.is_empty()));
  assert_ne!(rows[1]["uid"], rows[0]["uid"]);

  let graph = workspace.json(&["graph", "--kind", "Widget", "--format", "json"])?;
  let edges = edge_ids(&graph);
  assert!(edges.contains(&"edge:defines:crd:widgets.example.io->resource:Widget:tools:gizmo:edge".to_string()));
  assert!(edges.contains(
    &"edge:references:resource:Widget:tools:gizmo:edge->reference:Secret:gizmo-credentials:edge".to_string()
  ));
  Ok(())
}

#[test]
fn test_import_upserts_by_uid() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let updated = r#"{
    "apiVersion": "v1",
    "kind": "Service",
    "metadata": {
      "name": "frontend-svc",
      "namespace": "default",
      "uid": "svc-1",
      "annotations": { "cluster": "production" }
    },
    "spec": { "ports": [{ "port": 443 }] }
  }"#;
  workspace.write_file("svc.json", updated)?;

  let stdout = workspace.stdout(&["import", "svc.json"])?;
  assert!(stdout.contains("1 instances (1 updated)"), "stdout:\n{}", stdout);

  let raw = workspace.json(&["raw", "--kind", "Service", "--namespace", "default"])?;
  assert_eq!(raw[0]["metadata"]["uid"], "svc-1");
  assert_eq!(raw[0]["spec"]["ports"][0]["port"], 443);
  assert_eq!(raw.as_array().map(Vec::len), Some(2));
  Ok(())
}

#[test]
fn test_import_is_all_or_nothing() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_file(
    "broken.yaml",
    "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: fine\n---\napiVersion: v1\nmetadata:\n  name: no-kind\n",
  )?;

  let output = workspace.run_failing(&["import", "broken.yaml"])?;
  assert_eq!(output.status.code(), Some(3));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Document #2"), "stderr:\n{}", stderr);
  assert!(stderr.contains("'kind'"));

  // nothing was saved, not even the valid first document
  assert!(!workspace.file_exists(".crd-graph/state.json"));
  let rows = workspace.json(&["list", "--kind", "ConfigMap", "--json"])?;
  assert_eq!(rows.as_array().map(Vec::len), Some(2));
  Ok(())
}

#[test]
fn test_import_rejects_unparseable_and_empty_input() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_file("garbage.txt", "{ not: [valid")?;
  workspace.write_file("empty.yaml", "\n")?;

  let output = workspace.run_failing(&["import", "garbage.txt"])?;
  assert_eq!(output.status.code(), Some(3));

  let output = workspace.run_failing(&["import", "empty.yaml"])?;
  assert_eq!(output.status.code(), Some(3));

  let output = workspace.run_failing(&["import", "missing.yaml"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read"));
  Ok(())
}

#[test]
fn test_import_from_stdin() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let secret = r#"{"apiVersion": "v1", "kind": "Secret", "metadata": {"name": "piped", "namespace": "default"}}"#;

  let output = workspace.run_with_stdin(&["import", "-"], secret)?;
  assert!(String::from_utf8_lossy(&output.stdout).contains("1 instances"));

  let listing = workspace.stdout(&["list", "--kind", "Secret"])?;
  assert!(listing.contains("piped"));
  Ok(())
}

#[test]
fn test_export_reset_import_round_trip() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_file("widgets.yaml", WIDGETS_YAML)?;
  workspace.run(&["import", "widgets.yaml"])?;

  workspace.run(&["export"])?;
  assert!(workspace.file_exists("crd-graph-data.yaml"));
  let exported = workspace.read_file("crd-graph-data.yaml")?;
  assert!(exported.contains("customResources:"));
  assert!(exported.contains("widgets.example.io"));

  let stdout = workspace.stdout(&["reset"])?;
  assert!(stdout.contains("8 definitions, 25 instances"), "stdout:\n{}", stdout);
  assert_eq!(workspace.saved_state()?["crds"].as_array().map(Vec::len), Some(8));

  // a snapshot replaces the store instead of merging into it
  let stdout = workspace.stdout(&["import", "crd-graph-data.yaml"])?;
  assert!(stdout.contains("Replaced store contents: 9 definitions, 27 instances, 0 mappings"));

  let to_stdout = workspace.stdout(&["export", "--stdout"])?;
  assert_eq!(to_stdout, exported);
  Ok(())
}

#[test]
fn test_snapshot_must_be_alone() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_file(
    "mixed.yaml",
    "crds: []\ncustomResources: []\ncustomMappings: []\n---\napiVersion: v1\nkind: Secret\nmetadata:\n  name: s\n",
  )?;

  let output = workspace.run_failing(&["import", "mixed.yaml"])?;
  assert_eq!(output.status.code(), Some(3));
  assert!(!workspace.file_exists(".crd-graph/state.json"));
  Ok(())
}
