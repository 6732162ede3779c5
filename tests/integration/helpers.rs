//! Test helpers for integration tests

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// An empty working directory; the store starts out as the demo dataset
pub struct TestWorkspace {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestWorkspace {
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    Ok(Self { _root: root, path })
  }

  /// Write a file relative to the workspace
  pub fn write_file(&self, path: &str, content: &str) -> Result<PathBuf> {
    let file_path = self.path.join(path);
    if let Some(parent) = file_path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&file_path, content)?;
    Ok(file_path)
  }

  /// Check if a file exists
  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  /// Read a file
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  /// Saved state under the default storage key
  pub fn saved_state(&self) -> Result<Value> {
    let raw: Value = serde_json::from_str(&self.read_file(".crd-graph/state.json")?)?;
    raw
      .get("crd-graph-storage")
      .cloned()
      .context("state file has no crd-graph-storage entry")
  }

  /// Run crd-graph, failing on a non-zero exit
  pub fn run(&self, args: &[&str]) -> Result<Output> {
    run_crd_graph(&self.path, args)
  }

  /// Run crd-graph and return stdout
  pub fn stdout(&self, args: &[&str]) -> Result<String> {
    let output = self.run(args)?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
  }

  /// Run crd-graph and parse stdout as JSON
  pub fn json(&self, args: &[&str]) -> Result<Value> {
    let stdout = self.stdout(args)?;
    serde_json::from_str(&stdout).with_context(|| format!("stdout is not JSON:\n{}", stdout))
  }

  /// Run crd-graph expecting failure
  pub fn run_failing(&self, args: &[&str]) -> Result<Output> {
    let output = command(&self.path, args).output().context("Failed to run crd-graph")?;
    if output.status.success() {
      anyhow::bail!(
        "crd-graph {} unexpectedly succeeded\nstdout: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stdout)
      );
    }
    Ok(output)
  }

  /// Run crd-graph with `stdin` piped in
  pub fn run_with_stdin(&self, args: &[&str], stdin: &str) -> Result<Output> {
    let mut child = command(&self.path, args)
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .spawn()
      .context("Failed to spawn crd-graph")?;

    child
      .stdin
      .take()
      .context("stdin not captured")?
      .write_all(stdin.as_bytes())?;

    let output = child.wait_with_output()?;
    if !output.status.success() {
      anyhow::bail!(
        "crd-graph {} failed\nstderr: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
      );
    }
    Ok(output)
  }
}

fn command(cwd: &Path, args: &[&str]) -> Command {
  let mut cmd = Command::new(env!("CARGO_BIN_EXE_crd-graph"));
  cmd.current_dir(cwd).args(args).env_remove("CRD_GRAPH_LOG");
  cmd
}

/// Run crd-graph binary
pub fn run_crd_graph(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = command(cwd, args).output().context("Failed to run crd-graph")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "crd-graph command failed: crd-graph {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Ids of the edges in `graph --format json` output
pub fn edge_ids(graph: &Value) -> Vec<String> {
  graph["edges"]
    .as_array()
    .map(|edges| {
      edges
        .iter()
        .filter_map(|e| e["id"].as_str().map(String::from))
        .collect()
    })
    .unwrap_or_default()
}

pub const WIDGETS_YAML: &str = r#"apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: widgets.example.io
  uid: crd-widgets
  annotations:
    cluster: edge
spec:
  group: example.io
  names:
    kind: Widget
    plural: widgets
  scope: Namespaced
  versions:
    - name: v1
      served: true
      storage: true
      schema:
        openAPIV3Schema:
          type: object
          properties:
            spec:
              type: object
              properties:
                team:
                  type: string
                secretRef:
                  type: object
---
apiVersion: example.io/v1
kind: Widget
metadata:
  name: gizmo
  namespace: tools
  uid: widget-1
  annotations:
    cluster: edge
spec:
  team: platform
  secretRef:
    name: gizmo-credentials
---
apiVersion: example.io/v1
kind: Widget
metadata:
  name: sprocket
  namespace: tools
  annotations:
    cluster: edge
spec:
  team: platform
"#;
