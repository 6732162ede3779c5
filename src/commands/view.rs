//! `crd-graph list`, `raw` and `namespaces` - Tabular and raw views of instances

use crate::core::context::{AppContext, InstanceFilter};
use crate::core::error::{NotFoundError, VizResult};
use serde::Serialize;
use std::collections::BTreeSet;

/// One row of the list view
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceRow {
  pub name: String,
  pub kind: String,
  pub namespace: Option<String>,
  pub api_version: String,
  pub cluster: String,
  pub uid: Option<String>,
  pub created: Option<String>,
}

/// Run the list command
pub fn run_list(ctx: &AppContext, kind: Option<String>, namespace: Option<String>, json: bool) -> VizResult<()> {
  let filter = InstanceFilter {
    kind: kind.as_deref(),
    namespace: namespace.as_deref(),
  };

  let rows: Vec<InstanceRow> = ctx
    .store
    .instances()
    .iter()
    .filter(|i| filter.matches(i))
    .map(|i| InstanceRow {
      name: i.name().to_string(),
      kind: i.kind.clone(),
      namespace: i.namespace().map(str::to_string),
      api_version: i.api_version.clone(),
      cluster: ctx.cluster_of(i).to_string(),
      uid: i.uid().map(str::to_string),
      created: i
        .metadata
        .extra
        .get("creationTimestamp")
        .and_then(|v| v.as_str())
        .map(str::to_string),
    })
    .collect();

  if json {
    println!("{}", serde_json::to_string_pretty(&rows)?);
    return Ok(());
  }

  if rows.is_empty() {
    println!("No resources found");
    return Ok(());
  }

  println!(
    "{:<28} {:<16} {:<14} {:<12} {}",
    "NAME", "KIND", "NAMESPACE", "CLUSTER", "UID"
  );
  for row in &rows {
    println!(
      "{:<28} {:<16} {:<14} {:<12} {}",
      row.name,
      row.kind,
      row.namespace.as_deref().unwrap_or("-"),
      row.cluster,
      row.uid.as_deref().unwrap_or("-")
    );
  }

  Ok(())
}

/// Run the raw command: the filtered instances as pretty JSON
pub fn run_raw(ctx: &AppContext, kind: Option<String>, namespace: Option<String>) -> VizResult<()> {
  let instances = ctx.filtered_instances(InstanceFilter {
    kind: kind.as_deref(),
    namespace: namespace.as_deref(),
  });
  println!("{}", serde_json::to_string_pretty(&instances)?);
  Ok(())
}

/// Run the namespaces command: distinct namespaces used by a kind
pub fn run_namespaces(ctx: &AppContext, kind: String) -> VizResult<()> {
  let known = ctx.store.definitions().iter().any(|d| d.kind_name() == kind)
    || ctx.store.instances().iter().any(|i| i.kind == kind);
  if !known {
    return Err(NotFoundError::Kind { kind }.into());
  }

  let namespaces: BTreeSet<&str> = ctx
    .store
    .instances()
    .iter()
    .filter(|i| i.kind == kind)
    .filter_map(|i| i.namespace())
    .collect();

  for namespace in namespaces {
    println!("{}", namespace);
  }
  Ok(())
}
