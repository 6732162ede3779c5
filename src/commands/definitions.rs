//! `crd-graph definitions` - List definitions and the fields a mapping can use

use crate::core::context::AppContext;
use crate::core::error::{NotFoundError, VizResult};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DefinitionRow<'a> {
  name: &'a str,
  kind: &'a str,
  api_version: String,
  scope: Option<&'a str>,
  cluster: &'a str,
  uid: Option<&'a str>,
  instances: usize,
}

/// Run the definitions command
pub fn run_definitions(ctx: &AppContext, json: bool) -> VizResult<()> {
  let clusters = &ctx.config.clusters;

  let rows: Vec<DefinitionRow> = ctx
    .store
    .definitions()
    .iter()
    .map(|d| DefinitionRow {
      name: &d.metadata.name,
      kind: d.kind_name(),
      api_version: d.served_api_version(),
      scope: d.spec.scope.as_deref(),
      cluster: d.cluster(&clusters.annotation, &clusters.default_label),
      uid: d.uid(),
      instances: ctx
        .store
        .instances()
        .iter()
        .filter(|i| d.matches(&i.kind, &i.api_version))
        .count(),
    })
    .collect();

  if json {
    println!("{}", serde_json::to_string_pretty(&rows)?);
    return Ok(());
  }

  if rows.is_empty() {
    println!("No definitions found");
    return Ok(());
  }

  println!(
    "{:<16} {:<32} {:<12} {:>9}  {}",
    "KIND", "API VERSION", "CLUSTER", "INSTANCES", "UID"
  );
  for row in &rows {
    println!(
      "{:<16} {:<32} {:<12} {:>9}  {}",
      row.kind,
      row.api_version,
      row.cluster,
      row.instances,
      row.uid.unwrap_or("-")
    );
  }
  Ok(())
}

/// Run `definitions fields <KIND>`: paths usable as mapping source/target fields
pub fn run_definition_fields(ctx: &AppContext, kind: String) -> VizResult<()> {
  let definition = ctx
    .store
    .definitions()
    .iter()
    .find(|d| d.kind_name() == kind)
    .ok_or_else(|| NotFoundError::Kind { kind: kind.clone() })?;

  for field in definition.mappable_fields() {
    println!("{}", field);
  }
  Ok(())
}
