use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::core::config::VizConfig;
use crate::core::context::{AppContext, InstanceFilter};
use crate::core::error::VizResult;

/// Store and graph overview
#[derive(Debug, Clone, Serialize)]
pub struct StoreStatus {
  /// State file location
  pub state_file: PathBuf,

  /// Whether the state file exists (false: demo data in memory)
  pub persisted: bool,

  /// Config file in use, if any
  pub config_file: Option<PathBuf>,

  pub definitions: usize,
  pub instances: usize,
  pub mappings: usize,

  /// Instances per cluster label
  pub clusters: BTreeMap<String, usize>,

  /// Placeholder nodes for objects missing from the store
  pub references: usize,

  pub edges: usize,
  pub cross_cluster_edges: usize,
}

pub fn collect_status(ctx: &AppContext) -> StoreStatus {
  let mut clusters = BTreeMap::new();
  for instance in ctx.store.instances() {
    *clusters.entry(ctx.cluster_of(instance).to_string()).or_insert(0) += 1;
  }

  let summary = ctx.graph(InstanceFilter::default()).summary();

  StoreStatus {
    state_file: ctx.store.path().to_path_buf(),
    persisted: ctx.store.is_persisted(),
    config_file: VizConfig::find_config_path(&ctx.root),
    definitions: ctx.store.definitions().len(),
    instances: ctx.store.instances().len(),
    mappings: ctx.store.mappings().len(),
    clusters,
    references: summary.references,
    edges: summary.edges,
    cross_cluster_edges: summary.cross_cluster_edges,
  }
}

/// Run the status command
pub fn run_status(ctx: &AppContext, json: bool) -> VizResult<()> {
  let status = collect_status(ctx);

  if json {
    println!("{}", serde_json::to_string_pretty(&status)?);
    return Ok(());
  }

  println!("crd-graph status");
  println!("================");
  println!();
  if status.persisted {
    println!("State:    {}", status.state_file.display());
  } else {
    println!("State:    demo data (nothing saved yet)");
  }
  match &status.config_file {
    Some(path) => println!("Config:   {}", path.display()),
    None => println!("Config:   defaults"),
  }
  println!();
  println!("Definitions: {}", status.definitions);
  println!("Instances:   {}", status.instances);
  println!("Mappings:    {}", status.mappings);
  println!();
  println!("Clusters:");
  for (cluster, count) in &status.clusters {
    println!("  {:<14} {} instances", cluster, count);
  }
  println!();
  println!(
    "Graph: {} edges, {} cross-cluster, {} unresolved references",
    status.edges, status.cross_cluster_edges, status.references
  );

  Ok(())
}
