//! Application context - build once, pass everywhere
//!
//! ```text
//! main.rs:
//!   AppContext::build() -> &mut AppContext
//!   |
//!   v
//! commands/graph.rs, mapping.rs, etc:
//!   fn run_*(ctx: &AppContext, ...)
//! ```
//!
//! The relationship graph is not cached here: it is cheap to infer and every
//! mutating command changes its input.

use crate::core::config::VizConfig;
use crate::core::error::VizResult;
use crate::graph::{ResourceGraph, infer};
use crate::model::ResourceInstance;
use crate::store::ResourceStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Instance filter shared by the graph, list and raw views.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstanceFilter<'a> {
  /// Only instances of this kind
  pub kind: Option<&'a str>,
  /// Only instances in this namespace
  pub namespace: Option<&'a str>,
}

impl InstanceFilter<'_> {
  pub fn matches(&self, instance: &ResourceInstance) -> bool {
    self.kind.is_none_or(|k| instance.kind == k) && self.namespace.is_none_or(|ns| instance.namespace() == Some(ns))
  }
}

pub struct AppContext {
  /// Working directory the config and state are resolved against
  pub root: PathBuf,

  /// crd-graph.toml, or defaults
  pub config: Arc<VizConfig>,

  /// Persisted definitions, instances and mappings
  pub store: ResourceStore,
}

impl AppContext {
  /// Load config and open the store under `root`.
  pub fn build(root: &Path) -> VizResult<Self> {
    let root = root.to_path_buf();
    let config = Arc::new(VizConfig::load(&root)?);
    let store = ResourceStore::open(config.state_path(&root), &config.store.key)?;

    Ok(Self { root, config, store })
  }

  /// Instances passing `filter`, in store order.
  pub fn filtered_instances(&self, filter: InstanceFilter<'_>) -> Vec<ResourceInstance> {
    self
      .store
      .instances()
      .iter()
      .filter(|i| filter.matches(i))
      .cloned()
      .collect()
  }

  /// Graph over every definition and the instances passing `filter`.
  pub fn graph(&self, filter: InstanceFilter<'_>) -> ResourceGraph {
    let instances = self.filtered_instances(filter);
    infer(
      self.store.definitions(),
      &instances,
      self.store.mappings(),
      &self.config,
    )
  }

  /// Cluster label of an instance under the configured annotation.
  pub fn cluster_of<'a>(&'a self, instance: &'a ResourceInstance) -> &'a str {
    instance.cluster(&self.config.clusters.annotation, &self.config.clusters.default_label)
  }
}
