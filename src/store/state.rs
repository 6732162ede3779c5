//! Persisted store of definitions, instances and field mappings
//!
//! State lives in one JSON file holding an object keyed by the storage key:
//!
//! ```json
//! { "crd-graph-storage": { "crds": [], "customResources": [], "customMappings": [] } }
//! ```
//!
//! Other keys in the file are left untouched on write.

use super::demo;
use crate::core::error::{NotFoundError, ResultExt, VizResult};
use crate::model::{FieldMapping, ResourceDefinition, ResourceInstance};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// The three collections, in their persisted and exported shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
  #[serde(default)]
  pub crds: Vec<ResourceDefinition>,
  #[serde(default)]
  pub custom_resources: Vec<ResourceInstance>,
  #[serde(default)]
  pub custom_mappings: Vec<FieldMapping>,
}

/// Outcome of merging imported documents into the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeCounts {
  pub definitions_added: usize,
  pub definitions_updated: usize,
  pub instances_added: usize,
  pub instances_updated: usize,
}

pub struct ResourceStore {
  path: PathBuf,
  key: String,
  state: Snapshot,
  /// Loaded from the state file (false when seeded from the demo dataset)
  persisted: bool,
}

impl ResourceStore {
  /// Open the store at `path`, seeding from the demo dataset when there is no saved state.
  pub fn open(path: PathBuf, key: &str) -> VizResult<Self> {
    let saved = Self::read_saved(&path, key)?;
    let persisted = saved.is_some();
    let state = match saved {
      Some(state) => state,
      None => demo::seed()?,
    };

    tracing::debug!(
      path = %path.display(),
      persisted,
      definitions = state.crds.len(),
      instances = state.custom_resources.len(),
      "opened store"
    );

    Ok(Self {
      path,
      key: key.to_string(),
      state,
      persisted,
    })
  }

  fn read_saved(path: &Path, key: &str) -> VizResult<Option<Snapshot>> {
    if !path.exists() {
      return Ok(None);
    }

    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read state file {}", path.display()))?;
    let root: Value =
      serde_json::from_str(&content).with_context(|| format!("State file {} is not valid JSON", path.display()))?;

    match root.get(key) {
      Some(value) => {
        let state = Snapshot::deserialize(value)
          .with_context(|| format!("State file {} has a malformed '{}' entry", path.display(), key))?;
        Ok(Some(state))
      }
      None => Ok(None),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn is_persisted(&self) -> bool {
    self.persisted
  }

  pub fn definitions(&self) -> &[ResourceDefinition] {
    &self.state.crds
  }

  pub fn instances(&self) -> &[ResourceInstance] {
    &self.state.custom_resources
  }

  pub fn mappings(&self) -> &[FieldMapping] {
    &self.state.custom_mappings
  }

  /// All three collections.
  pub fn export(&self) -> &Snapshot {
    &self.state
  }

  // ==========================================================================
  // Definitions
  // ==========================================================================

  #[allow(dead_code)] // Store API, exercised in tests
  pub fn add_definition(&mut self, definition: ResourceDefinition) -> VizResult<()> {
    self.state.crds.push(definition);
    self.persist()
  }

  #[allow(dead_code)] // Store API, exercised in tests
  pub fn update_definition(&mut self, uid: &str, definition: ResourceDefinition) -> VizResult<()> {
    let slot = self
      .state
      .crds
      .iter_mut()
      .find(|d| d.uid() == Some(uid))
      .ok_or_else(|| NotFoundError::Definition { id: uid.to_string() })?;
    *slot = definition;
    self.persist()
  }

  pub fn delete_definition(&mut self, uid: &str) -> VizResult<ResourceDefinition> {
    let pos = self
      .state
      .crds
      .iter()
      .position(|d| d.uid() == Some(uid))
      .ok_or_else(|| NotFoundError::Definition { id: uid.to_string() })?;
    let removed = self.state.crds.remove(pos);
    self.persist()?;
    Ok(removed)
  }

  // ==========================================================================
  // Instances
  // ==========================================================================

  #[allow(dead_code)] // Store API, exercised in tests
  pub fn add_instance(&mut self, instance: ResourceInstance) -> VizResult<()> {
    self.state.custom_resources.push(instance);
    self.persist()
  }

  #[allow(dead_code)] // Store API, exercised in tests
  pub fn update_instance(&mut self, uid: &str, instance: ResourceInstance) -> VizResult<()> {
    let slot = self
      .state
      .custom_resources
      .iter_mut()
      .find(|r| r.uid() == Some(uid))
      .ok_or_else(|| NotFoundError::Instance { id: uid.to_string() })?;
    *slot = instance;
    self.persist()
  }

  pub fn delete_instance(&mut self, uid: &str) -> VizResult<ResourceInstance> {
    let pos = self
      .state
      .custom_resources
      .iter()
      .position(|r| r.uid() == Some(uid))
      .ok_or_else(|| NotFoundError::Instance { id: uid.to_string() })?;
    let removed = self.state.custom_resources.remove(pos);
    self.persist()?;
    Ok(removed)
  }

  // ==========================================================================
  // Mappings
  // ==========================================================================

  pub fn add_mapping(&mut self, mapping: FieldMapping) -> VizResult<()> {
    self.state.custom_mappings.push(mapping);
    self.persist()
  }

  pub fn delete_mapping(&mut self, id: &str) -> VizResult<FieldMapping> {
    let pos = self
      .state
      .custom_mappings
      .iter()
      .position(|m| m.id == id)
      .ok_or_else(|| NotFoundError::Mapping { id: id.to_string() })?;
    let removed = self.state.custom_mappings.remove(pos);
    self.persist()?;
    Ok(removed)
  }

  /// Id for a new mapping: `mapping-{unix millis}`, suffixed when taken.
  pub fn next_mapping_id(&self) -> String {
    let base = format!("mapping-{}", chrono::Utc::now().timestamp_millis());
    let taken = |id: &str| self.state.custom_mappings.iter().any(|m| m.id == id);

    if !taken(&base) {
      return base;
    }
    let mut n = 1;
    loop {
      let id = format!("{}-{}", base, n);
      if !taken(&id) {
        return id;
      }
      n += 1;
    }
  }

  // ==========================================================================
  // Bulk
  // ==========================================================================

  /// Upsert documents by uid: an existing uid is replaced in place, anything else appended.
  pub fn merge(
    &mut self,
    definitions: Vec<ResourceDefinition>,
    instances: Vec<ResourceInstance>,
  ) -> VizResult<MergeCounts> {
    let mut counts = MergeCounts::default();

    for definition in definitions {
      let existing = definition
        .uid()
        .and_then(|uid| self.state.crds.iter().position(|d| d.uid() == Some(uid)));
      match existing {
        Some(pos) => {
          self.state.crds[pos] = definition;
          counts.definitions_updated += 1;
        }
        None => {
          self.state.crds.push(definition);
          counts.definitions_added += 1;
        }
      }
    }

    for instance in instances {
      let existing = instance
        .uid()
        .and_then(|uid| self.state.custom_resources.iter().position(|r| r.uid() == Some(uid)));
      match existing {
        Some(pos) => {
          self.state.custom_resources[pos] = instance;
          counts.instances_updated += 1;
        }
        None => {
          self.state.custom_resources.push(instance);
          counts.instances_added += 1;
        }
      }
    }

    self.persist()?;
    Ok(counts)
  }

  /// Replace all three collections.
  pub fn replace_all(&mut self, snapshot: Snapshot) -> VizResult<()> {
    self.state = snapshot;
    self.persist()
  }

  /// Restore the demo dataset.
  pub fn reset(&mut self) -> VizResult<()> {
    self.state = demo::seed()?;
    self.persist()
  }

  fn persist(&mut self) -> VizResult<()> {
    let mut root = match fs::read_to_string(&self.path) {
      Ok(content) => match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => map,
        _ => {
          tracing::warn!(path = %self.path.display(), "overwriting unreadable state file");
          Map::new()
        }
      },
      Err(_) => Map::new(),
    };
    root.insert(self.key.clone(), serde_json::to_value(&self.state)?);

    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let content = serde_json::to_string_pretty(&Value::Object(root))?;
    fs::write(&self.path, content).with_context(|| format!("Failed to write state file {}", self.path.display()))?;

    self.persisted = true;
    tracing::info!(
      path = %self.path.display(),
      definitions = self.state.crds.len(),
      instances = self.state.custom_resources.len(),
      mappings = self.state.custom_mappings.len(),
      "saved store"
    );
    Ok(())
  }
}
