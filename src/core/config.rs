use crate::core::error::{ConfigError, ResultExt, VizResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for crd-graph
/// Searched in order: crd-graph.toml, .crd-graph.toml, .config/crd-graph.toml
/// Every section is optional; a missing file means all defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VizConfig {
  #[serde(default)]
  pub store: StoreConfig,
  #[serde(default)]
  pub clusters: ClusterConfig,
  #[serde(default)]
  pub layout: LayoutConfig,
  #[serde(default)]
  pub inference: InferenceConfig,
}

/// Where the persisted state lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
  /// Directory holding the state file, relative to the working directory (default: ".crd-graph")
  #[serde(default = "default_store_dir")]
  pub dir: PathBuf,

  /// Storage key the three collections are filed under (default: "crd-graph-storage")
  #[serde(default = "default_store_key")]
  pub key: String,
}

fn default_store_dir() -> PathBuf {
  PathBuf::from(".crd-graph")
}

fn default_store_key() -> String {
  "crd-graph-storage".to_string()
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self {
      dir: default_store_dir(),
      key: default_store_key(),
    }
  }
}

/// How cluster membership is read and coloured
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
  /// Annotation carrying the cluster label (default: "cluster")
  #[serde(default = "default_cluster_annotation")]
  pub annotation: String,

  /// Label used when the annotation is absent (default: "default")
  #[serde(default = "default_cluster_label")]
  pub default_label: String,

  /// Node colour per cluster label; unknown labels fall back to the "default" entry
  #[serde(default = "default_palette")]
  pub palette: BTreeMap<String, String>,
}

fn default_cluster_annotation() -> String {
  "cluster".to_string()
}

fn default_cluster_label() -> String {
  "default".to_string()
}

fn default_palette() -> BTreeMap<String, String> {
  [
    ("production", "#3b82f6"),
    ("monitoring", "#8b5cf6"),
    ("data", "#10b981"),
    ("default", "#94a3b8"),
  ]
  .into_iter()
  .map(|(k, v)| (k.to_string(), v.to_string()))
  .collect()
}

impl Default for ClusterConfig {
  fn default() -> Self {
    Self {
      annotation: default_cluster_annotation(),
      default_label: default_cluster_label(),
      palette: default_palette(),
    }
  }
}

impl ClusterConfig {
  pub fn color_for(&self, cluster: &str) -> String {
    self
      .palette
      .get(cluster)
      .or_else(|| self.palette.get("default"))
      .cloned()
      .unwrap_or_else(|| "#94a3b8".to_string())
  }
}

/// Three-lane placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
  #[serde(default = "default_definition_x")]
  pub definition_x: f64,
  #[serde(default = "default_instance_x")]
  pub instance_x: f64,
  #[serde(default = "default_reference_x")]
  pub reference_x: f64,
  /// Vertical distance between definition nodes (default: 400)
  #[serde(default = "default_definition_spacing")]
  pub definition_spacing: f64,
  /// Vertical distance between instance and reference nodes (default: 200)
  #[serde(default = "default_row_spacing")]
  pub row_spacing: f64,
}

fn default_definition_x() -> f64 {
  50.0
}

fn default_instance_x() -> f64 {
  450.0
}

fn default_reference_x() -> f64 {
  850.0
}

fn default_definition_spacing() -> f64 {
  400.0
}

fn default_row_spacing() -> f64 {
  200.0
}

impl Default for LayoutConfig {
  fn default() -> Self {
    Self {
      definition_x: default_definition_x(),
      instance_x: default_instance_x(),
      reference_x: default_reference_x(),
      definition_spacing: default_definition_spacing(),
      row_spacing: default_row_spacing(),
    }
  }
}

impl LayoutConfig {
  pub fn validate(&self) -> VizResult<()> {
    for (field, value) in [
      ("layout.definition_spacing", self.definition_spacing),
      ("layout.row_spacing", self.row_spacing),
    ] {
      if !value.is_finite() || value <= 0.0 {
        return Err(
          ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("must be a positive number (got {})", value),
          }
          .into(),
        );
      }
    }
    Ok(())
  }
}

/// Which relationship sources run besides definitions, owners and mappings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
  /// Follow the built-in reference fields (configMapRef, secretRef, serviceName, kafkaTopicRef)
  #[serde(default = "default_true")]
  pub well_known_refs: bool,

  /// Follow `spec.remoteWrite[].url` hosts into other clusters
  #[serde(default = "default_true")]
  pub remote_write: bool,

  /// Additional reference fields, applied after the built-in ones
  #[serde(default)]
  pub reference_rules: Vec<ReferenceRule>,
}

fn default_true() -> bool {
  true
}

impl Default for InferenceConfig {
  fn default() -> Self {
    Self {
      well_known_refs: true,
      remote_write: true,
      reference_rules: Vec::new(),
    }
  }
}

/// A field on an instance naming another object.
///
/// # Example
///
/// ```toml
/// [[inference.reference_rules]]
/// path = "spec.tls.secretName"
/// kind = "Secret"
/// api_version = "v1"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRule {
  /// Path of the referenced name (string or array of strings)
  pub path: String,
  /// Kind of the referenced object
  pub kind: String,
  /// apiVersion given to a placeholder node
  #[serde(default = "default_core_version")]
  pub api_version: String,
  /// Fixed namespace of the referenced object; defaults to the referrer's namespace
  #[serde(default)]
  pub namespace: Option<String>,
  /// Path of a field overriding the target's cluster label
  #[serde(default)]
  pub cluster_path: Option<String>,
  /// Edge label (default: "references")
  #[serde(default = "default_reference_label")]
  pub label: String,
}

fn default_core_version() -> String {
  "v1".to_string()
}

fn default_reference_label() -> String {
  "references".to_string()
}

impl ReferenceRule {
  pub fn new(path: &str, kind: &str, api_version: &str) -> Self {
    Self {
      path: path.to_string(),
      kind: kind.to_string(),
      api_version: api_version.to_string(),
      namespace: None,
      cluster_path: None,
      label: default_reference_label(),
    }
  }

  /// Reference fields recognised out of the box
  pub fn well_known() -> Vec<Self> {
    vec![
      Self::new("spec.configMapRef.name", "ConfigMap", "v1"),
      Self::new("spec.secretRef.name", "Secret", "v1"),
      Self::new("spec.serviceName", "Service", "v1"),
      Self {
        namespace: Some("kafka".to_string()),
        cluster_path: Some("spec.kafkaTopicRef.cluster".to_string()),
        ..Self::new("spec.kafkaTopicRef.name", "KafkaTopic", "kafka.strimzi.io/v1beta2")
      },
    ]
  }
}

impl InferenceConfig {
  /// Built-in rules (when enabled) followed by configured ones
  pub fn active_rules(&self) -> Vec<ReferenceRule> {
    let mut rules = if self.well_known_refs {
      ReferenceRule::well_known()
    } else {
      Vec::new()
    };
    rules.extend(self.reference_rules.iter().cloned());
    rules
  }

  pub fn validate(&self) -> VizResult<()> {
    for (i, rule) in self.reference_rules.iter().enumerate() {
      if rule.path.trim().is_empty() {
        return Err(
          ConfigError::EmptyField {
            field: format!("inference.reference_rules[{}].path", i),
          }
          .into(),
        );
      }
      if rule.kind.trim().is_empty() {
        return Err(
          ConfigError::EmptyField {
            field: format!("inference.reference_rules[{}].kind", i),
          }
          .into(),
        );
      }
    }
    Ok(())
  }
}

impl VizConfig {
  /// Find config file in search order: crd-graph.toml, .crd-graph.toml, .config/crd-graph.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("crd-graph.toml"),
      path.join(".crd-graph.toml"),
      path.join(".config").join("crd-graph.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config, falling back to defaults when no file exists
  pub fn load(path: &Path) -> VizResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: VizConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config
      .validate()
      .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
  }

  pub fn validate(&self) -> VizResult<()> {
    if self.store.key.trim().is_empty() {
      return Err(
        ConfigError::EmptyField {
          field: "store.key".to_string(),
        }
        .into(),
      );
    }
    if self.clusters.annotation.trim().is_empty() {
      return Err(
        ConfigError::EmptyField {
          field: "clusters.annotation".to_string(),
        }
        .into(),
      );
    }
    if self.clusters.default_label.trim().is_empty() {
      return Err(
        ConfigError::EmptyField {
          field: "clusters.default_label".to_string(),
        }
        .into(),
      );
    }
    self.layout.validate()?;
    self.inference.validate()
  }

  /// Path of the state file under `root`
  pub fn state_path(&self, root: &Path) -> PathBuf {
    root.join(&self.store.dir).join("state.json")
  }
}
