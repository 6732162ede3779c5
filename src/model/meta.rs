use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Object metadata shared by definitions and instances.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
  #[serde(default)]
  pub name: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub namespace: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub uid: Option<String>,

  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub labels: BTreeMap<String, String>,

  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub annotations: BTreeMap<String, String>,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub owner_references: Vec<OwnerReference>,

  /// Everything else (creationTimestamp, generation, ...)
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl ObjectMeta {
  /// Cluster label from the given annotation, or `default` when absent or blank.
  pub fn cluster<'a>(&'a self, annotation: &str, default: &'a str) -> &'a str {
    match self.annotations.get(annotation) {
      Some(label) if !label.trim().is_empty() => label,
      _ => default,
    }
  }

  pub fn uid(&self) -> Option<&str> {
    self.uid.as_deref().filter(|u| !u.is_empty())
  }
}

/// A declared parent-object link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReference {
  #[serde(default)]
  pub api_version: String,

  pub kind: String,

  pub name: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub uid: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub controller: Option<bool>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub block_owner_deletion: Option<bool>,
}
