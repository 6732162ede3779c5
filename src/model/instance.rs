use super::meta::ObjectMeta;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A concrete custom resource object.
///
/// `fields` holds every top-level key other than the identity triple
/// (`spec`, `status`, `data`, ...), kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceInstance {
  pub api_version: String,

  pub kind: String,

  #[serde(default)]
  pub metadata: ObjectMeta,

  #[serde(flatten)]
  pub fields: Map<String, Value>,
}

impl ResourceInstance {
  pub fn name(&self) -> &str {
    &self.metadata.name
  }

  pub fn namespace(&self) -> Option<&str> {
    self.metadata.namespace.as_deref()
  }

  pub fn uid(&self) -> Option<&str> {
    self.metadata.uid()
  }

  pub fn cluster<'a>(&'a self, annotation: &str, default: &'a str) -> &'a str {
    self.metadata.cluster(annotation, default)
  }

  /// Whole object as a JSON document, for path lookups and raw views.
  pub fn to_document(&self) -> Value {
    serde_json::to_value(self).unwrap_or_default()
  }

  /// `Kind:namespace:name:cluster`, with `cluster` standing in for a missing namespace.
  pub fn identity_key(&self, cluster: &str) -> String {
    identity_key(&self.kind, self.namespace(), &self.metadata.name, cluster)
  }
}

pub fn identity_key(kind: &str, namespace: Option<&str>, name: &str, cluster: &str) -> String {
  format!("{}:{}:{}:{}", kind, namespace.unwrap_or("cluster"), name, cluster)
}
