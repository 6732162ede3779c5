use super::instance::ResourceInstance;
use super::{api_group, is_core_group};
use serde::{Deserialize, Serialize};

/// A user-declared equality rule between a field of one kind and a field of another.
///
/// Every pair of distinct instances (source kind, target kind) whose field values are
/// equal yields one graph edge labelled with `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
  pub id: String,
  pub name: String,
  pub source_kind: String,
  #[serde(default)]
  pub source_api_version: String,
  pub source_field: String,
  pub target_kind: String,
  #[serde(default)]
  pub target_api_version: String,
  pub target_field: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

impl FieldMapping {
  pub fn applies_to_source(&self, instance: &ResourceInstance) -> bool {
    instance.kind == self.source_kind && api_version_compatible(&instance.api_version, &self.source_api_version)
  }

  pub fn applies_to_target(&self, instance: &ResourceInstance) -> bool {
    instance.kind == self.target_kind && api_version_compatible(&instance.api_version, &self.target_api_version)
  }
}

/// Is an instance's `apiVersion` acceptable for the version recorded on a mapping?
///
/// - empty wanted version: anything
/// - `group/version`: exact match
/// - bare token: a core version (`v1`) or an API group name (`apps`)
fn api_version_compatible(actual: &str, wanted: &str) -> bool {
  if wanted.is_empty() {
    return true;
  }
  if wanted.contains('/') {
    return actual == wanted;
  }
  actual == wanted || (!is_core_group(wanted) && api_group(actual) == wanted)
}
