use super::meta::ObjectMeta;
use super::{DEFINITION_KIND, api_group, is_core_group};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A CustomResourceDefinition document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDefinition {
  pub api_version: String,

  #[serde(default = "default_definition_kind")]
  pub kind: String,

  #[serde(default)]
  pub metadata: ObjectMeta,

  pub spec: DefinitionSpec,

  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

fn default_definition_kind() -> String {
  DEFINITION_KIND.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionSpec {
  #[serde(default)]
  pub group: String,

  pub names: DefinitionNames,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub scope: Option<String>,

  #[serde(default)]
  pub versions: Vec<DefinitionVersion>,

  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionNames {
  pub kind: String,

  #[serde(default)]
  pub plural: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub singular: Option<String>,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub short_names: Vec<String>,

  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionVersion {
  pub name: String,

  #[serde(default)]
  pub served: bool,

  #[serde(default)]
  pub storage: bool,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub schema: Option<Value>,

  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// Fields offered for every kind even when the schema does not list them
const COMMON_FIELDS: [&str; 3] = ["metadata.name", "metadata.namespace", "metadata.labels"];

impl ResourceDefinition {
  pub fn kind_name(&self) -> &str {
    &self.spec.names.kind
  }

  pub fn uid(&self) -> Option<&str> {
    self.metadata.uid()
  }

  /// First listed version; the one instances and mappings are keyed on.
  pub fn primary_version(&self) -> Option<&DefinitionVersion> {
    self.spec.versions.first()
  }

  /// `group/version` served by this definition (`version` alone for the core group).
  pub fn served_api_version(&self) -> String {
    let version = self.primary_version().map(|v| v.name.as_str()).unwrap_or_default();
    if is_core_group(&self.spec.group) {
      version.to_string()
    } else if version.is_empty() {
      self.spec.group.clone()
    } else {
      format!("{}/{}", self.spec.group, version)
    }
  }

  /// Does an instance of `kind` at `api_version` belong to this definition?
  pub fn matches(&self, kind: &str, api_version: &str) -> bool {
    if self.spec.names.kind != kind {
      return false;
    }
    let group = api_group(api_version);
    if is_core_group(&self.spec.group) {
      is_core_group(group)
    } else {
      self.spec.group == group
    }
  }

  pub fn cluster<'a>(&'a self, annotation: &str, default: &'a str) -> &'a str {
    self.metadata.cluster(annotation, default)
  }

  /// Field paths usable on either side of a mapping.
  ///
  /// Top-level `spec` and `metadata` properties of the primary version's
  /// schema, followed by the common metadata fields.
  pub fn mappable_fields(&self) -> Vec<String> {
    let mut fields = Vec::new();

    if let Some(schema) = self
      .primary_version()
      .and_then(|v| v.schema.as_ref())
      .and_then(|s| s.get("openAPIV3Schema"))
    {
      for section in ["spec", "metadata"] {
        if let Some(props) = schema
          .pointer(&format!("/properties/{}/properties", section))
          .and_then(Value::as_object)
        {
          fields.extend(props.keys().map(|key| format!("{}.{}", section, key)));
        }
      }
    }

    for common in COMMON_FIELDS {
      if !fields.iter().any(|f| f == common) {
        fields.push(common.to_string());
      }
    }

    fields
  }
}
