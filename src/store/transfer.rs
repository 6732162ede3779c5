//! Import and export of store contents
//!
//! Import accepts JSON or multi-document YAML. Every document is checked before
//! the store is touched, so a bad document leaves the store unchanged.

use super::state::{MergeCounts, ResourceStore, Snapshot};
use crate::core::error::{ImportError, VizResult};
use crate::model::{DEFINITION_KIND, ResourceDefinition, ResourceInstance};
use serde::Deserialize;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};

/// Default export file name
pub const DEFAULT_EXPORT_FILE: &str = "crd-graph-data.yaml";

const SNAPSHOT_KEYS: [&str; 3] = ["crds", "customResources", "customMappings"];

/// Validated import content, ready to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportPlan {
  /// Full store contents; replaces everything
  Snapshot(Snapshot),
  /// Individual resources; upserted by uid
  Documents {
    definitions: Vec<ResourceDefinition>,
    instances: Vec<ResourceInstance>,
  },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
  Replaced {
    definitions: usize,
    instances: usize,
    mappings: usize,
  },
  Merged(MergeCounts),
}

/// Parse and validate `content` without touching any store.
pub fn parse_import(content: &str, source_name: &str) -> VizResult<ImportPlan> {
  let documents = split_documents(content, source_name)?;
  if documents.is_empty() {
    return Err(
      ImportError::Empty {
        source_name: source_name.to_string(),
      }
      .into(),
    );
  }

  if let Some(index) = documents.iter().position(is_snapshot) {
    if documents.len() > 1 {
      return Err(
        ImportError::Malformed {
          index,
          reason: "a full snapshot (crds/customResources/customMappings) must be the only document".to_string(),
        }
        .into(),
      );
    }
    let snapshot = Snapshot::deserialize(&documents[0]).map_err(|e| ImportError::Malformed {
      index: 0,
      reason: e.to_string(),
    })?;
    return Ok(ImportPlan::Snapshot(snapshot));
  }

  let stamp = chrono::Utc::now().timestamp_millis();
  let mut definitions = Vec::new();
  let mut instances = Vec::new();

  for (index, mut document) in documents.into_iter().enumerate() {
    let kind = required_field(&document, index, "kind")?;
    required_field(&document, index, "apiVersion")?;

    ensure_uid(&mut document, index, &kind, stamp)?;

    let malformed = |e: serde_json::Error| ImportError::Malformed {
      index,
      reason: e.to_string(),
    };
    if kind == DEFINITION_KIND {
      definitions.push(ResourceDefinition::deserialize(&document).map_err(malformed)?);
    } else {
      instances.push(ResourceInstance::deserialize(&document).map_err(malformed)?);
    }
  }

  Ok(ImportPlan::Documents { definitions, instances })
}

/// Apply a validated plan.
pub fn apply_import(store: &mut ResourceStore, plan: ImportPlan) -> VizResult<ImportOutcome> {
  match plan {
    ImportPlan::Snapshot(snapshot) => {
      let outcome = ImportOutcome::Replaced {
        definitions: snapshot.crds.len(),
        instances: snapshot.custom_resources.len(),
        mappings: snapshot.custom_mappings.len(),
      };
      store.replace_all(snapshot)?;
      Ok(outcome)
    }
    ImportPlan::Documents { definitions, instances } => Ok(ImportOutcome::Merged(store.merge(definitions, instances)?)),
  }
}

/// Parse, validate and apply in one step.
pub fn import(store: &mut ResourceStore, content: &str, source_name: &str) -> VizResult<ImportOutcome> {
  let plan = parse_import(content, source_name)?;
  let outcome = apply_import(store, plan)?;
  tracing::info!(source = source_name, ?outcome, "imported documents");
  Ok(outcome)
}

/// All three collections as YAML.
pub fn export_yaml(snapshot: &Snapshot) -> VizResult<String> {
  Ok(serde_yaml::to_string(snapshot)?)
}

/// JSON first, then multi-document YAML. Top-level arrays contribute their elements.
fn split_documents(content: &str, source_name: &str) -> VizResult<Vec<Value>> {
  let roots = match serde_json::from_str::<Value>(content) {
    Ok(value) => vec![value],
    Err(json_err) => {
      let mut roots = Vec::new();
      for document in serde_yaml::Deserializer::from_str(content) {
        let value = Value::deserialize(document).map_err(|yaml_err| {
          tracing::debug!(%json_err, "content is not JSON");
          ImportError::Parse {
            source_name: source_name.to_string(),
            reason: yaml_err.to_string(),
          }
        })?;
        roots.push(value);
      }
      roots
    }
  };

  let mut documents = Vec::new();
  for root in roots {
    match root {
      Value::Null => {}
      Value::Array(items) => documents.extend(items),
      other => documents.push(other),
    }
  }
  Ok(documents)
}

fn is_snapshot(document: &Value) -> bool {
  document
    .as_object()
    .is_some_and(|map| SNAPSHOT_KEYS.iter().any(|k| map.contains_key(*k)))
}

fn required_field(document: &Value, index: usize, field: &'static str) -> Result<String, ImportError> {
  let map = document.as_object().ok_or(ImportError::NotAnObject { index })?;
  match map.get(field).and_then(Value::as_str).map(str::trim) {
    Some(value) if !value.is_empty() => Ok(value.to_string()),
    _ => Err(ImportError::MissingField { index, field }),
  }
}

/// Give a document without `metadata.uid` a synthetic one.
fn ensure_uid(document: &mut Value, index: usize, kind: &str, stamp: i64) -> Result<(), ImportError> {
  let Some(map) = document.as_object_mut() else {
    return Err(ImportError::NotAnObject { index });
  };
  let metadata = map.entry("metadata").or_insert_with(|| json!({}));
  let Some(metadata) = metadata.as_object_mut() else {
    return Err(ImportError::Malformed {
      index,
      reason: "'metadata' must be an object".to_string(),
    });
  };

  match metadata.get("uid") {
    Some(Value::String(uid)) if !uid.is_empty() => Ok(()),
    None | Some(Value::Null) | Some(Value::String(_)) => {
      let name = metadata.get("name").and_then(Value::as_str).unwrap_or_default();
      let uid = synthetic_uid(kind, stamp, &format!("{}#{}", name, index));
      metadata.insert("uid".to_string(), Value::String(uid));
      Ok(())
    }
    Some(other) => Err(ImportError::Malformed {
      index,
      reason: format!("'metadata.uid' must be a string (got {})", other),
    }),
  }
}

/// `{kind lowercase}-{unix millis}-{7 hex chars}`
pub fn synthetic_uid(kind: &str, stamp: i64, seed: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(kind.as_bytes());
  hasher.update(stamp.to_le_bytes());
  hasher.update(seed.as_bytes());
  let digest = hasher.finalize();

  let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
  format!("{}-{}-{}", kind.to_lowercase(), stamp, &hex[..7])
}
