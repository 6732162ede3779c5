//! Resource model: definitions, instances, field mappings
//!
//! All types deserialize from the Kubernetes wire shape (camelCase keys) and keep
//! unknown fields verbatim so an export/import round trip is lossless.

pub mod definition;
pub mod instance;
pub mod mapping;
pub mod meta;
pub mod path;

pub use definition::ResourceDefinition;
pub use instance::{ResourceInstance, identity_key};
pub use mapping::FieldMapping;
pub use meta::OwnerReference;
pub use path::FieldPath;

/// Kind of a definition document
pub const DEFINITION_KIND: &str = "CustomResourceDefinition";

/// API group of an `apiVersion` string.
///
/// `apps/v1` -> `apps`; core versions without a slash (`v1`) -> `""`.
pub fn api_group(api_version: &str) -> &str {
  match api_version.split_once('/') {
    Some((group, _)) => group,
    None => "",
  }
}

/// The core API group is spelled either `""` or `"core"`.
pub fn is_core_group(group: &str) -> bool {
  group.is_empty() || group == "core"
}
