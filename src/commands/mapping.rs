//! `crd-graph mapping` - Manage user-defined field mappings
//!
//! A mapping links instances of two kinds whose field values are equal. Source
//! and target API versions are taken from the definitions of the two kinds.

use crate::core::context::AppContext;
use crate::core::error::{NotFoundError, VizError, VizResult};
use crate::model::{FieldMapping, FieldPath, ResourceDefinition};

/// Arguments for `mapping add`
#[derive(Debug, Clone)]
pub struct NewMapping {
  pub name: String,
  pub source_kind: String,
  pub source_field: String,
  pub target_kind: String,
  pub target_field: String,
  pub description: Option<String>,
}

fn definition_for<'a>(ctx: &'a AppContext, kind: &str) -> VizResult<&'a ResourceDefinition> {
  ctx
    .store
    .definitions()
    .iter()
    .find(|d| d.kind_name() == kind)
    .ok_or_else(|| NotFoundError::Kind { kind: kind.to_string() }.into())
}

fn check_field(definition: &ResourceDefinition, field: &str, side: &str) -> VizResult<()> {
  if FieldPath::parse(field).is_empty() {
    return Err(VizError::message(format!("The {} field must not be empty", side)));
  }
  if !definition.mappable_fields().iter().any(|f| f == field) {
    tracing::warn!(
      kind = definition.kind_name(),
      field,
      "field is not declared in the definition schema"
    );
  }
  Ok(())
}

/// Build a mapping from CLI arguments and the known definitions.
pub fn build_mapping(ctx: &AppContext, args: NewMapping) -> VizResult<FieldMapping> {
  if args.name.trim().is_empty() {
    return Err(VizError::with_help(
      "Mapping name must not be empty",
      "pass --name, e.g. --name route-to-app",
    ));
  }

  let source = definition_for(ctx, &args.source_kind)?;
  let target = definition_for(ctx, &args.target_kind)?;
  check_field(source, &args.source_field, "source")?;
  check_field(target, &args.target_field, "target")?;

  Ok(FieldMapping {
    id: ctx.store.next_mapping_id(),
    name: args.name.trim().to_string(),
    source_api_version: source.served_api_version(),
    source_kind: args.source_kind,
    source_field: args.source_field,
    target_api_version: target.served_api_version(),
    target_kind: args.target_kind,
    target_field: args.target_field,
    description: args.description.filter(|d| !d.trim().is_empty()),
  })
}

/// Run `mapping add`
pub fn run_mapping_add(ctx: &mut AppContext, args: NewMapping) -> VizResult<()> {
  let mapping = build_mapping(ctx, args)?;
  let id = mapping.id.clone();
  let name = mapping.name.clone();
  ctx.store.add_mapping(mapping)?;

  println!("✅ Added mapping '{}' ({})", name, id);
  Ok(())
}

/// Run `mapping list`
pub fn run_mapping_list(ctx: &AppContext, json: bool) -> VizResult<()> {
  let mappings = ctx.store.mappings();

  if json {
    println!("{}", serde_json::to_string_pretty(mappings)?);
    return Ok(());
  }

  if mappings.is_empty() {
    println!("No mappings defined");
    return Ok(());
  }

  for mapping in mappings {
    println!("{}  {}", mapping.id, mapping.name);
    println!(
      "    {}.{} → {}.{}",
      mapping.source_kind, mapping.source_field, mapping.target_kind, mapping.target_field
    );
    if let Some(description) = &mapping.description {
      println!("    {}", description);
    }
  }
  Ok(())
}

/// Run `mapping delete`
pub fn run_mapping_delete(ctx: &mut AppContext, id: String) -> VizResult<()> {
  let removed = ctx.store.delete_mapping(&id)?;
  println!("🗑  Deleted mapping '{}' ({})", removed.name, removed.id);
  Ok(())
}
