//! `crd-graph delete` - Remove a definition or instance by uid

use crate::core::context::AppContext;
use crate::core::error::VizResult;

/// Run `delete definition <UID>`
pub fn run_delete_definition(ctx: &mut AppContext, uid: String) -> VizResult<()> {
  let removed = ctx.store.delete_definition(&uid)?;
  println!("🗑  Deleted definition {} ({})", removed.metadata.name, uid);
  Ok(())
}

/// Run `delete instance <UID>`
pub fn run_delete_instance(ctx: &mut AppContext, uid: String) -> VizResult<()> {
  let removed = ctx.store.delete_instance(&uid)?;
  println!("🗑  Deleted {} {} ({})", removed.kind, removed.name(), uid);
  Ok(())
}
