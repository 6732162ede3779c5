//! `crd-graph import`, `export` and `reset` - Move data in and out of the store

use crate::core::context::AppContext;
use crate::core::error::{ResultExt, VizResult};
use crate::store::transfer::{self, DEFAULT_EXPORT_FILE, ImportOutcome};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

/// Run the import command. `-` reads standard input.
pub fn run_import(ctx: &mut AppContext, source: String) -> VizResult<()> {
  let (content, source_name) = if source == "-" {
    let mut buf = String::new();
    io::stdin()
      .read_to_string(&mut buf)
      .context("Failed to read standard input")?;
    (buf, "standard input".to_string())
  } else {
    let path = PathBuf::from(&source);
    let path = if path.is_absolute() { path } else { ctx.root.join(path) };
    let content = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    (content, source)
  };

  match transfer::import(&mut ctx.store, &content, &source_name)? {
    ImportOutcome::Replaced {
      definitions,
      instances,
      mappings,
    } => {
      println!(
        "✅ Replaced store contents: {} definitions, {} instances, {} mappings",
        definitions, instances, mappings
      );
    }
    ImportOutcome::Merged(counts) => {
      println!(
        "✅ Imported {} definitions ({} updated) and {} instances ({} updated)",
        counts.definitions_added + counts.definitions_updated,
        counts.definitions_updated,
        counts.instances_added + counts.instances_updated,
        counts.instances_updated
      );
    }
  }
  Ok(())
}

/// Run the export command
pub fn run_export(ctx: &AppContext, output: Option<PathBuf>, stdout: bool) -> VizResult<()> {
  let yaml = transfer::export_yaml(ctx.store.export())?;

  if stdout {
    print!("{}", yaml);
    return Ok(());
  }

  let path = output.unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE));
  let path = if path.is_absolute() { path } else { ctx.root.join(path) };
  fs::write(&path, yaml).with_context(|| format!("Failed to write {}", path.display()))?;

  tracing::info!(path = %path.display(), "exported store");
  println!("✅ Exported to {}", path.display());
  Ok(())
}

/// Run the reset command: restore the demo dataset
pub fn run_reset(ctx: &mut AppContext) -> VizResult<()> {
  ctx.store.reset()?;
  println!(
    "✅ Restored demo data: {} definitions, {} instances",
    ctx.store.definitions().len(),
    ctx.store.instances().len()
  );
  Ok(())
}
