//! Built-in demo dataset, used until something is saved and restored by `reset`

use super::state::Snapshot;
use crate::core::error::{ResultExt, VizResult};

const SEED: &str = include_str!("../../demo/seed.json");

pub fn seed() -> VizResult<Snapshot> {
  serde_json::from_str::<Snapshot>(SEED).context("Built-in demo dataset is malformed")
}
