//! Idempotent startup seeding from a JSON file.
//!
//! Inserts go straight through the store, not the service, so seeding writes
//! no audit entries — the trail records user-driven mutations only.

use std::path::Path;

use patron_core::{customer::CustomerInput, store::CustomerStore};

/// Load `path` (a JSON array of customer objects) into an empty store.
///
/// Guarded by a count check: when the store already holds data the seed file
/// is skipped entirely, so repeated startups are no-ops.
pub async fn run<S: CustomerStore>(store: &S, path: &Path) -> anyhow::Result<()> {
  let existing = store
    .count()
    .await
    .map_err(Into::<patron_core::Error>::into)?;
  if existing > 0 {
    tracing::info!(existing, "store already has data, skipping seed");
    return Ok(());
  }

  let raw = std::fs::read_to_string(path)?;
  let inputs: Vec<CustomerInput> = serde_json::from_str(&raw)?;

  let mut seeded = 0usize;
  for input in &inputs {
    store
      .insert(&input.trimmed())
      .await
      .map_err(Into::<patron_core::Error>::into)?;
    seeded += 1;
  }

  tracing::info!(seeded, "seeded customers");
  Ok(())
}
