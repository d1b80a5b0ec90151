//! The `denormalize` command: run the full pipeline for one hostname.

use policydocs_core::paths::denormalized_path;
use policydocs_denorm::Denormalizer;
use policydocs_store::RedbStore;

pub fn run(store: &RedbStore, site_id: &str, env: &str, hostname: &str) -> anyhow::Result<()> {
    let denormalizer = Denormalizer::new(store.clone());
    let doc = denormalizer.denormalize(site_id, env, hostname)?;
    let path = denormalized_path(&doc.hostname)?;

    println!("{path}");
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
