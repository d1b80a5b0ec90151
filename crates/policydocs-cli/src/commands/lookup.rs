//! Read-only record lookups, printed as JSON to stdout.

use policydocs_store::{PolicyDocStore, RedbStore};

pub fn hostname(store: &RedbStore, site_id: &str, env: &str, hostname: &str) -> anyhow::Result<()> {
    let doc = store.read_hostname(site_id, env, hostname)?;
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

pub fn hostname_metadata(
    store: &RedbStore,
    site_id: &str,
    env: &str,
    hostname: &str,
) -> anyhow::Result<()> {
    let doc = store.read_hostname_metadata(site_id, env, hostname)?;
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

pub fn edge_logic(
    store: &RedbStore,
    site_id: &str,
    env: &str,
    hostname: &str,
) -> anyhow::Result<()> {
    let doc = store.read_edge_logic(site_id, env, hostname)?;
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
