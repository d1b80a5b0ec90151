//! The `seed` command: load normalized fixture records into the store.
//!
//! The authoring system that owns the normalized records is external; this
//! gives the embedded store a local writer for development and smoke tests.
//!
//! Fixture format:
//!
//! ```json
//! {
//!   "hostnames": [
//!     {"site_id": "s1", "env": "dev", "hostname": "a.com", "doc": {"verified": true}}
//!   ],
//!   "hostname_metadata": [ ... ],
//!   "edge_logic": [ ... ]
//! }
//! ```

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::info;

use policydocs_core::types::{EdgeLogic, Hostname, HostnameMetadata};
use policydocs_store::RedbStore;

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    hostnames: Vec<SeedEntry<Hostname>>,
    #[serde(default)]
    hostname_metadata: Vec<SeedEntry<HostnameMetadata>>,
    #[serde(default)]
    edge_logic: Vec<SeedEntry<EdgeLogic>>,
}

#[derive(Debug, Deserialize)]
struct SeedEntry<T> {
    site_id: String,
    env: String,
    hostname: String,
    doc: T,
}

pub fn run(store: &RedbStore, file: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read fixture file {}", file.display()))?;
    let fixture: SeedFile = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse fixture file {}", file.display()))?;

    for entry in &fixture.hostnames {
        store.put_hostname(&entry.site_id, &entry.env, &entry.hostname, &entry.doc)?;
    }
    for entry in &fixture.hostname_metadata {
        store.put_hostname_metadata(&entry.site_id, &entry.env, &entry.hostname, &entry.doc)?;
    }
    for entry in &fixture.edge_logic {
        store.put_edge_logic(&entry.site_id, &entry.env, &entry.hostname, &entry.doc)?;
    }

    info!(
        hostnames = fixture.hostnames.len(),
        metadata = fixture.hostname_metadata.len(),
        edge_logic = fixture.edge_logic.len(),
        "fixture records seeded"
    );
    println!(
        "seeded {} hostname, {} metadata, {} edge-logic records",
        fixture.hostnames.len(),
        fixture.hostname_metadata.len(),
        fixture.edge_logic.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use policydocs_store::PolicyDocStore;

    const FIXTURE: &str = r#"{
        "hostnames": [
            {"site_id": "s1", "env": "dev", "hostname": "a.com", "doc": {"verified": true}}
        ],
        "hostname_metadata": [
            {"site_id": "s1", "env": "dev", "hostname": "a.com", "doc": {
                "hostname": "a.com", "zone": "z1",
                "created": "2024-01-15T10:00:00Z", "updated": "2024-01-15T10:00:10Z",
                "site_id": "s1", "site_env": "dev"
            }}
        ],
        "edge_logic": [
            {"site_id": "s1", "env": "dev", "hostname": "a.com", "doc": {
                "redirect_to": "b.com", "enforce_https": "true", "cache_control": "no-store",
                "created": "2024-01-15T10:00:00Z", "updated": "2024-01-15T10:00:20Z",
                "backend": "be1", "build_id": "123", "jurisdiction": "US"
            }}
        ]
    }"#;

    #[test]
    fn seeds_all_three_collections() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("fixture.json");
        std::fs::write(&file, FIXTURE).unwrap();

        let store = RedbStore::open_in_memory().unwrap();
        run(&store, &file).unwrap();

        store.fetch_normalized("s1", "dev", "a.com").unwrap();
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let fixture: SeedFile = serde_json::from_str("{}").unwrap();
        assert!(fixture.hostnames.is_empty());
        assert!(fixture.hostname_metadata.is_empty());
        assert!(fixture.edge_logic.is_empty());
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open_in_memory().unwrap();
        assert!(run(&store, &dir.path().join("nope.json")).is_err());
    }
}
