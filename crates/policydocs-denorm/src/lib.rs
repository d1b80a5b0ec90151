//! policydocs-denorm — the read-merge-write denormalization pipeline.
//!
//! One invocation handles exactly one `(site_id, env, hostname)` triple:
//! fetch the three normalized records from one consistent snapshot, merge
//! metadata and edge logic into a flattened [`Denormalized`] record, and
//! overwrite it at the path derived from the hostname. No caching, no
//! batching, no internal retries — a store failure surfaces immediately
//! and retry policy belongs to the caller.
//!
//! [`Denormalized`]: policydocs_core::types::Denormalized

pub mod error;
pub mod merge;

pub use error::{DenormError, DenormResult};
pub use merge::merge;

use tracing::{debug, info};

use policydocs_core::paths::denormalized_path;
use policydocs_core::types::Denormalized;
use policydocs_store::PolicyDocStore;

use crate::error::wrap_load;

/// Orchestrates the denormalization pipeline over a store capability.
pub struct Denormalizer<S: PolicyDocStore> {
    store: S,
}

impl<S: PolicyDocStore> Denormalizer<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Denormalize one hostname: fetch the consistent triple, merge, and
    /// overwrite the denormalized document at its derived path.
    ///
    /// Returns the written record. Exactly one document write per
    /// successful invocation; nothing is written if the read fails.
    pub fn denormalize(
        &self,
        site_id: &str,
        env: &str,
        hostname: &str,
    ) -> DenormResult<Denormalized> {
        let docs = self
            .store
            .fetch_normalized(site_id, env, hostname)
            .map_err(wrap_load(site_id, env, hostname))?;
        debug!(
            %site_id,
            %env,
            %hostname,
            verified = docs.hostname.verified,
            "normalized documents loaded"
        );

        let merged = merge(&docs.metadata, &docs.edge_logic);
        let path = denormalized_path(&merged.hostname).map_err(|source| {
            DenormError::OutputPath {
                hostname: merged.hostname.clone(),
                source,
            }
        })?;

        self.store
            .write_denormalized(&path, &merged)
            .map_err(|source| DenormError::Write {
                path: path.to_string(),
                source,
            })?;

        info!(hostname = %merged.hostname, %path, "denormalized document written");
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use policydocs_core::types::{EdgeLogic, Hostname, HostnameMetadata};
    use policydocs_store::MemoryStore;

    fn ts(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, secs).unwrap()
    }

    fn metadata() -> HostnameMetadata {
        HostnameMetadata {
            hostname: "a.com".to_string(),
            zone: "z1".to_string(),
            created: ts(0),
            updated: ts(10),
            site_id: "s1".to_string(),
            site_env: "dev".to_string(),
        }
    }

    fn edge_logic() -> EdgeLogic {
        EdgeLogic {
            redirect_to: "b.com".to_string(),
            enforce_https: "true".to_string(),
            cache_control: "no-store".to_string(),
            created: ts(0),
            updated: ts(20),
            backend: "be1".to_string(),
            build_id: "123".to_string(),
            jurisdiction: "US".to_string(),
        }
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .put_hostname("s1", "dev", "a.com", &Hostname { verified: true })
            .unwrap();
        store
            .put_hostname_metadata("s1", "dev", "a.com", &metadata())
            .unwrap();
        store.put_edge_logic("s1", "dev", "a.com", &edge_logic()).unwrap();
        store
    }

    #[test]
    fn pipeline_writes_merged_document() {
        let store = seeded();
        let denormalizer = Denormalizer::new(store.clone());

        let written = denormalizer.denormalize("s1", "dev", "a.com").unwrap();
        assert_eq!(written.hostname, "a.com");
        assert_eq!(written.zone, "z1");
        assert_eq!(written.redirect_to, "b.com");
        assert_eq!(written.enforce_https, "true");
        assert_eq!(written.backend, "be1");
        assert_eq!(written.build_id, "123");
        assert_eq!(written.jurisdiction, "US");
        assert_eq!(written.site_id, "s1");
        assert_eq!(written.site_env, "dev");

        let stored = store.read_denormalized("a.com").unwrap().unwrap();
        assert_eq!(stored, written);
    }

    #[test]
    fn repeated_runs_store_identical_bytes() {
        let store = seeded();
        let denormalizer = Denormalizer::new(store.clone());

        denormalizer.denormalize("s1", "dev", "a.com").unwrap();
        let first = store.get_raw("denormed/policydoc", "a.com").unwrap();
        denormalizer.denormalize("s1", "dev", "a.com").unwrap();
        let second = store.get_raw("denormed/policydoc", "a.com").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_edge_logic_writes_nothing() {
        let store = MemoryStore::new();
        store
            .put_hostname("s1", "dev", "a.com", &Hostname { verified: true })
            .unwrap();
        store
            .put_hostname_metadata("s1", "dev", "a.com", &metadata())
            .unwrap();
        let denormalizer = Denormalizer::new(store.clone());

        let err = denormalizer.denormalize("s1", "dev", "a.com").unwrap_err();
        assert!(matches!(err, DenormError::Load { .. }));
        assert!(!err.is_retryable());
        assert!(store.read_denormalized("a.com").unwrap().is_none());
    }

    #[test]
    fn malformed_stored_record_is_terminal() {
        let store = seeded();
        store.put_raw("hostnameMetadata", "s1/dev/a.com", b"][");
        let denormalizer = Denormalizer::new(store.clone());

        let err = denormalizer.denormalize("s1", "dev", "a.com").unwrap_err();
        assert!(matches!(err, DenormError::Load { .. }));
        assert!(!err.is_retryable());
        assert!(store.read_denormalized("a.com").unwrap().is_none());
    }

    #[test]
    fn write_failure_is_retryable() {
        let store = seeded();
        store.fail_next_write();
        let denormalizer = Denormalizer::new(store.clone());

        let err = denormalizer.denormalize("s1", "dev", "a.com").unwrap_err();
        assert!(matches!(err, DenormError::Write { .. }));
        assert!(err.is_retryable());

        // The injected failure is consumed; a retry goes through.
        denormalizer.denormalize("s1", "dev", "a.com").unwrap();
        assert!(store.read_denormalized("a.com").unwrap().is_some());
    }
}
