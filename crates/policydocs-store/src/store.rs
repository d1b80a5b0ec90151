//! PolicyDocStore — the store capability and its redb implementation.
//!
//! [`PolicyDocStore`] is the narrow interface the denormalization pipeline
//! consumes: read the three normalized records from one consistent
//! snapshot, overwrite the denormalized record. [`RedbStore`] implements it
//! over redb; a single read transaction is an MVCC snapshot, so either all
//! three reads observe the same committed state or the call fails with no
//! partial result.
//!
//! The seeding methods (`put_*`) and `read_denormalized` are outside the
//! capability trait — they exist for the authoring side (CLI `seed`) and
//! for verification, not for the pipeline.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use policydocs_core::paths::{
    denormalized_path, normalized_path, DocPath, NormalizedCollection, DENORMED_COLLECTION,
};
use policydocs_core::types::{Denormalized, EdgeLogic, Hostname, HostnameMetadata, NormalizedDocs};

use crate::error::{StoreError, StoreResult};
use crate::tables::{normalized_table, DENORMED, EDGE_LOGIC, HOSTNAMES, HOSTNAME_METADATA};

/// Convert any `Display` error into a `StoreError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StoreError::$variant(e.to_string())
    };
}

/// Store capability consumed by the denormalization pipeline.
///
/// Implementations must guarantee that [`fetch_normalized`] reads all three
/// records from one consistent snapshot and that
/// [`write_denormalized`] is a full, atomic replacement of the document at
/// the given path.
///
/// [`fetch_normalized`]: PolicyDocStore::fetch_normalized
/// [`write_denormalized`]: PolicyDocStore::write_denormalized
pub trait PolicyDocStore: Send + Sync {
    /// Read the hostname existence record.
    fn read_hostname(&self, site_id: &str, env: &str, hostname: &str) -> StoreResult<Hostname>;

    /// Read the hostname metadata record.
    fn read_hostname_metadata(
        &self,
        site_id: &str,
        env: &str,
        hostname: &str,
    ) -> StoreResult<HostnameMetadata>;

    /// Read the edge-logic record.
    fn read_edge_logic(&self, site_id: &str, env: &str, hostname: &str)
        -> StoreResult<EdgeLogic>;

    /// Read all three normalized records from one consistent snapshot.
    ///
    /// Either every record reflects the same committed state, or the call
    /// fails with no partial result.
    fn fetch_normalized(
        &self,
        site_id: &str,
        env: &str,
        hostname: &str,
    ) -> StoreResult<NormalizedDocs>;

    /// Atomically overwrite the denormalized document at `path`.
    ///
    /// Full replacement, never a merge with the prior stored value.
    /// Rejects paths outside the denormalized collection.
    fn write_denormalized(&self, path: &DocPath, doc: &Denormalized) -> StoreResult<()>;
}

/// Thread-safe document store backed by redb.
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open (or create) a persistent document store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "document store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory document store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory document store opened");
        Ok(store)
    }

    /// Create all tables if they don't exist yet.
    fn ensure_tables(&self) -> StoreResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(HOSTNAMES).map_err(map_err!(Table))?;
        txn.open_table(HOSTNAME_METADATA).map_err(map_err!(Table))?;
        txn.open_table(EDGE_LOGIC).map_err(map_err!(Table))?;
        txn.open_table(DENORMED).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    // ── Seeding / verification (outside the capability trait) ──────

    /// Insert or replace a hostname existence record.
    pub fn put_hostname(
        &self,
        site_id: &str,
        env: &str,
        hostname: &str,
        doc: &Hostname,
    ) -> StoreResult<()> {
        self.put_normalized(NormalizedCollection::Hostnames, site_id, env, hostname, doc)
    }

    /// Insert or replace a hostname metadata record.
    pub fn put_hostname_metadata(
        &self,
        site_id: &str,
        env: &str,
        hostname: &str,
        doc: &HostnameMetadata,
    ) -> StoreResult<()> {
        self.put_normalized(
            NormalizedCollection::HostnameMetadata,
            site_id,
            env,
            hostname,
            doc,
        )
    }

    /// Insert or replace an edge-logic record.
    pub fn put_edge_logic(
        &self,
        site_id: &str,
        env: &str,
        hostname: &str,
        doc: &EdgeLogic,
    ) -> StoreResult<()> {
        self.put_normalized(NormalizedCollection::EdgeLogic, site_id, env, hostname, doc)
    }

    /// Read back the denormalized document for a hostname, if present.
    pub fn read_denormalized(&self, hostname: &str) -> StoreResult<Option<Denormalized>> {
        let path = denormalized_path(hostname)?;
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(DENORMED).map_err(map_err!(Table))?;
        match table.get(path.key.as_str()).map_err(map_err!(Read))? {
            Some(guard) => {
                let doc = serde_json::from_slice(guard.value()).map_err(|e| {
                    StoreError::Deserialize {
                        path: path.to_string(),
                        detail: e.to_string(),
                    }
                })?;
                Ok(Some(doc))
            }
            None => Ok(None),
        }
    }

    fn put_normalized<T: Serialize>(
        &self,
        collection: NormalizedCollection,
        site_id: &str,
        env: &str,
        hostname: &str,
        doc: &T,
    ) -> StoreResult<()> {
        let path = normalized_path(collection, site_id, env, hostname)?;
        let value = serde_json::to_vec(doc).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn
                .open_table(normalized_table(collection))
                .map_err(map_err!(Table))?;
            table
                .insert(path.key.as_str(), value.as_slice())
                .map_err(|e| StoreError::Write {
                    path: path.to_string(),
                    detail: e.to_string(),
                })?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%path, "normalized record stored");
        Ok(())
    }
}

/// Read one normalized document out of an open table, classifying a missing
/// key as site-unknown or hostname-unknown.
fn read_doc<T, TBL>(
    table: &TBL,
    collection: NormalizedCollection,
    path: &DocPath,
    site_id: &str,
    hostname: &str,
) -> StoreResult<T>
where
    T: DeserializeOwned,
    TBL: ReadableTable<&'static str, &'static [u8]>,
{
    match table.get(path.key.as_str()).map_err(map_err!(Read))? {
        Some(guard) => {
            serde_json::from_slice(guard.value()).map_err(|e| StoreError::Deserialize {
                path: path.to_string(),
                detail: e.to_string(),
            })
        }
        None => Err(classify_missing(table, collection, site_id, hostname)),
    }
}

/// Distinguish "site unknown" from "hostname unknown under a known site"
/// by probing the table for any key under the site prefix.
fn classify_missing<TBL>(
    table: &TBL,
    collection: NormalizedCollection,
    site_id: &str,
    hostname: &str,
) -> StoreError
where
    TBL: ReadableTable<&'static str, &'static [u8]>,
{
    let prefix = format!("{site_id}/");
    let iter = match table.iter() {
        Ok(iter) => iter,
        Err(e) => return StoreError::Read(e.to_string()),
    };
    for entry in iter {
        match entry {
            Ok((key, _)) if key.value().starts_with(&prefix) => {
                return StoreError::HostnameNotFound {
                    collection: collection.as_str(),
                    hostname: hostname.to_string(),
                };
            }
            Ok(_) => {}
            Err(e) => return StoreError::Read(e.to_string()),
        }
    }
    StoreError::SiteNotFound {
        collection: collection.as_str(),
        site_id: site_id.to_string(),
    }
}

impl PolicyDocStore for RedbStore {
    fn read_hostname(&self, site_id: &str, env: &str, hostname: &str) -> StoreResult<Hostname> {
        let collection = NormalizedCollection::Hostnames;
        let path = normalized_path(collection, site_id, env, hostname)?;
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(HOSTNAMES).map_err(map_err!(Table))?;
        read_doc(&table, collection, &path, site_id, hostname)
    }

    fn read_hostname_metadata(
        &self,
        site_id: &str,
        env: &str,
        hostname: &str,
    ) -> StoreResult<HostnameMetadata> {
        let collection = NormalizedCollection::HostnameMetadata;
        let path = normalized_path(collection, site_id, env, hostname)?;
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(HOSTNAME_METADATA).map_err(map_err!(Table))?;
        read_doc(&table, collection, &path, site_id, hostname)
    }

    fn read_edge_logic(
        &self,
        site_id: &str,
        env: &str,
        hostname: &str,
    ) -> StoreResult<EdgeLogic> {
        let collection = NormalizedCollection::EdgeLogic;
        let path = normalized_path(collection, site_id, env, hostname)?;
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(EDGE_LOGIC).map_err(map_err!(Table))?;
        read_doc(&table, collection, &path, site_id, hostname)
    }

    fn fetch_normalized(
        &self,
        site_id: &str,
        env: &str,
        hostname: &str,
    ) -> StoreResult<NormalizedDocs> {
        let hostname_path =
            normalized_path(NormalizedCollection::Hostnames, site_id, env, hostname)?;
        let metadata_path =
            normalized_path(NormalizedCollection::HostnameMetadata, site_id, env, hostname)?;
        let edge_logic_path =
            normalized_path(NormalizedCollection::EdgeLogic, site_id, env, hostname)?;

        // One read transaction = one MVCC snapshot across all three tables.
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let hostnames = txn.open_table(HOSTNAMES).map_err(map_err!(Table))?;
        let metadata = txn.open_table(HOSTNAME_METADATA).map_err(map_err!(Table))?;
        let edge_logic = txn.open_table(EDGE_LOGIC).map_err(map_err!(Table))?;

        let docs = NormalizedDocs {
            hostname: read_doc(
                &hostnames,
                NormalizedCollection::Hostnames,
                &hostname_path,
                site_id,
                hostname,
            )?,
            metadata: read_doc(
                &metadata,
                NormalizedCollection::HostnameMetadata,
                &metadata_path,
                site_id,
                hostname,
            )?,
            edge_logic: read_doc(
                &edge_logic,
                NormalizedCollection::EdgeLogic,
                &edge_logic_path,
                site_id,
                hostname,
            )?,
        };
        debug!(%site_id, %env, %hostname, "normalized documents fetched");
        Ok(docs)
    }

    fn write_denormalized(&self, path: &DocPath, doc: &Denormalized) -> StoreResult<()> {
        if path.collection != DENORMED_COLLECTION {
            return Err(StoreError::UnknownCollection(path.collection.to_string()));
        }
        let value = serde_json::to_vec(doc).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(DENORMED).map_err(map_err!(Table))?;
            table
                .insert(path.key.as_str(), value.as_slice())
                .map_err(|e| StoreError::Write {
                    path: path.to_string(),
                    detail: e.to_string(),
                })?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%path, "denormalized document written");
        Ok(())
    }
}
