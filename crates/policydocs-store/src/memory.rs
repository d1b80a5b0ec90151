//! MemoryStore — in-process fake for the store capability.
//!
//! Mirrors [`RedbStore`](crate::RedbStore) semantics over plain maps: one
//! `BTreeMap` per collection, JSON bytes as values, the whole map behind a
//! single mutex so `fetch_normalized` is trivially one consistent snapshot.
//! Extra knobs for tests: [`put_raw`](MemoryStore::put_raw) plants malformed
//! documents and [`fail_next_write`](MemoryStore::fail_next_write) forces a
//! retryable write failure.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;

use policydocs_core::paths::{
    denormalized_path, normalized_path, DocPath, NormalizedCollection, DENORMED_COLLECTION,
};
use policydocs_core::types::{Denormalized, EdgeLogic, Hostname, HostnameMetadata, NormalizedDocs};

use crate::error::{StoreError, StoreResult};
use crate::store::PolicyDocStore;

type Collections = HashMap<String, BTreeMap<String, Vec<u8>>>;

#[derive(Default)]
struct Inner {
    collections: Mutex<Collections>,
    fail_next_write: AtomicBool,
}

/// In-memory implementation of [`PolicyDocStore`].
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

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

    /// Plant raw bytes at a collection/key, bypassing serialization.
    /// For deserialization-failure tests.
    pub fn put_raw(&self, collection: &str, key: &str, bytes: &[u8]) {
        let mut collections = self.inner.collections.lock().unwrap();
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), bytes.to_vec());
    }

    /// Raw stored bytes at a collection/key, if present.
    pub fn get_raw(&self, collection: &str, key: &str) -> Option<Vec<u8>> {
        let collections = self.inner.collections.lock().unwrap();
        collections.get(collection)?.get(key).cloned()
    }

    /// Make the next `write_denormalized` fail with a retryable error.
    pub fn fail_next_write(&self) {
        self.inner.fail_next_write.store(true, Ordering::SeqCst);
    }

    /// Read back the denormalized document for a hostname, if present.
    pub fn read_denormalized(&self, hostname: &str) -> StoreResult<Option<Denormalized>> {
        let path = denormalized_path(hostname)?;
        match self.get_raw(DENORMED_COLLECTION, &path.key) {
            Some(bytes) => {
                let doc = serde_json::from_slice(&bytes).map_err(|e| StoreError::Deserialize {
                    path: path.to_string(),
                    detail: e.to_string(),
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
        let value = serde_json::to_vec(doc).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.put_raw(path.collection, &path.key, &value);
        Ok(())
    }

    /// Read one document under an already-held lock, with the same
    /// missing-key classification as the production store.
    fn read_locked<T: DeserializeOwned>(
        collections: &Collections,
        collection: NormalizedCollection,
        path: &DocPath,
        site_id: &str,
        hostname: &str,
    ) -> StoreResult<T> {
        let table = collections.get(path.collection);
        match table.and_then(|t| t.get(&path.key)) {
            Some(bytes) => {
                serde_json::from_slice(bytes).map_err(|e| StoreError::Deserialize {
                    path: path.to_string(),
                    detail: e.to_string(),
                })
            }
            None => {
                let prefix = format!("{site_id}/");
                if table.is_some_and(|t| t.keys().any(|k| k.starts_with(&prefix))) {
                    Err(StoreError::HostnameNotFound {
                        collection: collection.as_str(),
                        hostname: hostname.to_string(),
                    })
                } else {
                    Err(StoreError::SiteNotFound {
                        collection: collection.as_str(),
                        site_id: site_id.to_string(),
                    })
                }
            }
        }
    }
}

impl PolicyDocStore for MemoryStore {
    fn read_hostname(&self, site_id: &str, env: &str, hostname: &str) -> StoreResult<Hostname> {
        let collection = NormalizedCollection::Hostnames;
        let path = normalized_path(collection, site_id, env, hostname)?;
        let collections = self.inner.collections.lock().unwrap();
        Self::read_locked(&collections, collection, &path, site_id, hostname)
    }

    fn read_hostname_metadata(
        &self,
        site_id: &str,
        env: &str,
        hostname: &str,
    ) -> StoreResult<HostnameMetadata> {
        let collection = NormalizedCollection::HostnameMetadata;
        let path = normalized_path(collection, site_id, env, hostname)?;
        let collections = self.inner.collections.lock().unwrap();
        Self::read_locked(&collections, collection, &path, site_id, hostname)
    }

    fn read_edge_logic(
        &self,
        site_id: &str,
        env: &str,
        hostname: &str,
    ) -> StoreResult<EdgeLogic> {
        let collection = NormalizedCollection::EdgeLogic;
        let path = normalized_path(collection, site_id, env, hostname)?;
        let collections = self.inner.collections.lock().unwrap();
        Self::read_locked(&collections, collection, &path, site_id, hostname)
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

        // One lock acquisition = one consistent snapshot.
        let collections = self.inner.collections.lock().unwrap();
        Ok(NormalizedDocs {
            hostname: Self::read_locked(
                &collections,
                NormalizedCollection::Hostnames,
                &hostname_path,
                site_id,
                hostname,
            )?,
            metadata: Self::read_locked(
                &collections,
                NormalizedCollection::HostnameMetadata,
                &metadata_path,
                site_id,
                hostname,
            )?,
            edge_logic: Self::read_locked(
                &collections,
                NormalizedCollection::EdgeLogic,
                &edge_logic_path,
                site_id,
                hostname,
            )?,
        })
    }

    fn write_denormalized(&self, path: &DocPath, doc: &Denormalized) -> StoreResult<()> {
        if path.collection != DENORMED_COLLECTION {
            return Err(StoreError::UnknownCollection(path.collection.to_string()));
        }
        if self.inner.fail_next_write.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Write {
                path: path.to_string(),
                detail: "injected write failure".to_string(),
            });
        }
        let value = serde_json::to_vec(doc).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.put_raw(path.collection, &path.key, &value);
        Ok(())
    }
}
