//! redb table definitions for the policydocs document store.
//!
//! Each table uses `&str` keys and `&[u8]` values (JSON-serialized
//! documents). The three normalized collections share the composite key
//! `{site_id}/{env}/{hostname}`; the denormalized output collection is
//! keyed by `{hostname}` alone.

use policydocs_core::paths::{NormalizedCollection, DENORMED_COLLECTION};
use redb::TableDefinition;

/// Hostname existence records keyed by `{site_id}/{env}/{hostname}`.
pub const HOSTNAMES: TableDefinition<&str, &[u8]> = TableDefinition::new("hostnames");

/// Hostname metadata records keyed by `{site_id}/{env}/{hostname}`.
pub const HOSTNAME_METADATA: TableDefinition<&str, &[u8]> =
    TableDefinition::new("hostnameMetadata");

/// Edge-logic records keyed by `{site_id}/{env}/{hostname}`.
pub const EDGE_LOGIC: TableDefinition<&str, &[u8]> = TableDefinition::new("edgelogic");

/// Denormalized policy documents keyed by `{hostname}`.
pub const DENORMED: TableDefinition<&str, &[u8]> = TableDefinition::new(DENORMED_COLLECTION);

/// Table definition for a normalized input collection.
pub const fn normalized_table(collection: NormalizedCollection) -> TableDefinition<'static, &'static str, &'static [u8]> {
    match collection {
        NormalizedCollection::Hostnames => HOSTNAMES,
        NormalizedCollection::HostnameMetadata => HOSTNAME_METADATA,
        NormalizedCollection::EdgeLogic => EDGE_LOGIC,
    }
}
