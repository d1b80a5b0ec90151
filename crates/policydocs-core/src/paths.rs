//! Typed builder for document-store paths.
//!
//! Every document address in the system is built here: the three normalized
//! collections keyed by `{site_id}/{env}/{hostname}` and the denormalized
//! output collection keyed by `{hostname}`. Segments are validated to be
//! non-empty and slash-free, so a malformed key can never silently address
//! the wrong document.

use std::fmt;

use thiserror::Error;

/// Output collection for denormalized policy documents.
pub const DENORMED_COLLECTION: &str = "denormed/policydoc";

/// The three normalized input collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizedCollection {
    Hostnames,
    HostnameMetadata,
    EdgeLogic,
}

impl NormalizedCollection {
    /// Collection name as stored.
    pub const fn as_str(self) -> &'static str {
        match self {
            NormalizedCollection::Hostnames => "hostnames",
            NormalizedCollection::HostnameMetadata => "hostnameMetadata",
            NormalizedCollection::EdgeLogic => "edgelogic",
        }
    }
}

impl fmt::Display for NormalizedCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully-addressed document: collection plus document key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocPath {
    pub collection: &'static str,
    pub key: String,
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.key)
    }
}

/// Path construction failures. These indicate caller bugs or corrupt
/// identifiers, never transient conditions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("empty {0} segment in document path")]
    EmptySegment(&'static str),

    #[error("{0} segment contains '/': {1:?}")]
    SegmentContainsSlash(&'static str, String),
}

fn validate_segment(name: &'static str, value: &str) -> Result<(), PathError> {
    if value.is_empty() {
        return Err(PathError::EmptySegment(name));
    }
    if value.contains('/') {
        return Err(PathError::SegmentContainsSlash(name, value.to_string()));
    }
    Ok(())
}

/// Path to a normalized record: `{collection}/{site_id}/{env}/{hostname}`.
pub fn normalized_path(
    collection: NormalizedCollection,
    site_id: &str,
    env: &str,
    hostname: &str,
) -> Result<DocPath, PathError> {
    validate_segment("site_id", site_id)?;
    validate_segment("env", env)?;
    validate_segment("hostname", hostname)?;
    Ok(DocPath {
        collection: collection.as_str(),
        key: format!("{site_id}/{env}/{hostname}"),
    })
}

/// Path to the denormalized record for a hostname:
/// `denormed/policydoc/{hostname}`.
///
/// A pure function of the hostname — two runs producing the same hostname
/// always address the same document.
pub fn denormalized_path(hostname: &str) -> Result<DocPath, PathError> {
    validate_segment("hostname", hostname)?;
    Ok(DocPath {
        collection: DENORMED_COLLECTION,
        key: hostname.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_path_per_collection() {
        let cases = [
            (NormalizedCollection::Hostnames, "hostnames/s1/dev/a.com"),
            (
                NormalizedCollection::HostnameMetadata,
                "hostnameMetadata/s1/dev/a.com",
            ),
            (NormalizedCollection::EdgeLogic, "edgelogic/s1/dev/a.com"),
        ];
        for (collection, expected) in cases {
            let path = normalized_path(collection, "s1", "dev", "a.com").unwrap();
            assert_eq!(path.to_string(), expected);
            assert_eq!(path.key, "s1/dev/a.com");
        }
    }

    #[test]
    fn denormalized_path_is_pure_function_of_hostname() {
        let first = denormalized_path("a.com").unwrap();
        let second = denormalized_path("a.com").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_string(), "denormed/policydoc/a.com");
    }

    #[test]
    fn rejects_empty_segments() {
        assert_eq!(
            normalized_path(NormalizedCollection::Hostnames, "", "dev", "a.com"),
            Err(PathError::EmptySegment("site_id"))
        );
        assert_eq!(
            normalized_path(NormalizedCollection::Hostnames, "s1", "", "a.com"),
            Err(PathError::EmptySegment("env"))
        );
        assert_eq!(
            normalized_path(NormalizedCollection::Hostnames, "s1", "dev", ""),
            Err(PathError::EmptySegment("hostname"))
        );
        assert_eq!(denormalized_path(""), Err(PathError::EmptySegment("hostname")));
    }

    #[test]
    fn rejects_segments_containing_slash() {
        assert_eq!(
            normalized_path(NormalizedCollection::EdgeLogic, "s1/x", "dev", "a.com"),
            Err(PathError::SegmentContainsSlash("site_id", "s1/x".to_string()))
        );
        assert_eq!(
            denormalized_path("a.com/evil"),
            Err(PathError::SegmentContainsSlash(
                "hostname",
                "a.com/evil".to_string()
            ))
        );
    }
}
