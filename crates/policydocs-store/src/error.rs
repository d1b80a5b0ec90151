//! Error types for the policydocs document store.
//!
//! The variants fall into three classes: not-found (site vs. hostname kept
//! distinct for diagnostics), transient store failures (retryable by the
//! caller), and data-quality failures (terminal). [`StoreError::is_retryable`]
//! is the single classification point the trigger ack policy consumes.

use policydocs_core::paths::PathError;
use thiserror::Error;

/// Result type alias for document store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document in the collection has a key under this site.
    #[error("site not found: no {collection} documents under site {site_id:?}")]
    SiteNotFound {
        collection: &'static str,
        site_id: String,
    },

    /// The site is known to the collection but this hostname is not.
    #[error("hostname not found: no {collection} document for {hostname:?}")]
    HostnameNotFound {
        collection: &'static str,
        hostname: String,
    },

    #[error("failed to open database: {0}")]
    Open(String),

    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("table error: {0}")]
    Table(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("write error at {path}: {detail}")]
    Write { path: String, detail: String },

    #[error("serialization error: {0}")]
    Serialize(String),

    /// A stored document does not match the expected shape. Signals
    /// upstream data corruption, never a transient condition.
    #[error("deserialization error at {path}: {detail}")]
    Deserialize { path: String, detail: String },

    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    #[error("invalid document path: {0}")]
    Path(#[from] PathError),
}

impl StoreError {
    /// Whether retrying the same operation could succeed.
    ///
    /// Transient store failures (connectivity, transactions, I/O) are
    /// retryable; missing records, malformed documents, and caller bugs
    /// are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StoreError::Open(_)
                | StoreError::Transaction(_)
                | StoreError::Table(_)
                | StoreError::Read(_)
                | StoreError::Write { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(StoreError::Open("disk".into()).is_retryable());
        assert!(StoreError::Transaction("busy".into()).is_retryable());
        assert!(StoreError::Read("io".into()).is_retryable());
        assert!(StoreError::Write {
            path: "denormed/policydoc/a.com".into(),
            detail: "io".into()
        }
        .is_retryable());

        assert!(!StoreError::SiteNotFound {
            collection: "hostnames",
            site_id: "s1".into()
        }
        .is_retryable());
        assert!(!StoreError::HostnameNotFound {
            collection: "edgelogic",
            hostname: "a.com".into()
        }
        .is_retryable());
        assert!(!StoreError::Deserialize {
            path: "hostnames/s1/dev/a.com".into(),
            detail: "missing field".into()
        }
        .is_retryable());
        assert!(!StoreError::UnknownCollection("bogus".into()).is_retryable());
    }
}
