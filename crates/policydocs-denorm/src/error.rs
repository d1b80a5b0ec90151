//! Denormalization pipeline error types.

use policydocs_core::paths::PathError;
use policydocs_store::StoreError;
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type DenormResult<T> = Result<T, DenormError>;

/// Errors from one denormalization invocation, each carrying the key or
/// path context needed to diagnose without re-running.
#[derive(Debug, Error)]
pub enum DenormError {
    #[error("failed to load normalized documents for {site_id}/{env}/{hostname}")]
    Load {
        site_id: String,
        env: String,
        hostname: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to derive output path for hostname {hostname:?}")]
    OutputPath {
        hostname: String,
        #[source]
        source: PathError,
    },

    #[error("failed to write denormalized document at {path}")]
    Write {
        path: String,
        #[source]
        source: StoreError,
    },
}

impl DenormError {
    /// Whether retrying the invocation could succeed. Delegates to the
    /// underlying store classification; a bad output path never heals.
    pub fn is_retryable(&self) -> bool {
        match self {
            DenormError::Load { source, .. } | DenormError::Write { source, .. } => {
                source.is_retryable()
            }
            DenormError::OutputPath { .. } => false,
        }
    }
}

/// Closure factory wrapping a store error with the invocation key.
pub(crate) fn wrap_load(
    site_id: &str,
    env: &str,
    hostname: &str,
) -> impl FnOnce(StoreError) -> DenormError {
    let site_id = site_id.to_string();
    let env = env.to_string();
    let hostname = hostname.to_string();
    move |source| DenormError::Load {
        site_id,
        env,
        hostname,
        source,
    }
}
