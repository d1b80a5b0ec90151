//! policydocs-core — domain types, configuration, and document paths.
//!
//! The normalized records (`Hostname`, `HostnameMetadata`, `EdgeLogic`) are
//! owned by an external authoring system and only read here; the
//! `Denormalized` record is the flattened view this system produces. All
//! document addressing goes through the typed path builder in [`paths`] —
//! no other module concatenates store paths by hand.

pub mod config;
pub mod paths;
pub mod types;

pub use config::Config;
pub use paths::{
    denormalized_path, normalized_path, DocPath, NormalizedCollection, PathError,
    DENORMED_COLLECTION,
};
pub use types::*;
