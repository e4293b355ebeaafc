//! CNI configuration directory handling for nerdnet.
//!
//! This crate provides the storage layer: `NetConfDir` for the directory
//! naming convention, `resolve` for discovering and classifying every
//! configuration list (the built-in default first, then files in name
//! order), `create` for writing a new managed list under an exclusive
//! `DirLock`, and the `list`/`inspect` views consumed by the CLI.

pub mod layout;
pub mod lock;
pub mod ops;
pub mod registry;
pub mod resolve;

pub use layout::{NetConfDir, CONF_EXTENSIONS, LIST_EXTENSION, LIST_FILE_PREFIX};
pub use lock::DirLock;
pub use ops::{create, inspect, list, NativeNetwork, NetworkSummary, ISOLATION_WARNING};
pub use registry::{bridge_name, validate_network_name, Created, BRIDGE_PREFIX};
pub use resolve::{conf_files, default_descriptor, resolve, NetworkDescriptor, Provenance};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fsync a directory so that a preceding `rename()` into it is durable.
pub(crate) fn fsync_dir(dir: &Path) -> Result<(), std::io::Error> {
    let f = std::fs::File::open(dir)?;
    f.sync_all()
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("network config error: {0}")]
    Schema(#[from] nerdnet_schema::SchemaError),
    #[error("network config error: failed to parse {}: {source}", .file.display())]
    Parse {
        file: PathBuf,
        #[source]
        source: nerdnet_schema::ParseError,
    },
    #[error("invalid network name: {0}")]
    InvalidName(String),
    #[error("network with name {0} already exists")]
    AlreadyExists(String),
    #[error("file {} already exists", .0.display())]
    FileExists(PathBuf),
    #[error("no such network: {0}")]
    NotFound(String),
    #[error("lock acquisition failed: {0}")]
    LockFailed(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
