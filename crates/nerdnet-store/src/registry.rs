use crate::layout::NetConfDir;
use crate::lock::DirLock;
use crate::resolve::{resolve, NetworkDescriptor};
use crate::{fsync_dir, StoreError};
use nerdnet_schema::generate;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Prefix of the Linux bridge device backing a managed network.
pub const BRIDGE_PREFIX: &str = "cni-nerdctl-";

/// A network written by [`create`].
#[derive(Debug, Clone)]
pub struct Created {
    pub path: PathBuf,
    pub descriptor: NetworkDescriptor,
}

pub fn validate_network_name(name: &str) -> Result<(), StoreError> {
    if name.is_empty() {
        return Err(StoreError::InvalidName(
            "network name must not be empty".to_owned(),
        ));
    }
    if !name.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(StoreError::InvalidName(format!(
            "malformed name {name:?}: must match [a-zA-Z0-9]+"
        )));
    }
    Ok(())
}

#[inline]
pub fn bridge_name(name: &str) -> String {
    format!("{BRIDGE_PREFIX}{name}")
}

/// Write a new managed configuration list for `name` on `subnet`.
///
/// Fails with `AlreadyExists` when any resolved list (including the
/// built-in one) already uses `name`, and with `FileExists` when the
/// destination file is present. Both checks and the write happen under
/// the directory lock, and the write never replaces an existing file.
/// Subnet overlap with other networks is not checked.
pub fn create(dir: &NetConfDir, name: &str, subnet: &str) -> Result<Created, StoreError> {
    validate_network_name(name)?;
    let bridge = bridge_name(name);

    dir.initialize()?;
    let _lock = DirLock::acquire(dir.root())?;

    let existing = resolve(dir.root())?;
    if existing.iter().any(|d| d.name() == name) {
        return Err(StoreError::AlreadyExists(name.to_owned()));
    }

    let list = generate(name, &bridge, subnet)?;

    let path = dir.list_path(name);
    if fs::symlink_metadata(&path).is_ok() {
        return Err(StoreError::FileExists(path));
    }
    write_new_file(dir.root(), &path, list.bytes())?;
    info!("created network '{name}' on {bridge} at {}", path.display());

    Ok(Created {
        descriptor: NetworkDescriptor {
            list,
            managed: true,
            file: Some(path.clone()),
        },
        path,
    })
}

/// Write `content` to `dest` with mode 0644 via a temp file, refusing to replace `dest`.
fn write_new_file(dir: &Path, dest: &Path, content: &[u8]) -> Result<(), StoreError> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist_noclobber(dest).map_err(|e| {
        if e.error.kind() == ErrorKind::AlreadyExists {
            StoreError::FileExists(dest.to_path_buf())
        } else {
            StoreError::Io(e.error)
        }
    })?;
    fsync_dir(dir)?;
    debug!("wrote {} ({} bytes)", dest.display(), content.len());
    Ok(())
}
