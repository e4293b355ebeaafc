//! Discovery and classification of every configuration list in a directory.

use crate::layout::{has_conf_extension, is_list_file};
use crate::StoreError;
use nerdnet_schema::{
    default_config_list, is_external, parse_conf, parse_conflist, NetworkConfigList, ParseError,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Where a resolved list came from and who owns it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Synthesized in-process, never read from disk.
    Builtin,
    /// Read from disk and carrying the managed marker.
    Managed,
    External,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Builtin => write!(f, "nerdctl (builtin)"),
            Provenance::Managed => write!(f, "nerdctl"),
            Provenance::External => write!(f, "external"),
        }
    }
}

/// A configuration list plus provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkDescriptor {
    pub list: NetworkConfigList,
    pub managed: bool,
    /// `None` for the built-in default.
    pub file: Option<PathBuf>,
}

impl NetworkDescriptor {
    #[inline]
    pub fn name(&self) -> &str {
        &self.list.name
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        self.list.bytes()
    }

    pub fn provenance(&self) -> Provenance {
        match (&self.file, self.managed) {
            (None, _) => Provenance::Builtin,
            (Some(_), true) => Provenance::Managed,
            (Some(_), false) => Provenance::External,
        }
    }
}

/// The built-in `nerdctl` network. Always managed, never backed by a file.
pub fn default_descriptor() -> Result<NetworkDescriptor, StoreError> {
    Ok(NetworkDescriptor {
        list: default_config_list()?,
        managed: true,
        file: None,
    })
}

/// Resolve the full ordered collection for `dir`.
///
/// The built-in default is always element 0, followed by every file in
/// [`conf_files`] order. A missing directory yields only the default. Any
/// file that fails to parse aborts the whole resolution. Names are not
/// deduplicated.
pub fn resolve(dir: &Path) -> Result<Vec<NetworkDescriptor>, StoreError> {
    let mut descriptors = vec![default_descriptor()?];

    match fs::metadata(dir) {
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("{} does not exist, using built-in network only", dir.display());
            return Ok(descriptors);
        }
        Err(e) => return Err(e.into()),
    }

    for path in conf_files(dir)? {
        descriptors.push(load_descriptor(&path)?);
    }
    debug!(
        "resolved {} networks from {}",
        descriptors.len(),
        dir.display()
    );
    Ok(descriptors)
}

/// Configuration files directly inside `dir`, sorted by file name.
///
/// Subdirectories are skipped; symlinks are followed when read.
pub fn conf_files(dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            debug!("skipping non UTF-8 file name {file_name:?}");
            continue;
        };
        if has_conf_extension(name) {
            names.push(name.to_owned());
        } else {
            trace!("ignoring {name}");
        }
    }
    names.sort();
    Ok(names.into_iter().map(|name| dir.join(name)).collect())
}

fn load_descriptor(path: &Path) -> Result<NetworkDescriptor, StoreError> {
    let bytes = fs::read(path)?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    let parsed: Result<NetworkConfigList, ParseError> = if is_list_file(file_name) {
        parse_conflist(&bytes)
    } else {
        parse_conf(&bytes).and_then(NetworkConfigList::from_conf)
    };
    let list = parsed.map_err(|source| StoreError::Parse {
        file: path.to_path_buf(),
        source,
    })?;

    let managed = !is_external(list.bytes());
    debug!(
        "loaded network '{}' from {} (managed: {managed})",
        list.name,
        path.display()
    );
    Ok(NetworkDescriptor {
        list,
        managed,
        file: Some(path.to_path_buf()),
    })
}
