//! Views over the resolved collection, as consumed by the command line.

use crate::layout::NetConfDir;
use crate::registry::{self, Created};
use crate::resolve::{resolve, NetworkDescriptor, Provenance};
use crate::StoreError;
use serde::Serialize;
use serde_json::value::RawValue;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const ISOLATION_WARNING: &str = "CNI support is WIP. No isolation across different networks.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkSummary {
    pub name: String,
    pub kind: Provenance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Inspect output for one network. The key casing is a stable output format.
///
/// `cni` is the descriptor body as written, embedded without re-encoding.
#[derive(Debug, Clone, Serialize)]
pub struct NativeNetwork {
    #[serde(rename = "CNI")]
    pub cni: Box<RawValue>,
    #[serde(rename = "Nerdctl")]
    pub nerdctl: bool,
    #[serde(rename = "File", skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl TryFrom<&NetworkDescriptor> for NativeNetwork {
    type Error = StoreError;

    fn try_from(d: &NetworkDescriptor) -> Result<Self, Self::Error> {
        Ok(Self {
            cni: serde_json::from_slice(d.bytes())?,
            nerdctl: d.managed,
            file: d.file.clone(),
        })
    }
}

/// Name and provenance of every network, in resolution order.
pub fn list(dir: &Path) -> Result<Vec<NetworkSummary>, StoreError> {
    Ok(resolve(dir)?
        .into_iter()
        .map(|d| NetworkSummary {
            kind: d.provenance(),
            name: d.list.name,
            file: d.file,
        })
        .collect())
}

/// Every network whose name is in `names`, in resolution order.
///
/// Fails with `NotFound` for the first requested name that matched nothing.
pub fn inspect<S: AsRef<str>>(
    dir: &Path,
    names: &[S],
) -> Result<Vec<NetworkDescriptor>, StoreError> {
    let wanted: HashSet<&str> = names.iter().map(AsRef::as_ref).collect();
    let mut filled: HashSet<&str> = HashSet::new();
    let mut result = Vec::new();

    for d in resolve(dir)? {
        if let Some(&name) = wanted.get(d.name()) {
            filled.insert(name);
            result.push(d);
        }
    }

    if let Some(missing) = names.iter().map(AsRef::as_ref).find(|n| !filled.contains(n)) {
        return Err(StoreError::NotFound(missing.to_owned()));
    }
    Ok(result)
}

/// Create a managed network and log the isolation caveat.
pub fn create(dir: &Path, name: &str, subnet: &str) -> Result<Created, StoreError> {
    let created = registry::create(&NetConfDir::new(dir), name, subnet)?;
    warn!("{ISOLATION_WARNING}");
    Ok(created)
}
