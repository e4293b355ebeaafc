use crate::StoreError;
use std::fs;
use std::path::{Path, PathBuf};

/// File name prefix of configuration lists written by nerdnet.
pub const LIST_FILE_PREFIX: &str = "nerdctl-";
pub const LIST_EXTENSION: &str = ".conflist";
/// Suffixes of files picked up from the directory. Only `.conflist` is a list document.
pub const CONF_EXTENSIONS: &[&str] = &[".conf", ".conflist", ".json"];

/// Naming convention inside a CNI configuration directory (e.g. `/etc/cni/net.d`).
#[derive(Debug, Clone)]
pub struct NetConfDir {
    root: PathBuf,
}

impl NetConfDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Destination of the managed list for `name`: `<root>/nerdctl-<name>.conflist`.
    #[inline]
    pub fn list_path(&self, name: &str) -> PathBuf {
        self.root
            .join(format!("{LIST_FILE_PREFIX}{name}{LIST_EXTENSION}"))
    }

    /// Create the directory (mode 0755 on Unix) if it does not exist yet.
    pub fn initialize(&self) -> Result<(), StoreError> {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o755);
        }
        builder.create(&self.root)?;
        Ok(())
    }
}

/// Whether `file_name` carries one of the recognized configuration suffixes.
pub fn has_conf_extension(file_name: &str) -> bool {
    CONF_EXTENSIONS.iter().any(|ext| file_name.ends_with(ext))
}

/// Whether `file_name` is a list document rather than a single-plugin one.
pub fn is_list_file(file_name: &str) -> bool {
    file_name.ends_with(LIST_EXTENSION)
}
