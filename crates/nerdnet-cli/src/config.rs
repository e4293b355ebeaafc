use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_NETCONFPATH: &str = "/etc/cni/net.d";
pub const DEFAULT_CNI_PATH: &str = "/opt/cni/bin";

/// Optional settings from `~/.config/nerdnet/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    #[serde(default)]
    pub cni_netconfpath: Option<PathBuf>,
    #[serde(default)]
    pub cni_path: Option<PathBuf>,
}

impl CliConfig {
    /// Load `~/.config/nerdnet/config.toml`, or defaults when it does not exist.
    pub fn load_default() -> Result<Self, String> {
        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("config error: cannot read {}: {e}", path.display()))?;
        toml::from_str(&content)
            .map_err(|e| format!("config error: invalid {}: {e}", path.display()))
    }
}

/// Effective paths after applying flag > config file > default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub netconfpath: PathBuf,
    pub cni_path: PathBuf,
}

impl Settings {
    pub fn resolve(
        netconfpath: Option<PathBuf>,
        cni_path: Option<PathBuf>,
        config: &CliConfig,
    ) -> Self {
        Self {
            netconfpath: netconfpath
                .or_else(|| config.cni_netconfpath.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_NETCONFPATH)),
            cni_path: cni_path
                .or_else(|| config.cni_path.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CNI_PATH)),
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(PathBuf::from(home).join(".config/nerdnet/config.toml"))
}
