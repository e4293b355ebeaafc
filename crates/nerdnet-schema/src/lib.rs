//! CNI network configuration list schema for nerdnet.
//!
//! This crate defines the descriptor layer: parsing and validation of
//! single-plugin (`.conf`) and list (`.conflist`) documents
//! (`NetworkConfigList`), subnet canonicalization and gateway derivation
//! (`derive`), the fixed bridge template used for managed networks
//! (`render`, `generate`), and the fail-safe managed/external classifier
//! (`is_external`).

pub mod cidr;
pub mod classify;
pub mod conflist;
pub mod template;

pub use cidr::{derive, Subnet, MAX_PREFIX_LEN};
pub use classify::{is_external, MARKER_FIELD};
pub use conflist::{parse_conf, parse_conflist, NetConf, NetworkConfigList, ParseError, PluginConf};
pub use template::{
    default_config_list, generate, render, TemplateParams, CNI_VERSION, DEFAULT_BRIDGE_NAME,
    DEFAULT_CIDR, DEFAULT_NETWORK_NAME,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("failed to parse CIDR {0:?}")]
    InvalidCidr(String),
    #[error("unexpected CIDR {cidr:?}, maybe you meant {suggestion:?}?")]
    NonCanonicalCidr { cidr: String, suggestion: String },
    #[error("unsupported CIDR {0:?}: only IPv4 subnets are supported")]
    UnsupportedAddressFamily(String),
    #[error("subnet {cidr:?} is too small: /{prefix} leaves no room for a gateway and hosts (maximum /{max})", max = MAX_PREFIX_LEN)]
    SubnetTooSmall { cidr: String, prefix: u8 },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("generated configuration list is invalid: {0}")]
    Parse(#[from] ParseError),
}
