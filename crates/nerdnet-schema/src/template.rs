//! The fixed bridge configuration list used for every managed network.
//!
//! Stage order is significant: the CNI runtime invokes plugins in list order
//! on ADD and in reverse on DEL, so bridge setup must precede port mapping,
//! firewalling, and tuning.

use crate::cidr::derive;
use crate::conflist::{parse_conflist, NetworkConfigList};
use crate::SchemaError;
use serde::Serialize;

pub const CNI_VERSION: &str = "0.4.0";

pub const DEFAULT_NETWORK_NAME: &str = "nerdctl";
pub const DEFAULT_BRIDGE_NAME: &str = "cni-nerdctl0";
pub const DEFAULT_CIDR: &str = "10.4.0.0/16";

/// Inputs to [`render`]. `subnet` and `gateway` are inserted verbatim.
#[derive(Debug, Clone, Copy)]
pub struct TemplateParams<'a> {
    pub name: &'a str,
    pub bridge: &'a str,
    pub subnet: &'a str,
    pub gateway: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ManagedList<'a> {
    cni_version: &'static str,
    name: &'a str,
    nerdctl: bool,
    plugins: [Stage<'a>; 4],
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Stage<'a> {
    Bridge {
        bridge: &'a str,
        #[serde(rename = "isGateway")]
        is_gateway: bool,
        #[serde(rename = "ipMasq")]
        ip_masq: bool,
        #[serde(rename = "hairpinMode")]
        hairpin_mode: bool,
        ipam: Ipam<'a>,
    },
    Portmap {
        capabilities: Capabilities,
    },
    Firewall,
    Tuning,
}

#[derive(Debug, Serialize)]
struct Ipam<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    routes: [Route; 1],
    ranges: [[IpRange<'a>; 1]; 1],
}

#[derive(Debug, Serialize)]
struct Route {
    dst: &'static str,
}

#[derive(Debug, Serialize)]
struct IpRange<'a> {
    subnet: &'a str,
    gateway: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Capabilities {
    port_mappings: bool,
}

/// Render the managed bridge configuration list.
pub fn render(params: &TemplateParams<'_>) -> Result<Vec<u8>, SchemaError> {
    if params.name.is_empty() {
        return Err(SchemaError::InvalidArgument(
            "network name must not be empty".to_owned(),
        ));
    }
    if params.bridge.is_empty() {
        return Err(SchemaError::InvalidArgument(
            "bridge name must not be empty".to_owned(),
        ));
    }
    if params.subnet.is_empty() {
        return Err(SchemaError::InvalidArgument(
            "subnet must not be empty".to_owned(),
        ));
    }

    let doc = ManagedList {
        cni_version: CNI_VERSION,
        name: params.name,
        nerdctl: true,
        plugins: [
            Stage::Bridge {
                bridge: params.bridge,
                is_gateway: true,
                ip_masq: true,
                hairpin_mode: true,
                ipam: Ipam {
                    kind: "host-local",
                    routes: [Route { dst: "0.0.0.0/0" }],
                    ranges: [[IpRange {
                        subnet: params.subnet,
                        gateway: params.gateway,
                    }]],
                },
            },
            Stage::Portmap {
                capabilities: Capabilities {
                    port_mappings: true,
                },
            },
            Stage::Firewall,
            Stage::Tuning,
        ],
    };
    Ok(serde_json::to_vec_pretty(&doc)?)
}

/// Validate `cidr`, derive its gateway, and build the managed list.
///
/// The result has no origin file; callers attach provenance.
pub fn generate(name: &str, bridge: &str, cidr: &str) -> Result<NetworkConfigList, SchemaError> {
    if name.is_empty() || bridge.is_empty() || cidr.is_empty() {
        return Err(SchemaError::InvalidArgument(
            "name, bridge, and subnet are required".to_owned(),
        ));
    }
    let subnet = derive(cidr)?;
    let network = subnet.network().to_string();
    let gateway = subnet.gateway().to_string();
    let bytes = render(&TemplateParams {
        name,
        bridge,
        subnet: &network,
        gateway: &gateway,
    })?;
    Ok(parse_conflist(&bytes)?)
}

/// The built-in `nerdctl` network on `cni-nerdctl0`, `10.4.0.0/16`.
pub fn default_config_list() -> Result<NetworkConfigList, SchemaError> {
    generate(DEFAULT_NETWORK_NAME, DEFAULT_BRIDGE_NAME, DEFAULT_CIDR)
}
