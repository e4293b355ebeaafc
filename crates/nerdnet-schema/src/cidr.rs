//! Subnet validation and gateway derivation.

use crate::SchemaError;
use ipnet::{IpNet, Ipv4Net};
use std::fmt;
use std::net::Ipv4Addr;

/// Longest accepted prefix. A /31 or /32 has no room for a gateway plus a host.
pub const MAX_PREFIX_LEN: u8 = 30;

/// A canonical IPv4 subnet together with its gateway (the first host address).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subnet {
    network: Ipv4Net,
    gateway: Ipv4Addr,
}

impl Subnet {
    #[inline]
    pub fn network(&self) -> Ipv4Net {
        self.network
    }

    #[inline]
    pub fn gateway(&self) -> Ipv4Addr {
        self.gateway
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} via {}", self.network, self.gateway)
    }
}

/// Parse `cidr`, require it to name the network base address, and derive the gateway.
///
/// `"10.4.0.0/16"` yields gateway `10.4.0.1`. `"10.4.0.5/16"` is rejected
/// with a suggestion of `"10.4.0.0/16"`. IPv6 subnets and prefixes longer
/// than [`MAX_PREFIX_LEN`] are rejected rather than guessed at.
pub fn derive(cidr: &str) -> Result<Subnet, SchemaError> {
    let parsed: IpNet = cidr
        .parse()
        .map_err(|_| SchemaError::InvalidCidr(cidr.to_owned()))?;
    let IpNet::V4(net) = parsed else {
        return Err(SchemaError::UnsupportedAddressFamily(cidr.to_owned()));
    };

    if net.addr() != net.network() {
        return Err(SchemaError::NonCanonicalCidr {
            cidr: cidr.to_owned(),
            suggestion: net.trunc().to_string(),
        });
    }
    if net.prefix_len() > MAX_PREFIX_LEN {
        return Err(SchemaError::SubnetTooSmall {
            cidr: cidr.to_owned(),
            prefix: net.prefix_len(),
        });
    }

    let gateway = u32::from(net.network())
        .checked_add(1)
        .map(Ipv4Addr::from)
        .ok_or_else(|| SchemaError::SubnetTooSmall {
            cidr: cidr.to_owned(),
            prefix: net.prefix_len(),
        })?;

    Ok(Subnet {
        network: net,
        gateway,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_first_host_as_gateway() {
        let s = derive("10.4.0.0/16").unwrap();
        assert_eq!(s.network().to_string(), "10.4.0.0/16");
        assert_eq!(s.gateway(), Ipv4Addr::new(10, 4, 0, 1));
    }

    #[test]
    fn derives_for_upper_half_of_a_small_block() {
        let s = derive("192.168.1.128/25").unwrap();
        assert_eq!(s.gateway(), Ipv4Addr::new(192, 168, 1, 129));
    }

    #[test]
    fn accepts_the_longest_allowed_prefix() {
        let s = derive("172.16.0.4/30").unwrap();
        assert_eq!(s.gateway(), Ipv4Addr::new(172, 16, 0, 5));
    }

    #[test]
    fn rejects_host_address_with_suggestion() {
        match derive("10.4.0.5/16") {
            Err(SchemaError::NonCanonicalCidr { cidr, suggestion }) => {
                assert_eq!(cidr, "10.4.0.5/16");
                assert_eq!(suggestion, "10.4.0.0/16");
            }
            other => panic!("expected NonCanonicalCidr, got {other:?}"),
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            derive("not-a-cidr"),
            Err(SchemaError::InvalidCidr(_))
        ));
        assert!(matches!(derive(""), Err(SchemaError::InvalidCidr(_))));
        assert!(matches!(
            derive("10.4.0.0"),
            Err(SchemaError::InvalidCidr(_))
        ));
        assert!(matches!(
            derive("10.4.0.0/33"),
            Err(SchemaError::InvalidCidr(_))
        ));
    }

    #[test]
    fn rejects_ipv6() {
        assert!(matches!(
            derive("fd00::/64"),
            Err(SchemaError::UnsupportedAddressFamily(_))
        ));
    }

    #[test]
    fn rejects_prefixes_without_host_room() {
        for cidr in ["10.0.0.0/31", "10.0.0.1/32", "255.255.255.255/32"] {
            assert!(
                matches!(derive(cidr), Err(SchemaError::SubnetTooSmall { .. })),
                "{cidr} must be rejected as too small"
            );
        }
    }

    #[test]
    fn display_shows_network_and_gateway() {
        let s = derive("10.5.0.0/24").unwrap();
        assert_eq!(s.to_string(), "10.5.0.0/24 via 10.5.0.1");
    }
}
