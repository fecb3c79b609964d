// Copyright (c) 2025 - Cowboy AI, Inc.
//! Subnet Resource Descriptor

use serde::{Deserialize, Serialize};

use crate::domain::{CidrBlock, Region, ResourceName};

/// Subnet descriptor
///
/// One IPv4 range bound to a region and a parent network. The `network`
/// field is a non-owning back-reference; the referenced network must exist
/// in the same stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subnet {
    /// Resource identity
    pub name: ResourceName,

    /// IPv4 range allocated to this subnet
    pub ip_cidr_range: CidrBlock,

    /// Region the subnet lives in
    pub region: Region,

    /// Parent network (back-reference by name)
    pub network: ResourceName,
}

impl Subnet {
    /// Declare a subnet bound to a network and region
    pub fn new(
        name: ResourceName,
        ip_cidr_range: CidrBlock,
        region: Region,
        network: ResourceName,
    ) -> Self {
        Self {
            name,
            ip_cidr_range,
            region,
            network,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subnet_references_network() {
        let network = ResourceName::new("llm-vpc-network").unwrap();
        let subnet = Subnet::new(
            network.with_suffix("subnet").unwrap(),
            CidrBlock::new("10.10.0.0/20").unwrap(),
            Region::new("asia-southeast1").unwrap(),
            network.clone(),
        );

        assert_eq!(subnet.name.as_str(), "llm-vpc-network-subnet");
        assert_eq!(subnet.network, network);
    }
}
