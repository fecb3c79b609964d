// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Descriptors
//!
//! Immutable declarative descriptions of the cloud resources the stack
//! provisions. A descriptor states desired state only; the provisioning
//! engine owns convergence.
//!
//! # Descriptors
//!
//! - [`Network`] - isolated virtual network, manual subnet allocation
//! - [`Subnet`] - one IPv4 range bound to a network and region
//! - [`FirewallRule`] - ingress SSH allow-list and allow-all egress
//! - [`Instance`] - the single inference VM with its boot payload
//!
//! [`Resource`] is the polymorphic envelope over the four kinds; it exposes
//! identity and dependency edges for ordering without losing type safety.

pub mod firewall;
pub mod instance;
pub mod network;
pub mod subnet;

pub use firewall::{Allowed, Direction, FirewallError, FirewallRule};
pub use instance::{AccessConfig, BootDisk, DiskType, Instance, InstanceBuilder, NetworkInterface};
pub use network::{Network, RoutingMode};
pub use subnet::Subnet;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::ResourceName;

/// Resource taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Network,
    Subnet,
    FirewallRule,
    Instance,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResourceKind::Network => "network",
            ResourceKind::Subnet => "subnet",
            ResourceKind::FirewallRule => "firewall_rule",
            ResourceKind::Instance => "instance",
        };
        f.write_str(label)
    }
}

/// Polymorphic envelope for all stack resources
///
/// Each variant is a strongly typed descriptor; the envelope lets the
/// ordering and engine code handle any resource while projections keep
/// full type information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "spec", rename_all = "snake_case")]
pub enum Resource {
    Network(Network),
    Subnet(Subnet),
    FirewallRule(FirewallRule),
    Instance(Instance),
}

impl Resource {
    /// Get the resource kind
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Network(_) => ResourceKind::Network,
            Resource::Subnet(_) => ResourceKind::Subnet,
            Resource::FirewallRule(_) => ResourceKind::FirewallRule,
            Resource::Instance(_) => ResourceKind::Instance,
        }
    }

    /// Get the resource identity
    pub fn name(&self) -> &ResourceName {
        match self {
            Resource::Network(r) => &r.name,
            Resource::Subnet(r) => &r.name,
            Resource::FirewallRule(r) => &r.name,
            Resource::Instance(r) => &r.name,
        }
    }

    /// Names of resources this one must be created after
    pub fn depends_on(&self) -> Vec<ResourceName> {
        match self {
            Resource::Network(_) => Vec::new(),
            Resource::Subnet(r) => vec![r.network.clone()],
            Resource::FirewallRule(r) => vec![r.network.clone()],
            Resource::Instance(r) => vec![r.network_interface.subnetwork.clone()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CidrBlock, NetworkTag, Region, Zone};

    #[test]
    fn test_envelope_identity_and_kind() {
        let network = Network::isolated(ResourceName::new("llm-vpc-network").unwrap());
        let resource = Resource::Network(network);

        assert_eq!(resource.kind(), ResourceKind::Network);
        assert_eq!(resource.name().as_str(), "llm-vpc-network");
        assert!(resource.depends_on().is_empty());
    }

    #[test]
    fn test_dependency_edges() {
        let network_name = ResourceName::new("llm-vpc-network").unwrap();
        let subnet_name = network_name.with_suffix("subnet").unwrap();

        let subnet = Resource::Subnet(Subnet::new(
            subnet_name.clone(),
            CidrBlock::new("10.10.0.0/20").unwrap(),
            Region::new("asia-southeast1").unwrap(),
            network_name.clone(),
        ));
        assert_eq!(subnet.depends_on(), vec![network_name.clone()]);

        let firewall = Resource::FirewallRule(
            FirewallRule::ssh_ingress(
                network_name.with_suffix("allow-ssh").unwrap(),
                network_name.clone(),
                CidrBlock::new("203.0.113.5/32").unwrap(),
                vec![NetworkTag::new("ssh").unwrap()],
            )
            .unwrap(),
        );
        assert_eq!(firewall.depends_on(), vec![network_name]);

        let instance = Resource::Instance(
            Instance::builder(
                ResourceName::new("tinylama-vm").unwrap(),
                Zone::new("asia-southeast1-a").unwrap(),
                subnet_name.clone(),
            )
            .build(),
        );
        assert_eq!(instance.depends_on(), vec![subnet_name]);
    }

    #[test]
    fn test_envelope_serialization_tags_kind() {
        let network = Network::isolated(ResourceName::new("llm-vpc-network").unwrap());
        let json = serde_json::to_string(&Resource::Network(network)).unwrap();
        assert!(json.contains("\"kind\":\"network\""));
        assert!(json.contains("llm-vpc-network"));
    }
}
