// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Resource Descriptor

use serde::{Deserialize, Serialize};

use crate::domain::ResourceName;

/// Routing mode for a network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoutingMode {
    /// Routes are advertised within the region only
    Regional,
    /// Routes are advertised across all regions
    Global,
}

/// Isolated virtual network descriptor
///
/// The stack always declares manual subnet allocation: subnets are created
/// explicitly, never auto-derived per region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    /// Resource identity
    pub name: ResourceName,

    /// Routing mode
    pub routing_mode: RoutingMode,

    /// Whether the engine auto-creates one subnet per region
    pub auto_create_subnetworks: bool,
}

impl Network {
    /// Declare an isolated network with manual subnet allocation
    pub fn isolated(name: ResourceName) -> Self {
        Self {
            name,
            routing_mode: RoutingMode::Regional,
            auto_create_subnetworks: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolated_network_disables_auto_subnets() {
        let network = Network::isolated(ResourceName::new("llm-vpc-network").unwrap());
        assert!(!network.auto_create_subnetworks);
        assert_eq!(network.routing_mode, RoutingMode::Regional);
    }

    #[test]
    fn test_routing_mode_serialization() {
        let json = serde_json::to_string(&RoutingMode::Regional).unwrap();
        assert_eq!(json, "\"REGIONAL\"");
    }
}
