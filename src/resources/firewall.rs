// Copyright (c) 2025 - Cowboy AI, Inc.
//! Firewall Rule Resource Descriptor
//!
//! Two rules make up the stack's firewall surface: an ingress rule admitting
//! TCP/22 from exactly one operator-supplied range to tagged instances, and
//! an egress rule permitting all traffic. The ingress constructor enforces
//! the narrowing invariant: the source range is never the unrestricted range.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{CidrBlock, NetworkTag, ResourceName};

/// Firewall rule validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FirewallError {
    #[error("SSH ingress source range must not be 0.0.0.0/0")]
    UnrestrictedIngressSource,

    #[error("Ingress rule requires at least one target tag")]
    MissingTargetTags,
}

/// Traffic direction a rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Ingress,
    Egress,
}

/// Protocol/port allow-list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowed {
    /// Protocol name (`tcp`, `udp`, `icmp`) or `all`
    pub protocol: String,

    /// Ports the rule admits; empty means every port of the protocol
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub ports: Vec<u16>,
}

impl Allowed {
    /// Admit specific TCP ports
    pub fn tcp(ports: Vec<u16>) -> Self {
        Self {
            protocol: "tcp".to_string(),
            ports,
        }
    }

    /// Admit every protocol on every port
    pub fn all_protocols() -> Self {
        Self {
            protocol: "all".to_string(),
            ports: Vec::new(),
        }
    }
}

/// Firewall rule descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRule {
    /// Resource identity
    pub name: ResourceName,

    /// Parent network (back-reference by name)
    pub network: ResourceName,

    /// Traffic direction
    pub direction: Direction,

    /// Protocol/port allow-list
    pub allowed: Vec<Allowed>,

    /// Source ranges (ingress rules)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub source_ranges: Vec<CidrBlock>,

    /// Destination ranges (egress rules)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub destination_ranges: Vec<CidrBlock>,

    /// Tags selecting which instances the rule applies to
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub target_tags: Vec<NetworkTag>,
}

impl FirewallRule {
    /// SSH port admitted by the ingress rule
    pub const SSH_PORT: u16 = 22;

    /// Declare the SSH ingress rule
    ///
    /// # Invariants
    /// - `source` is exactly the one operator-supplied range, never `0.0.0.0/0`
    /// - at least one target tag, so the rule binds to tagged instances only
    pub fn ssh_ingress(
        name: ResourceName,
        network: ResourceName,
        source: CidrBlock,
        target_tags: Vec<NetworkTag>,
    ) -> Result<Self, FirewallError> {
        if source.is_unrestricted() {
            return Err(FirewallError::UnrestrictedIngressSource);
        }

        if target_tags.is_empty() {
            return Err(FirewallError::MissingTargetTags);
        }

        Ok(Self {
            name,
            network,
            direction: Direction::Ingress,
            allowed: vec![Allowed::tcp(vec![Self::SSH_PORT])],
            source_ranges: vec![source],
            destination_ranges: Vec::new(),
            target_tags,
        })
    }

    /// Declare the allow-all egress rule
    pub fn egress_all(name: ResourceName, network: ResourceName) -> Self {
        Self {
            name,
            network,
            direction: Direction::Egress,
            allowed: vec![Allowed::all_protocols()],
            source_ranges: Vec::new(),
            destination_ranges: vec![
                CidrBlock::new("0.0.0.0/0").expect("unrestricted range is valid"),
            ],
            target_tags: Vec::new(),
        }
    }

    /// Check whether this rule admits TCP traffic on the given port
    pub fn admits_tcp_port(&self, port: u16) -> bool {
        self.allowed.iter().any(|allow| {
            (allow.protocol == "tcp" || allow.protocol == "all")
                && (allow.ports.is_empty() || allow.ports.contains(&port))
        })
    }
}
