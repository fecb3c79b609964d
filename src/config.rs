//! Operator-supplied stack configuration
//!
//! The stack takes a fixed set of named inputs. Two are required
//! (`project_id`, `ssh_source_ip`); the rest default to the values the
//! deployment ships with. The SSH source range is sensitive and stays
//! redacted in logs and serialized output.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{CidrBlock, LocationError, Region, ResourceName, Sensitive, Zone};

/// Configuration validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("project_id must not be empty")]
    MissingProjectId,

    #[error("ssh_source_ip must not be 0.0.0.0/0")]
    UnrestrictedSshSource,

    #[error(transparent)]
    Location(#[from] LocationError),
}

fn default_region() -> Region {
    Region::new(StackConfig::DEFAULT_REGION).expect("default region is valid")
}

fn default_zone() -> Zone {
    Zone::new(StackConfig::DEFAULT_ZONE).expect("default zone is valid")
}

fn default_network_name() -> ResourceName {
    ResourceName::new(StackConfig::DEFAULT_NETWORK_NAME).expect("default network name is valid")
}

fn default_subnet_cidr() -> CidrBlock {
    CidrBlock::new(StackConfig::DEFAULT_SUBNET_CIDR).expect("default subnet range is valid")
}

/// Operator inputs for the stack
///
/// Deserializes from JSON with defaults applied for the optional fields;
/// missing `project_id` or `ssh_source_ip` fails deserialization before any
/// resource is rendered. Serialization redacts the SSH source range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackConfig {
    /// Cloud project identifier
    pub project_id: String,

    /// Region for regional resources
    #[serde(default = "default_region")]
    pub region: Region,

    /// Zone the instance is created in
    #[serde(default = "default_zone")]
    pub zone: Zone,

    /// Administrator SSH source range (sensitive)
    pub ssh_source_ip: Sensitive<CidrBlock>,

    /// Name of the isolated network
    #[serde(default = "default_network_name")]
    pub network_name: ResourceName,

    /// IPv4 range for the subnet
    #[serde(default = "default_subnet_cidr")]
    pub subnet_cidr: CidrBlock,
}

impl StackConfig {
    /// Default region
    pub const DEFAULT_REGION: &'static str = "asia-southeast1";

    /// Default zone
    pub const DEFAULT_ZONE: &'static str = "asia-southeast1-a";

    /// Default network name
    pub const DEFAULT_NETWORK_NAME: &'static str = "llm-vpc-network";

    /// Default subnet range
    pub const DEFAULT_SUBNET_CIDR: &'static str = "10.10.0.0/20";

    /// Start building a configuration from the required inputs
    pub fn builder(
        project_id: impl Into<String>,
        ssh_source_ip: CidrBlock,
    ) -> StackConfigBuilder {
        StackConfigBuilder::new(project_id, ssh_source_ip)
    }

    /// Validate the configuration
    ///
    /// # Invariants
    /// - `project_id` is non-empty
    /// - the zone belongs to the region
    /// - the SSH source range is never the unrestricted range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project_id.trim().is_empty() {
            return Err(ConfigError::MissingProjectId);
        }

        self.zone.ensure_in_region(&self.region)?;

        if self.ssh_source_ip.reveal().is_unrestricted() {
            return Err(ConfigError::UnrestrictedSshSource);
        }

        Ok(())
    }
}

/// Builder for [`StackConfig`] with fluent setters for the optional inputs
pub struct StackConfigBuilder {
    config: StackConfig,
}

impl StackConfigBuilder {
    fn new(project_id: impl Into<String>, ssh_source_ip: CidrBlock) -> Self {
        Self {
            config: StackConfig {
                project_id: project_id.into(),
                region: default_region(),
                zone: default_zone(),
                ssh_source_ip: Sensitive::new(ssh_source_ip),
                network_name: default_network_name(),
                subnet_cidr: default_subnet_cidr(),
            },
        }
    }

    pub fn region(mut self, region: Region) -> Self {
        self.config.region = region;
        self
    }

    pub fn zone(mut self, zone: Zone) -> Self {
        self.config.zone = zone;
        self
    }

    pub fn network_name(mut self, name: ResourceName) -> Self {
        self.config.network_name = name;
        self
    }

    pub fn subnet_cidr(mut self, cidr: CidrBlock) -> Self {
        self.config.subnet_cidr = cidr;
        self
    }

    pub fn build(self) -> Result<StackConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
