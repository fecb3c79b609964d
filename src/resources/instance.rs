// Copyright (c) 2025 - Cowboy AI, Inc.
//! Compute Instance Resource Descriptor

use serde::{Deserialize, Serialize};

use crate::domain::{NetworkTag, ResourceName, Zone};

/// Boot disk class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiskType {
    /// SSD-backed persistent disk
    PdSsd,
    /// Standard persistent disk
    PdStandard,
}

/// Boot disk specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootDisk {
    /// Public OS image the disk is initialized from
    pub image: String,

    /// Disk size in gigabytes
    pub size_gb: u32,

    /// Disk class
    pub disk_type: DiskType,
}

impl Default for BootDisk {
    fn default() -> Self {
        Self {
            image: Instance::DEFAULT_IMAGE.to_string(),
            size_gb: Instance::DEFAULT_DISK_SIZE_GB,
            disk_type: DiskType::PdSsd,
        }
    }
}

/// External address assignment for a network interface
///
/// Declaring an access config requests an ephemeral public address; the
/// engine assigns the address at creation time and releases it on delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessConfig {
    /// Temporary externally routable address, assigned by the engine
    Ephemeral,
}

/// Network attachment for the instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterface {
    /// Subnet the interface attaches to (back-reference by name)
    pub subnetwork: ResourceName,

    /// Public address request; `None` keeps the instance private
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_config: Option<AccessConfig>,
}

/// Compute instance descriptor
///
/// One virtual machine with a fixed machine shape, an SSD boot disk from a
/// public OS image, a single network attachment, a broad API access-scope
/// grant, and a first-boot initialization payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Resource identity
    pub name: ResourceName,

    /// Machine shape
    pub machine_type: String,

    /// Zone the instance is created in
    pub zone: Zone,

    /// Tags used for firewall targeting
    pub tags: Vec<NetworkTag>,

    /// Boot disk specification
    pub boot_disk: BootDisk,

    /// Network attachment
    pub network_interface: NetworkInterface,

    /// API access scopes granted to the instance's default identity
    pub scopes: Vec<String>,

    /// First-boot initialization payload (opaque text, executed exactly once
    /// by the guest OS)
    pub metadata_startup_script: String,
}

impl Instance {
    /// Fixed machine shape for the inference workload
    pub const DEFAULT_MACHINE_TYPE: &'static str = "e2-standard-4";

    /// Public OS image the boot disk is initialized from
    pub const DEFAULT_IMAGE: &'static str = "debian-cloud/debian-12";

    /// Boot disk size in gigabytes
    pub const DEFAULT_DISK_SIZE_GB: u32 = 50;

    /// Broad API access scope granted to the instance
    pub const CLOUD_PLATFORM_SCOPE: &'static str =
        "https://www.googleapis.com/auth/cloud-platform";

    /// Start building an instance attached to the given subnet
    pub fn builder(name: ResourceName, zone: Zone, subnetwork: ResourceName) -> InstanceBuilder {
        InstanceBuilder::new(name, zone, subnetwork)
    }

    /// Check whether the instance carries the given tag
    pub fn has_tag(&self, tag: &NetworkTag) -> bool {
        self.tags.contains(tag)
    }

    /// Check whether the instance requests a public address
    pub fn has_public_address(&self) -> bool {
        self.network_interface.access_config.is_some()
    }
}

/// Builder for [`Instance`] with fluent setters
pub struct InstanceBuilder {
    instance: Instance,
}

impl InstanceBuilder {
    fn new(name: ResourceName, zone: Zone, subnetwork: ResourceName) -> Self {
        Self {
            instance: Instance {
                name,
                machine_type: Instance::DEFAULT_MACHINE_TYPE.to_string(),
                zone,
                tags: Vec::new(),
                boot_disk: BootDisk::default(),
                network_interface: NetworkInterface {
                    subnetwork,
                    access_config: Some(AccessConfig::Ephemeral),
                },
                scopes: vec![Instance::CLOUD_PLATFORM_SCOPE.to_string()],
                metadata_startup_script: String::new(),
            },
        }
    }

    pub fn machine_type(mut self, machine_type: impl Into<String>) -> Self {
        self.instance.machine_type = machine_type.into();
        self
    }

    pub fn tag(mut self, tag: NetworkTag) -> Self {
        if !self.instance.tags.contains(&tag) {
            self.instance.tags.push(tag);
        }
        self
    }

    pub fn boot_disk(mut self, boot_disk: BootDisk) -> Self {
        self.instance.boot_disk = boot_disk;
        self
    }

    pub fn private_only(mut self) -> Self {
        self.instance.network_interface.access_config = None;
        self
    }

    pub fn startup_script(mut self, script: impl Into<String>) -> Self {
        self.instance.metadata_startup_script = script.into();
        self
    }

    pub fn build(self) -> Instance {
        self.instance
    }
}
