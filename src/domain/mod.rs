// Copyright (c) 2025 - Cowboy AI, Inc.
//! Stack Domain Models
//!
//! Value objects with validation invariants shared by the resource
//! descriptors and the operator configuration.
//!
//! # Value Objects with Invariants
//!
//! - [`CidrBlock`] - IPv4 range in CIDR notation
//! - [`ResourceName`] - RFC 1035 cloud resource names
//! - [`NetworkTag`] - instance tags used for firewall targeting
//! - [`Region`] / [`Zone`] - location identifiers with zone→region derivation
//! - [`Sensitive`] - redacting wrapper for operator secrets

pub mod cidr;
pub mod location;
pub mod name;
pub mod sensitive;

// Re-export value objects
pub use cidr::{CidrBlock, CidrError};
pub use location::{LocationError, Region, Zone};
pub use name::{NameError, NetworkTag, ResourceName};
pub use sensitive::{Sensitive, REDACTED};
