// Copyright (c) 2025 - Cowboy AI, Inc.
//! CIDR Range Value Object with Validation Invariants

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use thiserror::Error;

/// CIDR validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CidrError {
    #[error("Invalid IPv4 address: {0}")]
    InvalidAddress(String),

    #[error("Invalid CIDR notation: {0}")]
    InvalidNotation(String),

    #[error("Invalid prefix length: {0} (must be 0-32)")]
    InvalidPrefixLength(u8),
}

/// IPv4 CIDR range value object
///
/// Represents a contiguous block of IPv4 addresses in `address/prefix`
/// notation. Invariants:
/// - Valid dotted-quad address
/// - Prefix length 0-32
/// - Canonical representation
///
/// # Examples
///
/// ```rust
/// use llm_stack::domain::CidrBlock;
///
/// let range = CidrBlock::new("10.10.0.0/20").unwrap();
/// assert_eq!(range.prefix_length(), 20);
/// assert!(!range.is_unrestricted());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CidrBlock {
    address: Ipv4Addr,
    prefix_length: u8,
}

impl CidrBlock {
    /// Maximum IPv4 prefix length
    pub const MAX_PREFIX: u8 = 32;

    /// Create a new CIDR range from `address/prefix` notation
    ///
    /// # Invariants
    /// - Valid IPv4 address format
    /// - Prefix length 0-32
    pub fn new(cidr: impl AsRef<str>) -> Result<Self, CidrError> {
        let cidr = cidr.as_ref();

        let (addr_str, prefix_str) = cidr
            .split_once('/')
            .ok_or_else(|| CidrError::InvalidNotation(cidr.to_string()))?;

        let address = Ipv4Addr::from_str(addr_str)
            .map_err(|_| CidrError::InvalidAddress(addr_str.to_string()))?;

        let prefix_length = prefix_str
            .parse::<u8>()
            .map_err(|_| CidrError::InvalidNotation(cidr.to_string()))?;

        Self::from_parts(address, prefix_length)
    }

    /// Create from separate address and prefix length
    pub fn from_parts(address: Ipv4Addr, prefix_length: u8) -> Result<Self, CidrError> {
        if prefix_length > Self::MAX_PREFIX {
            return Err(CidrError::InvalidPrefixLength(prefix_length));
        }

        Ok(Self {
            address,
            prefix_length,
        })
    }

    /// Get the network address
    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    /// Get the prefix length
    pub fn prefix_length(&self) -> u8 {
        self.prefix_length
    }

    /// Check if this range matches every address (`0.0.0.0/0`)
    pub fn is_unrestricted(&self) -> bool {
        self.prefix_length == 0 && self.address == Ipv4Addr::UNSPECIFIED
    }

    /// Check if this range is a single host (`/32`)
    pub fn is_host_route(&self) -> bool {
        self.prefix_length == Self::MAX_PREFIX
    }

    /// Network mask for this range's prefix
    fn mask(&self) -> u32 {
        if self.prefix_length == 0 {
            0
        } else {
            u32::MAX << (Self::MAX_PREFIX - self.prefix_length)
        }
    }

    /// Check if `other` is fully contained within this range
    pub fn contains(&self, other: &CidrBlock) -> bool {
        if other.prefix_length < self.prefix_length {
            return false;
        }

        let mask = self.mask();
        u32::from(self.address) & mask == u32::from(other.address) & mask
    }

    /// Get as canonical `address/prefix` string
    pub fn as_notation(&self) -> String {
        format!("{}/{}", self.address, self.prefix_length)
    }
}

impl fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_notation())
    }
}

impl FromStr for CidrBlock {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CidrBlock {
    type Error = CidrError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CidrBlock> for String {
    fn from(value: CidrBlock) -> Self {
        value.as_notation()
    }
}
