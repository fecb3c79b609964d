// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Name Value Objects with Validation Invariants

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Resource name validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("Name is empty")]
    Empty,

    #[error("Name exceeds maximum length of 63 characters: {0}")]
    TooLong(usize),

    #[error("Name must start with a lowercase letter: {0}")]
    InvalidFirstCharacter(String),

    #[error("Name cannot end with a hyphen: {0}")]
    TrailingHyphen(String),

    #[error("Invalid character in name: {0}")]
    InvalidCharacter(char),
}

/// Validate an RFC 1035 label as used for cloud resource names
///
/// Rules:
/// - 1-63 characters
/// - First character is a lowercase letter
/// - Remaining characters are lowercase letters, digits, or hyphens
/// - Last character is not a hyphen
fn validate_label(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }

    if name.len() > ResourceName::MAX_LENGTH {
        return Err(NameError::TooLong(name.len()));
    }

    match name.chars().next() {
        Some(first) if first.is_ascii_lowercase() => {}
        _ => return Err(NameError::InvalidFirstCharacter(name.to_string())),
    }

    for ch in name.chars() {
        if !ch.is_ascii_lowercase() && !ch.is_ascii_digit() && ch != '-' {
            return Err(NameError::InvalidCharacter(ch));
        }
    }

    if name.ends_with('-') {
        return Err(NameError::TrailingHyphen(name.to_string()));
    }

    Ok(())
}

/// Cloud resource name value object
///
/// Represents a valid resource identifier following the RFC 1035 label
/// convention the provisioning engine enforces for networks, subnets,
/// firewall rules, and instances.
///
/// # Examples
///
/// ```rust
/// use llm_stack::domain::ResourceName;
///
/// let name = ResourceName::new("llm-vpc-network").unwrap();
/// assert_eq!(name.as_str(), "llm-vpc-network");
///
/// assert!(ResourceName::new("LLM").is_err()); // Uppercase
/// assert!(ResourceName::new("1vm").is_err()); // Starts with digit
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceName(String);

impl ResourceName {
    /// Maximum length for a resource name (RFC 1035 label)
    pub const MAX_LENGTH: usize = 63;

    /// Create a new resource name with validation
    pub fn new(name: impl Into<String>) -> Result<Self, NameError> {
        let name = name.into();
        validate_label(&name)?;
        Ok(Self(name))
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive a child name by appending a suffix
    ///
    /// Used for the subnet and firewall rules named after the network.
    pub fn with_suffix(&self, suffix: &str) -> Result<Self, NameError> {
        Self::new(format!("{}-{}", self.0, suffix))
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ResourceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ResourceName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ResourceName {
    type Error = NameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Network tag value object
///
/// Tags attach to instances and select firewall rule targets. Same lexical
/// rules as [`ResourceName`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkTag(String);

impl NetworkTag {
    /// Create a new network tag with validation
    pub fn new(tag: impl Into<String>) -> Result<Self, NameError> {
        let tag = tag.into();
        validate_label(&tag)?;
        Ok(Self(tag))
    }

    /// Get the tag as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NetworkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NetworkTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
