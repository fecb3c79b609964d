// Copyright (c) 2025 - Cowboy AI, Inc.
//! Region and Zone Value Objects

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Location validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Region is empty")]
    EmptyRegion,

    #[error("Invalid region format: {0}")]
    InvalidRegion(String),

    #[error("Invalid zone format: {0} (expected <region>-<letter>)")]
    InvalidZone(String),

    #[error("Zone {zone} does not belong to region {region}")]
    ZoneOutsideRegion { zone: String, region: String },
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

/// Cloud region value object
///
/// Lowercase dash-separated identifier, e.g. `asia-southeast1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(String);

impl Region {
    /// Create a new region with validation
    pub fn new(region: impl Into<String>) -> Result<Self, LocationError> {
        let region = region.into();

        if region.is_empty() {
            return Err(LocationError::EmptyRegion);
        }

        if !region.split('-').all(is_valid_segment) {
            return Err(LocationError::InvalidRegion(region));
        }

        Ok(Self(region))
    }

    /// Get the region as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Region {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Cloud zone value object
///
/// A zone is a region plus a single-letter suffix, e.g. `asia-southeast1-a`.
/// Invariants:
/// - Region part follows [`Region`] rules
/// - Suffix is exactly one lowercase letter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Zone(String);

impl Zone {
    /// Create a new zone with validation
    pub fn new(zone: impl Into<String>) -> Result<Self, LocationError> {
        let zone = zone.into();

        let (region_part, suffix) = zone
            .rsplit_once('-')
            .ok_or_else(|| LocationError::InvalidZone(zone.clone()))?;

        if suffix.len() != 1 || !suffix.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(LocationError::InvalidZone(zone.clone()));
        }

        Region::new(region_part).map_err(|_| LocationError::InvalidZone(zone.clone()))?;

        Ok(Self(zone))
    }

    /// Get the zone as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive the parent region by stripping the zone suffix
    pub fn region(&self) -> Region {
        match self.0.rsplit_once('-') {
            Some((region_part, _)) => Region(region_part.to_string()),
            None => Region(self.0.clone()),
        }
    }

    /// Check that this zone belongs to the given region
    pub fn ensure_in_region(&self, region: &Region) -> Result<(), LocationError> {
        if self.region() != *region {
            return Err(LocationError::ZoneOutsideRegion {
                zone: self.0.clone(),
                region: region.as_str().to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Zone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
