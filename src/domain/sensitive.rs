// Copyright (c) 2025 - Cowboy AI, Inc.
//! Sensitive Value Wrapper
//!
//! Wraps an operator-supplied value that must never surface in logs,
//! serialized output, or error messages. `Debug`, `Display`, and `Serialize`
//! all emit a redaction marker; the inner value is only reachable through
//! [`Sensitive::reveal`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Marker emitted wherever a sensitive value would otherwise appear
pub const REDACTED: &str = "[redacted]";

/// Wrapper for values that must not appear in logs or rendered output
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    /// Wrap a value
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Access the inner value
    ///
    /// Call sites that reveal the value are the audit surface; keep them few.
    pub fn reveal(&self) -> &T {
        &self.0
    }

    /// Unwrap the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> Serialize for Sensitive<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(REDACTED)
    }
}

impl<'de, T> Deserialize<'de> for Sensitive<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Sensitive)
    }
}

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}
