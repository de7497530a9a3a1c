// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Participant identity (128-bit UUID).

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

/// Globally unique identifier of one participant instance.
///
/// Ordering is the byte-wise ordering of the underlying 128-bit value, which
/// is also the iteration order of the graph cache.
///
/// # Display Format
/// Hyphenated lowercase UUID: "67e55044-10b1-426f-9247-bb680e5fe0c8"
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Identity(Uuid);

impl Identity {
    /// Generate a fresh random identity (UUID v4).
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an identity from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// All-zero identity (placeholder, never generated by `random`).
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl FromStr for Identity {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self)
    }
}
