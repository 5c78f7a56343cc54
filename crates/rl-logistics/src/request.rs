//! Delivery request types.

use std::fmt;

use serde::{Deserialize, Serialize};

use rl_core::{GridCoord, ResourceType, StructureId};

use crate::{LogisticsError, LogisticsResult};

// ── Priority ──────────────────────────────────────────────────────────────────

/// Request urgency in `1..=5`; higher is served first.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[derive(Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const MIN: Priority = Priority(1);
    pub const MAX: Priority = Priority(5);

    pub fn new(value: u8) -> LogisticsResult<Self> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Priority(value))
        } else {
            Err(LogisticsError::InvalidPriority(value))
        }
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority(3)
    }
}

impl TryFrom<u8> for Priority {
    type Error = LogisticsError;
    fn try_from(value: u8) -> LogisticsResult<Self> {
        Priority::new(value)
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> u8 {
        p.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

// ── ResourceRequest ───────────────────────────────────────────────────────────

/// Identity of a request: one outstanding request per resource per requester.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct RequestKey {
    pub requester: StructureId,
    pub resource:  ResourceType,
}

/// A consumer asking for deliveries of one resource to one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
pub struct ResourceRequest {
    pub requester:   StructureId,
    pub resource:    ResourceType,
    pub priority:    Priority,
    /// Drop-off cell, usually the requester's root cell.  Resolved to a site
    /// (and from there to access points) when matching.
    pub destination: GridCoord,
}

impl ResourceRequest {
    pub fn new(
        requester: StructureId,
        resource: ResourceType,
        priority: Priority,
        destination: GridCoord,
    ) -> Self {
        Self { requester, resource, priority, destination }
    }

    #[inline]
    pub fn key(&self) -> RequestKey {
        RequestKey { requester: self.requester, resource: self.resource }
    }
}
