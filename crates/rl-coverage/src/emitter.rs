use std::fmt;

use serde::{Deserialize, Serialize};

use rl_core::Site;

/// Game-defined service category (water, market, safety, …).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[derive(Serialize, Deserialize)]
pub struct ServiceKind(pub u16);

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceKind({})", self.0)
    }
}

/// A service source: what it provides, where it stands, how far it reaches.
#[derive(Clone, Copy, Debug, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct Emitter {
    pub kind:   ServiceKind,
    pub site:   Site,
    /// Reach in world units; divided by the cell size to get road steps.
    pub radius: f32,
}

impl Emitter {
    pub fn new(kind: ServiceKind, site: Site, radius: f32) -> Self {
        Self { kind, site, radius }
    }
}
