//! Buffer-level hysteresis for consumer requests.
//!
//! A consumer posts a request once a buffer drops to `request_at` of its
//! capacity and withdraws it only after refilling to `fulfill_at`.  The gap
//! between the two keeps a buffer hovering near one threshold from flapping
//! requests on and off every tick.

use rustc_hash::FxHashSet;

use rl_core::{GridCoord, ResourceType, StructureId};

use crate::board::RequestBoard;
use crate::request::{Priority, RequestKey, ResourceRequest};
use crate::{LogisticsError, LogisticsResult};

/// Fill ratios at which requests open and close.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DemandThresholds {
    pub request_at: f32,
    pub fulfill_at: f32,
}

impl Default for DemandThresholds {
    fn default() -> Self {
        Self { request_at: 0.25, fulfill_at: 0.8 }
    }
}

impl DemandThresholds {
    pub fn new(request_at: f32, fulfill_at: f32) -> LogisticsResult<Self> {
        let valid = (0.0..=1.0).contains(&request_at)
            && (0.0..=1.0).contains(&fulfill_at)
            && request_at < fulfill_at;
        if valid {
            Ok(Self { request_at, fulfill_at })
        } else {
            Err(LogisticsError::InvalidThresholds { request_at, fulfill_at })
        }
    }
}

/// What an observation did to the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DemandChange {
    Requested(ResourceType),
    Fulfilled(ResourceType),
}

/// Request state of one consumer structure.
#[derive(Clone, Debug)]
pub struct DemandTracker {
    requester:   StructureId,
    destination: GridCoord,
    priority:    Priority,
    thresholds:  DemandThresholds,
    open:        FxHashSet<ResourceType>,
}

impl DemandTracker {
    pub fn new(requester: StructureId, destination: GridCoord, priority: Priority) -> Self {
        Self {
            requester,
            destination,
            priority,
            thresholds: DemandThresholds::default(),
            open: FxHashSet::default(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: DemandThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Feed the current level of one buffer.  Slots with no capacity are
    /// ignored.  If the board already holds a request under this tracker's
    /// key, the resource is not marked open and nothing is reported.
    pub fn observe(
        &mut self,
        resource: ResourceType,
        amount: f32,
        capacity: f32,
        board: &mut RequestBoard,
    ) -> Option<DemandChange> {
        if capacity <= 0.0 {
            return None;
        }
        let fill = amount / capacity;
        let open = self.open.contains(&resource);

        if !open && fill <= self.thresholds.request_at {
            let request =
                ResourceRequest::new(self.requester, resource, self.priority, self.destination);
            if !board.submit(request) {
                return None;
            }
            self.open.insert(resource);
            Some(DemandChange::Requested(resource))
        } else if open && fill >= self.thresholds.fulfill_at {
            board.withdraw(self.key(resource));
            self.open.remove(&resource);
            Some(DemandChange::Fulfilled(resource))
        } else {
            None
        }
    }

    /// Withdraw everything this tracker has open.
    pub fn cancel_all(&mut self, board: &mut RequestBoard) {
        for resource in self.open.drain() {
            board.withdraw(RequestKey { requester: self.requester, resource });
        }
    }

    /// The structure moved; later requests point at `destination`.
    pub fn set_destination(&mut self, destination: GridCoord) {
        self.destination = destination;
    }

    pub fn is_requesting(&self) -> bool {
        !self.open.is_empty()
    }

    pub fn is_open(&self, resource: ResourceType) -> bool {
        self.open.contains(&resource)
    }

    fn key(&self, resource: ResourceType) -> RequestKey {
        RequestKey { requester: self.requester, resource }
    }
}
