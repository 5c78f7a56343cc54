//! Outstanding delivery requests.
//!
//! Requests live in two places: a flat list in submission order and a
//! per-resource bucket.  Matching only ever needs the requests of one
//! resource, so it reads a single bucket instead of scanning everything.
//! Both structures are always updated together.

use rustc_hash::FxHashMap;
use tracing::debug;

use rl_core::{ResourceType, StructureId};

use crate::request::{RequestKey, ResourceRequest};

#[derive(Clone, Debug, Default)]
pub struct RequestBoard {
    active:  Vec<ResourceRequest>,
    by_type: FxHashMap<ResourceType, Vec<ResourceRequest>>,
}

impl RequestBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a request.  Returns `false` without changing anything if a
    /// request with the same key is already active.
    pub fn submit(&mut self, request: ResourceRequest) -> bool {
        let bucket = self.by_type.entry(request.resource).or_default();
        if bucket.iter().any(|r| r.requester == request.requester) {
            return false;
        }
        bucket.push(request);
        self.active.push(request);
        debug!(
            requester = %request.requester,
            resource = %request.resource,
            priority = %request.priority,
            "request submitted"
        );
        true
    }

    /// Remove a request.  The bucket of its resource is dropped once empty.
    pub fn withdraw(&mut self, key: RequestKey) -> Option<ResourceRequest> {
        let bucket = self.by_type.get_mut(&key.resource)?;
        let idx = bucket.iter().position(|r| r.requester == key.requester)?;
        let request = bucket.remove(idx);
        if bucket.is_empty() {
            self.by_type.remove(&key.resource);
        }
        self.active.retain(|r| r.key() != key);
        debug!(requester = %key.requester, resource = %key.resource, "request withdrawn");
        Some(request)
    }

    /// Withdraw every request posted by `requester`, e.g. when it is
    /// demolished.
    pub fn withdraw_all_for(&mut self, requester: StructureId) -> Vec<ResourceRequest> {
        let keys: Vec<RequestKey> = self
            .active
            .iter()
            .filter(|r| r.requester == requester)
            .map(ResourceRequest::key)
            .collect();
        keys.into_iter().filter_map(|k| self.withdraw(k)).collect()
    }

    /// Active requests for `resource`, in submission order.
    pub fn candidates_for(&self, resource: ResourceType) -> &[ResourceRequest] {
        self.by_type.get(&resource).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, key: RequestKey) -> Option<&ResourceRequest> {
        self.candidates_for(key.resource).iter().find(|r| r.requester == key.requester)
    }

    pub fn contains(&self, key: RequestKey) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// All active requests in submission order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceRequest> {
        self.active.iter()
    }

    /// Resources with at least one active request.
    pub fn resource_types(&self) -> impl Iterator<Item = ResourceType> + '_ {
        self.by_type.keys().copied()
    }
}
