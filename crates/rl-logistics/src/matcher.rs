//! Pick the request a cart should serve next.

use rl_core::{GridQuery, ResourceType, Site};
use rl_roads::Pathfinder;

use crate::board::RequestBoard;
use crate::request::ResourceRequest;

/// A request together with its road distance from the querying agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchedRequest {
    pub request:  ResourceRequest,
    pub distance: u32,
}

/// Best outstanding request for an agent at `agent` carrying `resource`.
///
/// One multi-source BFS runs from the agent's access points, bounded by
/// `max_range_steps`; each candidate's distance is its nearest access point
/// in that map.  Reachable candidates rank by priority (high first), then
/// distance (short first); ties keep board order.
///
/// `locator` resolves each request's destination cell to the structure
/// standing on it, so the whole building perimeter counts as a drop-off.
pub fn best_request_for<L>(
    agent: &Site,
    resource: ResourceType,
    max_range_steps: u32,
    finder: &Pathfinder<'_>,
    board: &RequestBoard,
    locator: &L,
) -> Option<MatchedRequest>
where
    L: GridQuery + ?Sized,
{
    let candidates = board.candidates_for(resource);
    if candidates.is_empty() {
        return None;
    }

    let origin = finder.access_points(agent);
    if origin.is_empty() {
        return None;
    }
    let dist = finder.distances_multi(origin, max_range_steps);

    candidates
        .iter()
        .filter_map(|request| {
            let site = locator.site_at(request.destination);
            finder
                .access_points(&site)
                .iter()
                .filter_map(|p| dist.get(p).copied())
                .min()
                .map(|distance| MatchedRequest { request: *request, distance })
        })
        .min_by_key(|m| (std::cmp::Reverse(m.request.priority), m.distance))
}
