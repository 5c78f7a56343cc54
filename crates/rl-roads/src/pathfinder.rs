//! Breadth-first queries over a borrowed [`RoadGraph`].
//!
//! # Design
//!
//! `Pathfinder` holds no cache.  Each query runs a fresh BFS against the
//! graph as it is right now, so a road placed this tick is visible to the
//! very next query.  Bounded searches stop expanding at `max_steps`, keeping
//! their cost proportional to the area they cover rather than to the size of
//! the whole network.
//!
//! # Access points
//!
//! Structures are not road nodes themselves.  [`Pathfinder::access_points`]
//! maps a [`Site`] to every road node touching it, and every site-level query
//! (matching, coverage, network membership) seeds a multi-source BFS from
//! that whole set.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, error, warn};

use rl_core::{GridCoord, LogisticsConfig, Site};

use crate::graph::RoadGraph;
use crate::path::DeliveryPath;
use crate::PathDefect;

/// BFS step count per reached road cell.
pub type DistanceMap = FxHashMap<GridCoord, u32>;

/// Parent pointers of a BFS tree.  Roots point at themselves.
pub(crate) type ParentMap = FxHashMap<GridCoord, GridCoord>;

// ── Pathfinder ────────────────────────────────────────────────────────────────

/// Stateless query layer over a road graph.
#[derive(Clone, Copy, Debug)]
pub struct Pathfinder<'g> {
    graph:           &'g RoadGraph,
    fallback_radius: u32,
    max_path_len:    usize,
}

impl<'g> Pathfinder<'g> {
    /// Flood-fill radius used when a site has no road on its perimeter.
    pub const DEFAULT_FALLBACK_RADIUS: u32 = 5;
    /// Upper bound on cells walked while reconstructing one path.
    pub const DEFAULT_MAX_PATH_LEN: usize = 10_000;

    pub fn new(graph: &'g RoadGraph) -> Self {
        Self::with_limits(graph, Self::DEFAULT_FALLBACK_RADIUS, Self::DEFAULT_MAX_PATH_LEN)
    }

    pub fn with_limits(graph: &'g RoadGraph, fallback_radius: u32, max_path_len: usize) -> Self {
        Self { graph, fallback_radius, max_path_len: max_path_len.max(1) }
    }

    pub fn from_config(graph: &'g RoadGraph, config: &LogisticsConfig) -> Self {
        Self::with_limits(graph, config.access_fallback_radius, config.max_path_len)
    }

    #[inline]
    pub fn graph(&self) -> &'g RoadGraph {
        self.graph
    }

    // ── Reachability & distances ──────────────────────────────────────────

    /// `true` if a road path connects `start` and `end`.  Both must be road
    /// nodes.  Stops as soon as `end` is discovered.
    pub fn reachable(&self, start: GridCoord, end: GridCoord) -> bool {
        if !self.graph.contains(start) || !self.graph.contains(end) {
            return false;
        }
        if start == end {
            return true;
        }

        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::new();
        visited.insert(start);
        queue.push_back(start);

        while let Some(cur) = queue.pop_front() {
            for nb in self.graph.neighbors(cur) {
                if nb == end {
                    return true;
                }
                if visited.insert(nb) {
                    queue.push_back(nb);
                }
            }
        }
        false
    }

    /// Step distance from `start` to every node within `max_steps`.
    ///
    /// Empty when `start` is not a road node.
    pub fn distances(&self, start: GridCoord, max_steps: u32) -> DistanceMap {
        self.distances_multi([start], max_steps)
    }

    /// Like [`distances`](Self::distances) but every valid start is seeded at
    /// distance 0.  Non-road starts are skipped and duplicates ignored.  Each
    /// cell's value is the minimum over all starts.
    pub fn distances_multi<I>(&self, starts: I, max_steps: u32) -> DistanceMap
    where
        I: IntoIterator<Item = GridCoord>,
    {
        let mut dist = DistanceMap::default();
        let mut queue = VecDeque::new();

        for s in starts {
            if self.graph.contains(s) && !dist.contains_key(&s) {
                dist.insert(s, 0);
                queue.push_back((s, 0u32));
            }
        }

        while let Some((cur, d)) = queue.pop_front() {
            if d >= max_steps {
                continue;
            }
            for nb in self.graph.neighbors(cur) {
                if !dist.contains_key(&nb) {
                    dist.insert(nb, d + 1);
                    queue.push_back((nb, d + 1));
                }
            }
        }
        dist
    }

    // ── Paths ─────────────────────────────────────────────────────────────

    /// Shortest road path from `start` to `end`, both inclusive.
    ///
    /// `None` when either cell is not a road node, when no path exists, or
    /// when the parent chain turns out to be inconsistent (logged).
    pub fn reconstruct_path(&self, start: GridCoord, end: GridCoord) -> Option<DeliveryPath> {
        if !self.graph.contains(start) || !self.graph.contains(end) {
            return None;
        }
        self.search([start], |c| c == end)
    }

    /// Shortest road path from any of `starts` to the nearest of `goals`.
    pub fn path_between(&self, starts: &[GridCoord], goals: &[GridCoord]) -> Option<DeliveryPath> {
        let goals: FxHashSet<GridCoord> =
            goals.iter().copied().filter(|&g| self.graph.contains(g)).collect();
        if goals.is_empty() {
            return None;
        }
        self.search(starts.iter().copied(), |c| goals.contains(&c))
    }

    fn search<I, F>(&self, starts: I, is_goal: F) -> Option<DeliveryPath>
    where
        I: IntoIterator<Item = GridCoord>,
        F: Fn(GridCoord) -> bool,
    {
        let mut parents = ParentMap::default();
        let mut queue = VecDeque::new();

        for s in starts {
            if self.graph.contains(s) && !parents.contains_key(&s) {
                parents.insert(s, s);
                queue.push_back(s);
            }
        }

        while let Some(cur) = queue.pop_front() {
            if is_goal(cur) {
                return match walk_parents(&parents, cur, self.max_path_len) {
                    Ok(cells) => Some(DeliveryPath::from_search(cells)),
                    Err(defect @ PathDefect::TooLong { .. }) => {
                        warn!(%cur, %defect, "path reconstruction aborted");
                        None
                    }
                    Err(defect) => {
                        error!(%cur, %defect, "inconsistent BFS parent chain");
                        None
                    }
                };
            }
            for nb in self.graph.neighbors(cur) {
                if !parents.contains_key(&nb) {
                    parents.insert(nb, cur);
                    queue.push_back(nb);
                }
            }
        }
        None
    }

    // ── Access points ─────────────────────────────────────────────────────

    /// Every road node a site can be entered from.
    ///
    /// * `Cell(c)`: `c` itself if it is a road, then its four neighbours.
    /// * `Structure(fp)`: the root cell if it is a road, then every road on
    ///   the one-cell ring around the rotated footprint, corners included.
    ///
    /// When that yields nothing, a cardinal flood fill from the site's anchor
    /// returns every road in the nearest ring within the fallback radius.
    pub fn access_points(&self, site: &Site) -> Vec<GridCoord> {
        if self.graph.is_empty() {
            return Vec::new();
        }

        let mut found = Vec::new();
        let mut seen = FxHashSet::default();
        let mut take = |cell: GridCoord| {
            if self.graph.contains(cell) && seen.insert(cell) {
                found.push(cell);
            }
        };

        match site {
            Site::Cell(cell) => {
                take(*cell);
                cell.cardinal_neighbors().for_each(&mut take);
            }
            Site::Structure(fp) => {
                take(fp.root);
                fp.perimeter().into_iter().for_each(&mut take);
            }
        }

        if found.is_empty() {
            warn!(anchor = %site.anchor(), "no road next to site, searching wider");
            found = self.nearest_roads(site.anchor());
        }
        found
    }

    /// Cardinal flood fill over grid cells (road or not) from `center`,
    /// returning every road node in the first ring that has one.
    fn nearest_roads(&self, center: GridCoord) -> Vec<GridCoord> {
        let radius = self.fallback_radius;
        let mut found = Vec::new();
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::new();
        let mut hit_ring: Option<u32> = None;

        visited.insert(center);
        queue.push_back((center, 0u32));

        while let Some((cur, d)) = queue.pop_front() {
            if hit_ring.is_some_and(|ring| d > ring) {
                break;
            }
            if self.graph.contains(cur) {
                found.push(cur);
                hit_ring = Some(d);
                continue;
            }
            if d >= radius {
                continue;
            }
            for nb in cur.cardinal_neighbors() {
                if visited.insert(nb) {
                    queue.push_back((nb, d + 1));
                }
            }
        }

        match hit_ring {
            Some(ring) => debug!(%center, ring, count = found.len(), "fallback found roads"),
            None => warn!(%center, radius, "no road within fallback radius"),
        }
        found
    }

    // ── Networks ──────────────────────────────────────────────────────────

    /// Every node reachable from the access points of any of `sites`, with
    /// its distance to the nearest one.
    pub fn component_of(&self, sites: &[Site]) -> DistanceMap {
        let seeds: Vec<GridCoord> = sites.iter().flat_map(|s| self.access_points(s)).collect();
        self.distances_multi(seeds, u32::MAX)
    }

    /// `true` when some access point of `b` is reachable from an access
    /// point of `a`.  A site without access points shares no network.
    pub fn same_network(&self, a: &Site, b: &Site) -> bool {
        let targets = self.access_points(b);
        if targets.is_empty() {
            return false;
        }
        let component = self.component_of(std::slice::from_ref(a));
        targets.iter().any(|t| component.contains_key(t))
    }
}

// ── Parent walk ───────────────────────────────────────────────────────────────

/// Follow `parents` from `end` back to a root (a cell that is its own parent)
/// and return the cells root-first.
///
/// Rejects chains that revisit a cell, hit a cell without an entry, or grow
/// past `max_len` cells.
pub(crate) fn walk_parents(
    parents: &ParentMap,
    end: GridCoord,
    max_len: usize,
) -> Result<Vec<GridCoord>, PathDefect> {
    let mut path = Vec::new();
    let mut seen = FxHashSet::default();
    let mut current = end;

    loop {
        if path.len() >= max_len {
            return Err(PathDefect::TooLong { limit: max_len });
        }
        if !seen.insert(current) {
            return Err(PathDefect::Cycle { at: current });
        }
        let Some(&parent) = parents.get(&current) else {
            return Err(PathDefect::MissingParent { at: current });
        };
        path.push(current);
        if parent == current {
            break;
        }
        current = parent;
    }

    path.reverse();
    Ok(path)
}
