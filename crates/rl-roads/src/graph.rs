//! Mutable road adjacency graph.
//!
//! # Data layout
//!
//! One [`RoadNode`] per road tile, keyed by cell in an `FxHashMap`.  A node
//! stores its links as a 4-bit mask indexed by [`Direction::bit`], so the
//! neighbour set needs no allocation and iterating it is four branch checks.
//!
//! # Symmetry
//!
//! `insert` and `remove` always touch both ends of an edge, so between calls
//! the graph satisfies: `b ∈ neighbors(a)` ⇔ `a ∈ neighbors(b)`.
//! [`RoadGraph::is_symmetric`] re-checks this from scratch.

use rustc_hash::FxHashMap;

use rl_core::{Direction, GridCoord};

// ── RoadNode ──────────────────────────────────────────────────────────────────

/// A road tile and the cardinal neighbours it is connected to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoadNode {
    pub pos: GridCoord,
    links: u8,
}

impl RoadNode {
    fn new(pos: GridCoord) -> Self {
        Self { pos, links: 0 }
    }

    #[inline]
    pub fn is_linked(&self, dir: Direction) -> bool {
        self.links & dir.bit() != 0
    }

    /// Number of connected neighbours (0..=4).
    #[inline]
    pub fn degree(&self) -> usize {
        self.links.count_ones() as usize
    }

    /// Connected neighbour cells, in [`Direction::ALL`] order.
    pub fn neighbors(&self) -> impl Iterator<Item = GridCoord> + '_ {
        Direction::ALL
            .into_iter()
            .filter(|&d| self.is_linked(d))
            .map(|d| self.pos.step(d))
    }

    #[inline]
    fn link(&mut self, dir: Direction) {
        self.links |= dir.bit();
    }

    #[inline]
    fn unlink(&mut self, dir: Direction) {
        self.links &= !dir.bit();
    }
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Undirected 4-connected road graph.  The single source of truth for road
/// connectivity; pathfinding only borrows it.
#[derive(Clone, Debug, Default)]
pub struct RoadGraph {
    nodes: FxHashMap<GridCoord, RoadNode>,
}

impl RoadGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from an enumeration of road tiles.
    pub fn from_tiles<I: IntoIterator<Item = GridCoord>>(tiles: I) -> Self {
        let mut graph = Self::new();
        graph.rebuild(tiles);
        graph
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Add a road node at `pos` and link it to every existing cardinal
    /// neighbour.  Returns `false` (and changes nothing) if `pos` is already
    /// a node.
    pub fn insert(&mut self, pos: GridCoord) -> bool {
        if self.nodes.contains_key(&pos) {
            return false;
        }
        let mut node = RoadNode::new(pos);
        for dir in Direction::ALL {
            if let Some(other) = self.nodes.get_mut(&pos.step(dir)) {
                other.link(dir.opposite());
                node.link(dir);
            }
        }
        self.nodes.insert(pos, node);
        true
    }

    /// Remove the node at `pos` along with the back-edge held by each of its
    /// neighbours.  Returns `false` if `pos` was not a node.
    pub fn remove(&mut self, pos: GridCoord) -> bool {
        let Some(node) = self.nodes.remove(&pos) else {
            return false;
        };
        for dir in Direction::ALL {
            if node.is_linked(dir) {
                if let Some(other) = self.nodes.get_mut(&pos.step(dir)) {
                    other.unlink(dir.opposite());
                }
            }
        }
        true
    }

    /// Discard everything and re-insert `tiles`.  The result does not depend
    /// on enumeration order; duplicates are ignored.
    pub fn rebuild<I: IntoIterator<Item = GridCoord>>(&mut self, tiles: I) {
        self.nodes.clear();
        for pos in tiles {
            self.insert(pos);
        }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn contains(&self, pos: GridCoord) -> bool {
        self.nodes.contains_key(&pos)
    }

    #[inline]
    pub fn node(&self, pos: GridCoord) -> Option<&RoadNode> {
        self.nodes.get(&pos)
    }

    /// Connected neighbours of `pos`; empty when `pos` is not a node.
    pub fn neighbors(&self, pos: GridCoord) -> impl Iterator<Item = GridCoord> + '_ {
        self.nodes.get(&pos).into_iter().flat_map(RoadNode::neighbors)
    }

    /// Degree of `pos`, or `None` when `pos` is not a node.
    pub fn degree(&self, pos: GridCoord) -> Option<usize> {
        self.nodes.get(&pos).map(RoadNode::degree)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node positions, in unspecified order.
    pub fn nodes(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.nodes.keys().copied()
    }

    /// Total undirected edge count.
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(RoadNode::degree).sum::<usize>() / 2
    }

    /// `true` when every link has a live node at its far end and that node
    /// links back, and no two adjacent nodes are left unlinked.
    pub fn is_symmetric(&self) -> bool {
        self.nodes.values().all(|node| {
            Direction::ALL.into_iter().all(|dir| {
                let far = self.nodes.get(&node.pos.step(dir));
                match (node.is_linked(dir), far) {
                    (true, Some(other)) => other.is_linked(dir.opposite()),
                    (true, None) => false,
                    (false, Some(_)) => false,
                    (false, None) => true,
                }
            })
        })
    }
}
