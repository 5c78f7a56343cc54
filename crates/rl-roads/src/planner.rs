//! Site-to-site path planning.
//!
//! # Pluggability
//!
//! `rl-mobility` asks for delivery paths through the [`PathPlanner`] trait,
//! so a game can substitute its own planner (lane rules, one-way roads,
//! congestion) without touching the engine.  The default [`BfsPlanner`]
//! walks the unit-cost road graph.

use rl_core::{LogisticsConfig, Site};

use crate::graph::RoadGraph;
use crate::path::DeliveryPath;
use crate::pathfinder::Pathfinder;

// ── PathPlanner trait ─────────────────────────────────────────────────────────

/// Pluggable path planner.
pub trait PathPlanner {
    /// A road path from one of `from`'s access points to the nearest access
    /// point of `to`, or `None` when the sites share no road network.
    fn plan(&self, graph: &RoadGraph, from: &Site, to: &Site) -> Option<DeliveryPath>;
}

// ── BfsPlanner ────────────────────────────────────────────────────────────────

/// Shortest path by step count between the access-point sets of two sites.
#[derive(Clone, Copy, Debug)]
pub struct BfsPlanner {
    pub fallback_radius: u32,
    pub max_path_len:    usize,
}

impl Default for BfsPlanner {
    fn default() -> Self {
        Self {
            fallback_radius: Pathfinder::DEFAULT_FALLBACK_RADIUS,
            max_path_len:    Pathfinder::DEFAULT_MAX_PATH_LEN,
        }
    }
}

impl BfsPlanner {
    pub fn from_config(config: &LogisticsConfig) -> Self {
        Self {
            fallback_radius: config.access_fallback_radius,
            max_path_len:    config.max_path_len,
        }
    }
}

impl PathPlanner for BfsPlanner {
    fn plan(&self, graph: &RoadGraph, from: &Site, to: &Site) -> Option<DeliveryPath> {
        let finder = Pathfinder::with_limits(graph, self.fallback_radius, self.max_path_len);
        let starts = finder.access_points(from);
        if starts.is_empty() {
            return None;
        }
        let goals = finder.access_points(to);
        finder.path_between(&starts, &goals)
    }
}
