//! The output of a path query.

use rl_core::GridCoord;

/// An ordered, cycle-free run of road cells from a start to a goal.
///
/// Consecutive cells are cardinal neighbours, so the BFS distance from the
/// start grows by exactly one per cell.  A path always holds at least one
/// cell; a one-cell path means start and goal coincide.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryPath {
    cells: Vec<GridCoord>,
}

impl DeliveryPath {
    /// Assemble a path produced by the search.  Callers guarantee the
    /// invariants.
    pub(crate) fn from_search(cells: Vec<GridCoord>) -> Self {
        debug_assert!(!cells.is_empty());
        Self { cells }
    }

    /// Validate and wrap an externally built cell list.  Returns `None` when
    /// the list is empty, repeats a cell, or contains a non-cardinal step.
    pub fn from_cells(cells: Vec<GridCoord>) -> Option<Self> {
        if cells.is_empty() {
            return None;
        }
        let adjacent = cells.windows(2).all(|w| w[0].manhattan(w[1]) == 1);
        let mut sorted = cells.clone();
        sorted.sort_unstable();
        sorted.dedup();
        (adjacent && sorted.len() == cells.len()).then_some(Self { cells })
    }

    #[inline]
    pub fn cells(&self) -> &[GridCoord] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<GridCoord> {
        self.cells
    }

    pub fn start(&self) -> GridCoord {
        self.cells[0]
    }

    pub fn end(&self) -> GridCoord {
        self.cells[self.cells.len() - 1]
    }

    /// Number of cells, start and end included.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of edges walked: `cell_count() - 1`.
    #[inline]
    pub fn steps(&self) -> usize {
        self.cells.len() - 1
    }
}
