//! Grid geometry: cells, cardinal directions, rotated building footprints.
//!
//! The settlement lives on a 4-connected planar grid.  `GridCoord` uses
//! `i32` so cells left of or below the origin stay representable; footprint
//! perimeters routinely step one cell outside the map.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── GridCoord ─────────────────────────────────────────────────────────────────

/// An integer `(x, y)` cell on the settlement grid.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[derive(Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell one step away in direction `dir`.
    #[inline]
    pub fn step(self, dir: Direction) -> GridCoord {
        let (dx, dy) = dir.offset();
        GridCoord::new(self.x + dx, self.y + dy)
    }

    /// The four cardinal neighbours, in [`Direction::ALL`] order.
    pub fn cardinal_neighbors(self) -> impl Iterator<Item = GridCoord> {
        Direction::ALL.into_iter().map(move |d| self.step(d))
    }

    /// Taxicab distance, i.e. the BFS ring index on an unobstructed grid.
    #[inline]
    pub fn manhattan(self, other: GridCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for GridCoord {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        GridCoord::new(x, y)
    }
}

// ── Direction ─────────────────────────────────────────────────────────────────

/// One of the four cardinal offsets.  North is `+y`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    North,
    South,
    West,
    East,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    #[inline]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::West  => (-1, 0),
            Direction::East  => (1, 0),
        }
    }

    #[inline]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West  => Direction::East,
            Direction::East  => Direction::West,
        }
    }

    /// Single-bit mask used by adjacency sets.
    #[inline]
    pub const fn bit(self) -> u8 {
        match self {
            Direction::North => 0b0001,
            Direction::South => 0b0010,
            Direction::West  => 0b0100,
            Direction::East  => 0b1000,
        }
    }

    /// The direction that leads from `from` to the adjacent cell `to`, or
    /// `None` when the cells are not cardinal neighbours.
    pub fn between(from: GridCoord, to: GridCoord) -> Option<Direction> {
        Direction::ALL.into_iter().find(|&d| from.step(d) == to)
    }
}

// ── Rotation ──────────────────────────────────────────────────────────────────

/// Building rotation around the vertical axis, snapped to quarter turns.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[derive(Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Snap an arbitrary yaw in degrees to the nearest quarter turn.
    pub fn from_degrees(degrees: f32) -> Rotation {
        let quarter = (degrees.rem_euclid(360.0) / 90.0).round() as i32 % 4;
        match quarter {
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            3 => Rotation::Deg270,
            _ => Rotation::Deg0,
        }
    }

    /// `true` when width and height trade places (90° and 270°).
    #[inline]
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

// ── Footprint ─────────────────────────────────────────────────────────────────

/// The rectangle a structure occupies: root cell, unrotated size, rotation.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[derive(Serialize, Deserialize)]
pub struct Footprint {
    /// Lowest-x, lowest-y occupied cell.
    pub root: GridCoord,
    pub width: u32,
    pub height: u32,
    pub rotation: Rotation,
}

impl Footprint {
    /// Sizes below 1 are clamped to 1; a structure always covers its root.
    pub fn new(root: GridCoord, width: u32, height: u32, rotation: Rotation) -> Self {
        Self { root, width: width.max(1), height: height.max(1), rotation }
    }

    /// A 1×1 footprint at `root`.
    pub fn single(root: GridCoord) -> Self {
        Self::new(root, 1, 1, Rotation::Deg0)
    }

    /// `(width, height)` on the grid after applying the rotation.
    #[inline]
    pub fn rotated_size(&self) -> (u32, u32) {
        if self.rotation.swaps_axes() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    /// Exclusive upper corner of the occupied rectangle.
    fn max_corner(&self) -> GridCoord {
        let (w, h) = self.rotated_size();
        GridCoord::new(self.root.x + w as i32, self.root.y + h as i32)
    }

    pub fn contains(&self, cell: GridCoord) -> bool {
        let max = self.max_corner();
        cell.x >= self.root.x && cell.x < max.x && cell.y >= self.root.y && cell.y < max.y
    }

    /// Every occupied cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = GridCoord> + '_ {
        let max = self.max_corner();
        (self.root.y..max.y)
            .flat_map(move |y| (self.root.x..max.x).map(move |x| GridCoord::new(x, y)))
    }

    /// The ring of cells one step outside the footprint, corners included.
    ///
    /// Order: top and bottom rows column by column, then the left and right
    /// columns between them.
    pub fn perimeter(&self) -> Vec<GridCoord> {
        let (w, h) = self.rotated_size();
        let min_x = self.root.x - 1;
        let max_x = self.root.x + w as i32;
        let min_y = self.root.y - 1;
        let max_y = self.root.y + h as i32;

        let mut ring = Vec::with_capacity(2 * (w as usize + 2) + 2 * h as usize);
        for x in min_x..=max_x {
            ring.push(GridCoord::new(x, max_y));
            ring.push(GridCoord::new(x, min_y));
        }
        for y in (min_y + 1)..max_y {
            ring.push(GridCoord::new(min_x, y));
            ring.push(GridCoord::new(max_x, y));
        }
        ring
    }
}

// ── Site ──────────────────────────────────────────────────────────────────────

/// Something that needs road access: a bare cell (a cart, a map point) or a
/// structure footprint.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[derive(Serialize, Deserialize)]
pub enum Site {
    Cell(GridCoord),
    Structure(Footprint),
}

impl Site {
    /// The cell fallback searches radiate from.
    #[inline]
    pub fn anchor(&self) -> GridCoord {
        match self {
            Site::Cell(c) => *c,
            Site::Structure(fp) => fp.root,
        }
    }
}

impl From<GridCoord> for Site {
    fn from(cell: GridCoord) -> Self {
        Site::Cell(cell)
    }
}

impl From<Footprint> for Site {
    fn from(fp: Footprint) -> Self {
        Site::Structure(fp)
    }
}
