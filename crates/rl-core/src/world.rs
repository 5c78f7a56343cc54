//! Collaborator interfaces and an in-memory world.
//!
//! The engine never owns building or tile state.  It asks the grid and the
//! building registry through these traits:
//!
//! | Trait                 | Answers                                           |
//! |-----------------------|---------------------------------------------------|
//! | [`GridQuery`]         | road tiles, building footprints, road speed       |
//! | [`StructureRegistry`] | producers/consumers of a resource, liveness       |
//! | [`StructureHost`]     | moving a structure, pausing its production        |
//!
//! [`GridWorld`] implements all three over plain maps.  Headless runs and
//! tests use it; a game embeds the engine behind its own implementations.

use rustc_hash::FxHashMap;

use crate::{CoreError, CoreResult, Footprint, GridCoord, ResourceType, Site, StructureId};

// ── Traits ────────────────────────────────────────────────────────────────────

/// Read access to the tile grid.
pub trait GridQuery {
    fn is_road_at(&self, cell: GridCoord) -> bool;

    /// Footprint of the structure covering `cell`, if any.
    fn footprint_at(&self, cell: GridCoord) -> Option<Footprint>;

    /// Every road tile in the world, in any order.
    fn road_tiles(&self) -> Vec<GridCoord>;

    /// Travel speed multiplier of the road at `cell`.  Only travelling agents
    /// apply it; pathfinding treats all edges as unit cost.
    fn road_speed(&self, _cell: GridCoord) -> f32 {
        1.0
    }

    /// Resolve a cell to the site that owns it: the structure covering it,
    /// or the bare cell.
    fn site_at(&self, cell: GridCoord) -> Site {
        match self.footprint_at(cell) {
            Some(fp) => Site::Structure(fp),
            None => Site::Cell(cell),
        }
    }
}

/// Building registry: who makes and who needs each resource.
pub trait StructureRegistry {
    fn producers_of(&self, resource: ResourceType) -> Vec<StructureId>;
    fn consumers_of(&self, resource: ResourceType) -> Vec<StructureId>;

    /// Current site of a structure, or `None` once it has been destroyed.
    fn structure_site(&self, id: StructureId) -> Option<Site>;

    fn is_alive(&self, id: StructureId) -> bool {
        self.structure_site(id).is_some()
    }
}

/// Mutating hooks used by group-move transactions.
pub trait StructureHost {
    fn relocate(&mut self, id: StructureId, footprint: Footprint) -> CoreResult<()>;
    fn set_production_paused(&mut self, id: StructureId, paused: bool) -> CoreResult<()>;
    fn is_production_paused(&self, id: StructureId) -> bool;
}

// ── GridWorld ─────────────────────────────────────────────────────────────────

/// One building in the [`GridWorld`] arena.
#[derive(Clone, Debug, PartialEq)]
pub struct StructureRecord {
    pub footprint: Footprint,
    pub produces: Vec<ResourceType>,
    pub consumes: Vec<ResourceType>,
    pub production_paused: bool,
}

impl StructureRecord {
    pub fn new(footprint: Footprint) -> Self {
        Self {
            footprint,
            produces: Vec::new(),
            consumes: Vec::new(),
            production_paused: false,
        }
    }

    pub fn producing(mut self, resource: ResourceType) -> Self {
        self.produces.push(resource);
        self
    }

    pub fn consuming(mut self, resource: ResourceType) -> Self {
        self.consumes.push(resource);
        self
    }
}

/// In-memory grid plus a structure arena indexed by [`StructureId`].
///
/// Destroyed structures leave a `None` slot so handles are never reused.
#[derive(Default)]
pub struct GridWorld {
    /// Road tiles and their speed multipliers.
    roads: FxHashMap<GridCoord, f32>,
    structures: Vec<Option<StructureRecord>>,
    /// Cell → structure covering it.
    occupancy: FxHashMap<GridCoord, StructureId>,
}

impl GridWorld {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Roads ─────────────────────────────────────────────────────────────

    pub fn add_road(&mut self, cell: GridCoord) {
        self.add_road_with_speed(cell, 1.0);
    }

    pub fn add_road_with_speed(&mut self, cell: GridCoord, speed: f32) {
        self.roads.insert(cell, speed);
    }

    /// Lay a straight run of road from `from` to `to` inclusive.  The cells
    /// must share a row or a column.
    pub fn add_road_line(&mut self, from: GridCoord, to: GridCoord) {
        if from.x == to.x {
            for y in from.y.min(to.y)..=from.y.max(to.y) {
                self.add_road(GridCoord::new(from.x, y));
            }
        } else if from.y == to.y {
            for x in from.x.min(to.x)..=from.x.max(to.x) {
                self.add_road(GridCoord::new(x, from.y));
            }
        }
    }

    pub fn remove_road(&mut self, cell: GridCoord) -> bool {
        self.roads.remove(&cell).is_some()
    }

    // ── Structures ────────────────────────────────────────────────────────

    /// Place a structure and return its handle.
    pub fn add_structure(&mut self, record: StructureRecord) -> CoreResult<StructureId> {
        let id = StructureId::try_from(self.structures.len())
            .map_err(|_| CoreError::HandlesExhausted("structure"))?;
        for cell in record.footprint.cells() {
            self.occupancy.insert(cell, id);
        }
        self.structures.push(Some(record));
        Ok(id)
    }

    /// Remove a structure.  Its handle stays dead forever.
    pub fn destroy(&mut self, id: StructureId) -> bool {
        let Some(slot) = self.structures.get_mut(id.index()) else {
            return false;
        };
        let Some(record) = slot.take() else {
            return false;
        };
        for cell in record.footprint.cells() {
            if self.occupancy.get(&cell) == Some(&id) {
                self.occupancy.remove(&cell);
            }
        }
        true
    }

    pub fn structure(&self, id: StructureId) -> Option<&StructureRecord> {
        self.structures.get(id.index()).and_then(Option::as_ref)
    }

    fn structure_mut(&mut self, id: StructureId) -> CoreResult<&mut StructureRecord> {
        self.structures
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(CoreError::StructureNotFound(id))
    }

    /// Live structures with their handles.
    pub fn structures(&self) -> impl Iterator<Item = (StructureId, &StructureRecord)> {
        self.structures
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|r| (StructureId(i as u32), r)))
    }
}

impl GridQuery for GridWorld {
    fn is_road_at(&self, cell: GridCoord) -> bool {
        self.roads.contains_key(&cell)
    }

    fn footprint_at(&self, cell: GridCoord) -> Option<Footprint> {
        let id = self.occupancy.get(&cell)?;
        self.structure(*id).map(|r| r.footprint)
    }

    fn road_tiles(&self) -> Vec<GridCoord> {
        self.roads.keys().copied().collect()
    }

    fn road_speed(&self, cell: GridCoord) -> f32 {
        self.roads.get(&cell).copied().unwrap_or(1.0)
    }
}

impl StructureRegistry for GridWorld {
    fn producers_of(&self, resource: ResourceType) -> Vec<StructureId> {
        self.structures()
            .filter(|(_, r)| r.produces.contains(&resource))
            .map(|(id, _)| id)
            .collect()
    }

    fn consumers_of(&self, resource: ResourceType) -> Vec<StructureId> {
        self.structures()
            .filter(|(_, r)| r.consumes.contains(&resource))
            .map(|(id, _)| id)
            .collect()
    }

    fn structure_site(&self, id: StructureId) -> Option<Site> {
        self.structure(id).map(|r| Site::Structure(r.footprint))
    }
}

impl StructureHost for GridWorld {
    fn relocate(&mut self, id: StructureId, footprint: Footprint) -> CoreResult<()> {
        let old = self.structure_mut(id)?.footprint;
        for cell in old.cells() {
            if self.occupancy.get(&cell) == Some(&id) {
                self.occupancy.remove(&cell);
            }
        }
        for cell in footprint.cells() {
            self.occupancy.insert(cell, id);
        }
        self.structure_mut(id)?.footprint = footprint;
        Ok(())
    }

    fn set_production_paused(&mut self, id: StructureId, paused: bool) -> CoreResult<()> {
        self.structure_mut(id)?.production_paused = paused;
        Ok(())
    }

    fn is_production_paused(&self, id: StructureId) -> bool {
        self.structure(id).is_some_and(|r| r.production_paused)
    }
}
