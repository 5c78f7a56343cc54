//! The demo village: a main street, a northern lane and a detached hamlet.

use std::io::Cursor;

use anyhow::{Context, Result};

use rl_core::{Footprint, GridCoord, GridWorld, ResourceType, Rotation, StructureId, StructureRecord};
use rl_roads::load_road_tiles_reader;

pub const GRAIN: ResourceType = ResourceType(0);

// Main street (0..=14, 0), northern lane (7, 1..=4), hamlet (20..=22, 0).
const ROADS_CSV: &str = "\
x,y\n\
0,0\n1,0\n2,0\n3,0\n4,0\n5,0\n6,0\n7,0\n8,0\n9,0\n10,0\n11,0\n12,0\n13,0\n14,0\n\
7,1\n7,2\n7,3\n7,4\n\
20,0\n21,0\n22,0\n\
";

pub struct Village {
    pub world:  GridWorld,
    pub farms:  Vec<StructureId>,
    pub mills:  Vec<StructureId>,
    pub hamlet: StructureId,
}

pub fn build_village() -> Result<Village> {
    let mut world = GridWorld::new();
    let tiles = load_road_tiles_reader(Cursor::new(ROADS_CSV)).context("parsing road tiles")?;
    for tile in tiles {
        world.add_road(tile);
    }
    // The lane is paved and twice as fast.
    for y in 1..=4 {
        world.add_road_with_speed(GridCoord::new(7, y), 2.0);
    }

    let farm = |x, y| {
        StructureRecord::new(Footprint::new(GridCoord::new(x, y), 2, 2, Rotation::Deg0)).producing(GRAIN)
    };
    let mill = |x, y| StructureRecord::new(Footprint::single(GridCoord::new(x, y))).consuming(GRAIN);

    let farms = vec![world.add_structure(farm(0, 1))?, world.add_structure(farm(12, 1))?];
    let mills = vec![world.add_structure(mill(8, 3))?, world.add_structure(mill(14, -1))?];
    let hamlet = world.add_structure(mill(21, 1))?;

    Ok(Village { world, farms, mills, hamlet })
}
