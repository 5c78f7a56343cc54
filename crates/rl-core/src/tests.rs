//! Unit tests for rl-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ResourceType, StructureId};

    #[test]
    fn index_roundtrip() {
        let id = StructureId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(StructureId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn resource_type_rejects_oversized_index() {
        assert!(ResourceType::try_from(70_000usize).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(StructureId(7).to_string(), "StructureId(7)");
        assert_eq!(ResourceType(2).to_string(), "ResourceType(2)");
    }
}

#[cfg(test)]
mod grid {
    use crate::{Direction, Footprint, GridCoord, Rotation, Site};

    #[test]
    fn step_and_opposite_cancel() {
        let c = GridCoord::new(3, -2);
        for d in Direction::ALL {
            assert_eq!(c.step(d).step(d.opposite()), c);
            assert_eq!(Direction::between(c, c.step(d)), Some(d));
        }
        assert_eq!(Direction::between(c, GridCoord::new(4, -1)), None);
    }

    #[test]
    fn direction_bits_are_distinct() {
        let mask = Direction::ALL.iter().fold(0u8, |m, d| m | d.bit());
        assert_eq!(mask, 0b1111);
    }

    #[test]
    fn manhattan_distance() {
        assert_eq!(GridCoord::new(0, 0).manhattan(GridCoord::new(-2, 3)), 5);
    }

    #[test]
    fn rotation_snapping() {
        assert_eq!(Rotation::from_degrees(0.0), Rotation::Deg0);
        assert_eq!(Rotation::from_degrees(89.6), Rotation::Deg90);
        assert_eq!(Rotation::from_degrees(180.0), Rotation::Deg180);
        assert_eq!(Rotation::from_degrees(-90.0), Rotation::Deg270);
        assert_eq!(Rotation::from_degrees(359.0), Rotation::Deg0);
    }

    #[test]
    fn rotated_size_swaps_for_quarter_turns() {
        let fp = Footprint::new(GridCoord::new(0, 0), 3, 1, Rotation::Deg90);
        assert_eq!(fp.rotated_size(), (1, 3));
        assert!(fp.contains(GridCoord::new(0, 2)));
        assert!(!fp.contains(GridCoord::new(2, 0)));
        assert_eq!(fp.cells().count(), 3);
    }

    #[test]
    fn perimeter_of_single_cell_is_eight_cells() {
        let ring = Footprint::single(GridCoord::new(5, 5)).perimeter();
        assert_eq!(ring.len(), 8);
        for cell in &ring {
            let dx = (cell.x - 5).abs();
            let dy = (cell.y - 5).abs();
            assert!(dx <= 1 && dy <= 1 && (dx, dy) != (0, 0), "bad ring cell {cell}");
        }
    }

    #[test]
    fn perimeter_of_two_by_three() {
        let fp = Footprint::new(GridCoord::new(0, 0), 2, 3, Rotation::Deg0);
        let ring = fp.perimeter();
        // (w + 2) * 2 + h * 2
        assert_eq!(ring.len(), 4 * 2 + 3 * 2);
        assert!(ring.iter().all(|c| !fp.contains(*c)));
    }

    #[test]
    fn site_anchor() {
        let fp = Footprint::single(GridCoord::new(1, 2));
        assert_eq!(Site::from(fp).anchor(), GridCoord::new(1, 2));
        assert_eq!(Site::from(GridCoord::new(9, 9)).anchor(), GridCoord::new(9, 9));
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, Tick};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
        assert_eq!(Tick(3).since(Tick(10)), 0);
    }

    #[test]
    fn clock_elapsed() {
        let mut clock = SimClock::new(100);
        assert_eq!(clock.elapsed_secs(), 0.0);
        for _ in 0..10 {
            clock.advance();
        }
        assert!((clock.elapsed_secs() - 1.0).abs() < 1e-9);
        assert!((clock.tick_secs() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn ticks_for_secs_rounds_up() {
        let clock = SimClock::new(300);
        assert_eq!(clock.ticks_for_secs(30), 100);
        assert_eq!(clock.ticks_for_secs(1), 4); // 1000 / 300 = 3.33 → 4
    }
}

#[cfg(test)]
mod config {
    use crate::{CoreError, LogisticsConfig};

    #[test]
    fn defaults_match_engine_constants() {
        let c = LogisticsConfig::default();
        assert_eq!(c.route_timeout_secs, 30);
        assert_eq!(c.sweep_interval_secs, 5);
        assert_eq!(c.access_fallback_radius, 5);
        assert_eq!(c.max_path_len, 10_000);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = LogisticsConfig::from_toml_str("tick_duration_ms = 50\n").unwrap();
        assert_eq!(c.tick_duration_ms, 50);
        assert_eq!(c.route_timeout_secs, 30);
    }

    #[test]
    fn empty_toml_is_default() {
        let c = LogisticsConfig::from_toml_str("").unwrap();
        assert_eq!(c, LogisticsConfig::default());
    }

    #[test]
    fn unknown_field_rejected() {
        let err = LogisticsConfig::from_toml_str("tick_rate = 3\n").unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn zero_tick_duration_rejected() {
        let err = LogisticsConfig::from_toml_str("tick_duration_ms = 0\n").unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn range_steps_floors() {
        let c = LogisticsConfig { cell_size: 2.0, ..LogisticsConfig::default() };
        assert_eq!(c.range_steps(21.0), 10);
        assert_eq!(c.range_steps(-4.0), 0);
    }

    #[test]
    fn clock_uses_tick_duration() {
        let c = LogisticsConfig { tick_duration_ms: 250, ..LogisticsConfig::default() };
        assert_eq!(c.make_clock().ticks_for_secs(30), 120);
    }
}

#[cfg(test)]
mod world {
    use crate::{
        Footprint, GridCoord, GridQuery, GridWorld, ResourceType, Rotation, Site, StructureHost,
        StructureRecord, StructureRegistry,
    };

    const WOOD: ResourceType = ResourceType(0);
    const ORE: ResourceType = ResourceType(1);

    #[test]
    fn road_line_and_speed() {
        let mut w = GridWorld::new();
        w.add_road_line(GridCoord::new(0, 0), GridCoord::new(3, 0));
        w.add_road_with_speed(GridCoord::new(4, 0), 1.5);
        assert_eq!(w.road_tiles().len(), 5);
        assert!(w.is_road_at(GridCoord::new(2, 0)));
        assert_eq!(w.road_speed(GridCoord::new(4, 0)), 1.5);
        assert_eq!(w.road_speed(GridCoord::new(0, 0)), 1.0);
        assert!(w.remove_road(GridCoord::new(2, 0)));
        assert!(!w.remove_road(GridCoord::new(2, 0)));
    }

    #[test]
    fn site_resolution_uses_occupancy() {
        let mut w = GridWorld::new();
        let fp = Footprint::new(GridCoord::new(0, 0), 2, 2, Rotation::Deg0);
        w.add_structure(StructureRecord::new(fp)).unwrap();
        assert_eq!(w.site_at(GridCoord::new(1, 1)), Site::Structure(fp));
        assert_eq!(w.site_at(GridCoord::new(5, 5)), Site::Cell(GridCoord::new(5, 5)));
    }

    #[test]
    fn registry_filters_by_resource() {
        let mut w = GridWorld::new();
        let p = w
            .add_structure(StructureRecord::new(Footprint::single(GridCoord::new(0, 0))).producing(WOOD))
            .unwrap();
        let c = w
            .add_structure(StructureRecord::new(Footprint::single(GridCoord::new(5, 0))).consuming(WOOD))
            .unwrap();
        assert_eq!(w.producers_of(WOOD), vec![p]);
        assert_eq!(w.consumers_of(WOOD), vec![c]);
        assert!(w.producers_of(ORE).is_empty());
    }

    #[test]
    fn destroyed_handles_stay_dead() {
        let mut w = GridWorld::new();
        let a = w.add_structure(StructureRecord::new(Footprint::single(GridCoord::new(0, 0)))).unwrap();
        assert!(w.destroy(a));
        assert!(!w.destroy(a));
        assert!(!w.is_alive(a));
        assert!(w.footprint_at(GridCoord::new(0, 0)).is_none());
        let b = w.add_structure(StructureRecord::new(Footprint::single(GridCoord::new(0, 0)))).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn relocate_moves_occupancy() {
        let mut w = GridWorld::new();
        let id = w.add_structure(StructureRecord::new(Footprint::single(GridCoord::new(0, 0)))).unwrap();
        w.relocate(id, Footprint::single(GridCoord::new(4, 4))).unwrap();
        assert!(w.footprint_at(GridCoord::new(0, 0)).is_none());
        assert!(w.footprint_at(GridCoord::new(4, 4)).is_some());
        w.set_production_paused(id, true).unwrap();
        assert!(w.is_production_paused(id));
    }
}
