//! Unit tests for rl-logistics.

#[cfg(test)]
mod helpers {
    use rl_core::{
        Footprint, GridCoord, GridQuery, GridWorld, ResourceType, StructureId, StructureRecord,
    };
    use rl_roads::RoadGraph;

    use crate::{Priority, ResourceRequest};

    pub const WOOD: ResourceType = ResourceType(0);
    pub const ORE: ResourceType = ResourceType(1);

    pub fn c(x: i32, y: i32) -> GridCoord {
        GridCoord::new(x, y)
    }

    pub fn req(requester: u32, resource: ResourceType, priority: u8, dest: GridCoord) -> ResourceRequest {
        ResourceRequest::new(StructureId(requester), resource, Priority::new(priority).unwrap(), dest)
    }

    pub fn graph_of(world: &GridWorld) -> RoadGraph {
        RoadGraph::from_tiles(world.road_tiles())
    }

    /// A road from `(x0, 0)` to `(x1, 0)` in `world`.
    pub fn road(world: &mut GridWorld, x0: i32, x1: i32) {
        world.add_road_line(c(x0, 0), c(x1, 0));
    }

    pub fn producer(world: &mut GridWorld, x: i32, resource: ResourceType) -> StructureId {
        world
            .add_structure(StructureRecord::new(Footprint::single(c(x, 1))).producing(resource))
            .unwrap()
    }

    pub fn consumer(world: &mut GridWorld, x: i32, resource: ResourceType) -> StructureId {
        world
            .add_structure(StructureRecord::new(Footprint::single(c(x, 1))).consuming(resource))
            .unwrap()
    }
}

// ── Priority & requests ───────────────────────────────────────────────────────

#[cfg(test)]
mod priority {
    use crate::{LogisticsError, Priority};

    #[test]
    fn range_is_enforced() {
        assert!(Priority::new(1).is_ok());
        assert!(Priority::new(5).is_ok());
        assert!(matches!(Priority::new(0), Err(LogisticsError::InvalidPriority(0))));
        assert!(matches!(Priority::new(6), Err(LogisticsError::InvalidPriority(6))));
    }

    #[test]
    fn default_is_three() {
        assert_eq!(Priority::default().get(), 3);
        assert!(Priority::MAX > Priority::default());
    }
}

// ── RequestBoard ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod board {
    use rl_core::StructureId;

    use super::helpers::{c, req, ORE, WOOD};
    use crate::RequestBoard;

    #[test]
    fn submit_buckets_by_resource() {
        let mut b = RequestBoard::new();
        assert!(b.submit(req(1, WOOD, 3, c(0, 0))));
        assert!(b.submit(req(2, WOOD, 3, c(1, 0))));
        assert!(b.submit(req(1, ORE, 3, c(0, 0))));
        assert_eq!(b.len(), 3);
        assert_eq!(b.candidates_for(WOOD).len(), 2);
        assert_eq!(b.candidates_for(ORE).len(), 1);
    }

    #[test]
    fn duplicate_key_is_noop() {
        let mut b = RequestBoard::new();
        assert!(b.submit(req(1, WOOD, 3, c(0, 0))));
        assert!(!b.submit(req(1, WOOD, 5, c(9, 9))));
        assert_eq!(b.len(), 1);
        assert_eq!(b.candidates_for(WOOD)[0].priority.get(), 3);
    }

    #[test]
    fn withdrawing_last_request_prunes_bucket() {
        let mut b = RequestBoard::new();
        let r = req(1, WOOD, 3, c(0, 0));
        b.submit(r);
        assert_eq!(b.withdraw(r.key()), Some(r));
        assert!(b.is_empty());
        assert_eq!(b.resource_types().count(), 0);
        assert!(b.candidates_for(WOOD).is_empty());
        assert_eq!(b.withdraw(r.key()), None);
    }

    #[test]
    fn withdraw_all_for_requester() {
        let mut b = RequestBoard::new();
        b.submit(req(1, WOOD, 3, c(0, 0)));
        b.submit(req(1, ORE, 3, c(0, 0)));
        b.submit(req(2, WOOD, 3, c(1, 0)));
        assert_eq!(b.withdraw_all_for(StructureId(1)).len(), 2);
        assert_eq!(b.len(), 1);
        assert_eq!(b.iter().next().unwrap().requester, StructureId(2));
        assert!(b.get(req(1, WOOD, 3, c(0, 0)).key()).is_none());
    }
}

// ── Matching ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod matching {
    use rl_core::{Footprint, GridWorld, Site, StructureRecord};
    use rl_roads::Pathfinder;

    use super::helpers::{c, graph_of, req, road, ORE, WOOD};
    use crate::{best_request_for, RequestBoard};

    #[test]
    fn corridor_request_at_distance_four() {
        let mut world = GridWorld::new();
        road(&mut world, 0, 4);
        let graph = graph_of(&world);
        let mut board = RequestBoard::new();
        let far = req(1, WOOD, 3, c(4, 1));
        board.submit(far);

        let agent = Site::Cell(c(0, 1));
        let pf = Pathfinder::new(&graph);
        let m = best_request_for(&agent, WOOD, 20, &pf, &board, &world).unwrap();
        assert_eq!(m.request, far);
        assert_eq!(m.distance, 4);
    }

    #[test]
    fn cut_corridor_drops_candidate() {
        let mut world = GridWorld::new();
        road(&mut world, 0, 4);
        world.remove_road(c(2, 0));
        let graph = graph_of(&world);
        let mut board = RequestBoard::new();
        board.submit(req(1, WOOD, 3, c(4, 1)));

        let pf = Pathfinder::new(&graph);
        assert!(!pf.reachable(c(0, 0), c(4, 0)));
        assert!(best_request_for(&Site::Cell(c(0, 1)), WOOD, 20, &pf, &board, &world).is_none());
    }

    #[test]
    fn priority_beats_distance() {
        let mut world = GridWorld::new();
        road(&mut world, 0, 10);
        let graph = graph_of(&world);
        let mut board = RequestBoard::new();
        let near_low = req(1, WOOD, 3, c(2, 1));
        let far_high = req(2, WOOD, 5, c(10, 1));
        board.submit(near_low);
        board.submit(far_high);

        let pf = Pathfinder::new(&graph);
        let agent = Site::Cell(c(0, 1));
        let m = best_request_for(&agent, WOOD, 20, &pf, &board, &world).unwrap();
        assert_eq!(m.request, far_high);
        assert_eq!(m.distance, 10);

        // Out of range, the high-priority request is invisible.
        let m = best_request_for(&agent, WOOD, 5, &pf, &board, &world).unwrap();
        assert_eq!(m.request, near_low);
        assert_eq!(m.distance, 2);
    }

    #[test]
    fn equal_priority_prefers_nearer() {
        let mut world = GridWorld::new();
        road(&mut world, 0, 10);
        let graph = graph_of(&world);
        let mut board = RequestBoard::new();
        board.submit(req(1, WOOD, 4, c(8, 1)));
        board.submit(req(2, WOOD, 4, c(3, 1)));

        let pf = Pathfinder::new(&graph);
        let m = best_request_for(&Site::Cell(c(0, 1)), WOOD, 20, &pf, &board, &world).unwrap();
        assert_eq!(m.request.requester.0, 2);
        assert_eq!(m.distance, 3);
    }

    #[test]
    fn structure_destination_uses_perimeter() {
        let mut world = GridWorld::new();
        road(&mut world, 0, 10);
        // 3-wide building north of the road; its root is at x = 6.
        world
            .add_structure(StructureRecord::new(Footprint::new(
                c(6, 1),
                3,
                1,
                rl_core::Rotation::Deg0,
            )))
            .unwrap();
        let graph = graph_of(&world);
        let mut board = RequestBoard::new();
        board.submit(req(0, WOOD, 3, c(6, 1)));

        let pf = Pathfinder::new(&graph);
        let m = best_request_for(&Site::Cell(c(0, 1)), WOOD, 20, &pf, &board, &world).unwrap();
        // Perimeter reaches down to (5, 0).
        assert_eq!(m.distance, 5);
    }

    #[test]
    fn no_candidates_or_no_access() {
        let mut world = GridWorld::new();
        road(&mut world, 0, 4);
        let graph = graph_of(&world);
        let mut board = RequestBoard::new();
        board.submit(req(1, WOOD, 3, c(4, 1)));
        let pf = Pathfinder::new(&graph);

        assert!(best_request_for(&Site::Cell(c(0, 1)), ORE, 20, &pf, &board, &world).is_none());
        assert!(best_request_for(&Site::Cell(c(40, 40)), WOOD, 20, &pf, &board, &world).is_none());
    }
}

// ── Supply coordination ───────────────────────────────────────────────────────

#[cfg(test)]
mod coordinator {
    use std::collections::HashMap;

    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use rl_core::{GridWorld, Site, StructureId, StructureRegistry, Tick};
    use rl_roads::{Pathfinder, RoadGraph};

    use super::helpers::{c, consumer, graph_of, producer, road, ORE, WOOD};
    use crate::SupplyCoordinator;

    const TIMEOUT: u64 = 300;

    fn site(world: &GridWorld, id: StructureId) -> Site {
        world.structure_site(id).unwrap()
    }

    #[test]
    fn two_producers_two_consumers_is_exclusive() {
        let mut world = GridWorld::new();
        road(&mut world, 0, 10);
        let p1 = producer(&mut world, 0, WOOD);
        let p2 = producer(&mut world, 2, WOOD);
        consumer(&mut world, 8, WOOD);
        consumer(&mut world, 10, WOOD);
        let graph = graph_of(&world);
        let pf = Pathfinder::new(&graph);
        let coord = SupplyCoordinator::new(TIMEOUT);

        assert!(coord.should_use_exclusive_reservation(p1, WOOD, &pf, &world));
        assert!(coord.should_use_exclusive_reservation(p2, WOOD, &pf, &world));
    }

    #[test]
    fn one_producer_two_consumers_is_shared() {
        let mut world = GridWorld::new();
        road(&mut world, 0, 10);
        let p = producer(&mut world, 0, WOOD);
        consumer(&mut world, 8, WOOD);
        consumer(&mut world, 10, WOOD);
        let graph = graph_of(&world);
        let pf = Pathfinder::new(&graph);
        let coord = SupplyCoordinator::new(TIMEOUT);

        assert!(!coord.should_use_exclusive_reservation(p, WOOD, &pf, &world));
    }

    #[test]
    fn counting_stays_inside_component() {
        let mut world = GridWorld::new();
        road(&mut world, 0, 4);
        road(&mut world, 20, 30);
        let p = producer(&mut world, 0, WOOD);
        consumer(&mut world, 4, WOOD);
        consumer(&mut world, 25, WOOD);
        consumer(&mut world, 30, WOOD);
        consumer(&mut world, 2, ORE);
        let graph = graph_of(&world);
        let pf = Pathfinder::new(&graph);
        let coord = SupplyCoordinator::new(TIMEOUT);

        assert!(coord.should_use_exclusive_reservation(p, WOOD, &pf, &world));
    }

    #[test]
    fn register_preempts_and_refreshes() {
        let mut coord = SupplyCoordinator::new(TIMEOUT);
        let (p1, p2, cons) = (StructureId(1), StructureId(2), StructureId(9));
        let s = Site::Cell(c(0, 0));

        coord.register(p1, cons, WOOD, s, Tick(0));
        coord.register(p1, cons, WOOD, s, Tick(50));
        assert_eq!(coord.route(cons).unwrap().last_update, Tick(50));
        assert_eq!(coord.len(), 1);

        coord.register(p2, cons, WOOD, s, Tick(60));
        assert_eq!(coord.route(cons).unwrap().producer, p2);
        assert_eq!(coord.consumer_for(p1, Tick(60)), None);
        assert_eq!(coord.consumer_for(p2, Tick(60)), Some(cons));
        assert!(coord.is_consistent());
    }

    #[test]
    fn producer_holds_one_route() {
        let mut coord = SupplyCoordinator::new(TIMEOUT);
        let p = StructureId(1);
        let s = Site::Cell(c(0, 0));
        coord.register(p, StructureId(10), WOOD, s, Tick(0));
        coord.register(p, StructureId(11), WOOD, s, Tick(1));
        assert!(coord.route(StructureId(10)).is_none());
        assert_eq!(coord.consumer_for(p, Tick(1)), Some(StructureId(11)));
        assert!(coord.is_consistent());
    }

    #[test]
    fn single_ownership_under_random_registration() {
        let mut rng = SmallRng::seed_from_u64(99);
        let mut coord = SupplyCoordinator::new(TIMEOUT);
        let mut model: HashMap<StructureId, StructureId> = HashMap::new();
        let s = Site::Cell(c(0, 0));

        for t in 0..500u64 {
            let p = StructureId(rng.gen_range(0..4));
            let cons = StructureId(rng.gen_range(10..14));
            if rng.gen_bool(0.85) {
                coord.register(p, cons, WOOD, s, Tick(t));
                model.retain(|_, owner| *owner != p);
                model.insert(cons, p);
            } else if coord.unregister(p, cons) {
                model.remove(&cons);
            }

            assert!(coord.is_consistent());
            assert_eq!(coord.len(), model.len());
            for (cons, owner) in &model {
                assert_eq!(coord.route(*cons).map(|r| r.producer), Some(*owner));
            }
        }
    }

    #[test]
    fn unregister_requires_ownership() {
        let mut coord = SupplyCoordinator::new(TIMEOUT);
        let s = Site::Cell(c(0, 0));
        coord.register(StructureId(1), StructureId(9), WOOD, s, Tick(0));
        coord.register(StructureId(2), StructureId(9), WOOD, s, Tick(1));
        assert!(!coord.unregister(StructureId(1), StructureId(9)));
        assert!(coord.unregister(StructureId(2), StructureId(9)));
        assert!(coord.is_empty());
        assert!(coord.is_consistent());
    }

    #[test]
    fn reservation_rules() {
        let mut world = GridWorld::new();
        road(&mut world, 0, 10);
        let p1 = producer(&mut world, 0, WOOD);
        let p2 = producer(&mut world, 2, WOOD);
        let cons = consumer(&mut world, 8, WOOD);
        let graph = graph_of(&world);
        let pf = Pathfinder::new(&graph);
        let mut coord = SupplyCoordinator::new(TIMEOUT);

        assert!(!coord.is_reserved(cons, p2, Tick(0), &pf, &world));
        coord.register(p1, cons, WOOD, site(&world, p1), Tick(0));
        assert!(!coord.is_reserved(cons, p1, Tick(10), &pf, &world));
        assert!(coord.is_reserved(cons, p2, Tick(10), &pf, &world));
        assert_eq!(coord.reserved_consumers(WOOD, p2, Tick(10), &pf, &world), vec![cons]);
        assert!(coord.reserved_consumers(WOOD, p1, Tick(10), &pf, &world).is_empty());

        // Exactly at the timeout the route is still fresh; one tick later it is evicted.
        assert!(coord.is_reserved(cons, p2, Tick(TIMEOUT), &pf, &world));
        assert!(!coord.is_reserved(cons, p2, Tick(TIMEOUT + 1), &pf, &world));
        assert!(coord.route(cons).is_none());
        assert!(coord.is_consistent());
    }

    #[test]
    fn separate_networks_do_not_contend() {
        let mut world = GridWorld::new();
        road(&mut world, 0, 4);
        road(&mut world, 20, 24);
        let west = producer(&mut world, 0, WOOD);
        let east = producer(&mut world, 24, WOOD);
        let cons = consumer(&mut world, 4, WOOD);
        let graph = graph_of(&world);
        let pf = Pathfinder::new(&graph);
        let mut coord = SupplyCoordinator::new(TIMEOUT);

        coord.register(west, cons, WOOD, site(&world, west), Tick(0));
        assert!(!coord.is_reserved(cons, east, Tick(1), &pf, &world));
    }

    #[test]
    fn empty_graph_counts_as_one_network() {
        let mut world = GridWorld::new();
        let p1 = producer(&mut world, 0, WOOD);
        let p2 = producer(&mut world, 50, WOOD);
        let cons = consumer(&mut world, 9, WOOD);
        let graph = RoadGraph::new();
        let pf = Pathfinder::new(&graph);
        let mut coord = SupplyCoordinator::new(TIMEOUT);

        coord.register(p1, cons, WOOD, site(&world, p1), Tick(0));
        assert!(coord.is_reserved(cons, p2, Tick(1), &pf, &world));
        // Two producers, one consumer, all "connected".
        assert!(coord.should_use_exclusive_reservation(p1, WOOD, &pf, &world));
    }

    #[test]
    fn sweep_evicts_stale_and_dead() {
        let mut world = GridWorld::new();
        road(&mut world, 0, 10);
        let p1 = producer(&mut world, 0, WOOD);
        let p2 = producer(&mut world, 2, WOOD);
        let p3 = producer(&mut world, 4, WOOD);
        let c1 = consumer(&mut world, 6, WOOD);
        let c2 = consumer(&mut world, 8, WOOD);
        let c3 = consumer(&mut world, 10, WOOD);
        let mut coord = SupplyCoordinator::new(TIMEOUT);

        coord.register(p1, c1, WOOD, site(&world, p1), Tick(0));
        coord.register(p2, c2, WOOD, site(&world, p2), Tick(200));
        coord.register(p3, c3, WOOD, site(&world, p3), Tick(200));
        world.destroy(c3);

        assert_eq!(coord.sweep(Tick(301), &world), 2);
        assert!(coord.route(c1).is_none());
        assert!(coord.route(c3).is_none());
        assert_eq!(coord.route(c2).unwrap().producer, p2);
        assert!(coord.is_consistent());
    }

    #[test]
    fn release_and_restore() {
        let mut coord = SupplyCoordinator::new(TIMEOUT);
        let s = Site::Cell(c(0, 0));
        let (p, mid, cons) = (StructureId(1), StructureId(2), StructureId(3));
        coord.register(p, mid, WOOD, s, Tick(0));
        coord.register(mid, cons, ORE, s, Tick(0));

        let released = coord.release_structure(mid);
        assert_eq!(released.len(), 2);
        assert!(coord.is_empty());
        assert!(coord.is_consistent());

        for route in released {
            coord.restore(route, Tick(5));
        }
        assert_eq!(coord.route(mid).unwrap().producer, p);
        assert_eq!(coord.route(cons).unwrap().last_update, Tick(5));
        assert!(coord.is_consistent());
    }
}

// ── Demand hysteresis ─────────────────────────────────────────────────────────

#[cfg(test)]
mod demand {
    use rl_core::StructureId;

    use super::helpers::{c, WOOD};
    use crate::{DemandChange, DemandThresholds, DemandTracker, Priority, RequestBoard, ResourceRequest};

    #[test]
    fn opens_low_and_closes_high() {
        let mut board = RequestBoard::new();
        let mut t = DemandTracker::new(StructureId(1), c(3, 3), Priority::default());

        assert_eq!(t.observe(WOOD, 5.0, 10.0, &mut board), None);
        assert_eq!(t.observe(WOOD, 2.5, 10.0, &mut board), Some(DemandChange::Requested(WOOD)));
        assert_eq!(board.candidates_for(WOOD).len(), 1);
        assert_eq!(board.candidates_for(WOOD)[0].destination, c(3, 3));

        // Between the thresholds nothing changes in either direction.
        assert_eq!(t.observe(WOOD, 6.0, 10.0, &mut board), None);
        assert_eq!(t.observe(WOOD, 1.0, 10.0, &mut board), None);
        assert!(t.is_requesting());

        assert_eq!(t.observe(WOOD, 8.0, 10.0, &mut board), Some(DemandChange::Fulfilled(WOOD)));
        assert!(board.is_empty());
        assert!(!t.is_requesting());
    }

    #[test]
    fn zero_capacity_is_ignored() {
        let mut board = RequestBoard::new();
        let mut t = DemandTracker::new(StructureId(1), c(0, 0), Priority::default());
        assert_eq!(t.observe(WOOD, 0.0, 0.0, &mut board), None);
        assert!(board.is_empty());
    }

    #[test]
    fn cancel_all_clears_board() {
        let mut board = RequestBoard::new();
        let mut t = DemandTracker::new(StructureId(1), c(0, 0), Priority::default());
        t.observe(WOOD, 0.0, 10.0, &mut board);
        t.cancel_all(&mut board);
        assert!(board.is_empty());
        assert!(!t.is_open(WOOD));
    }

    #[test]
    fn refused_submit_is_not_tracked() {
        let mut board = RequestBoard::new();
        let existing = ResourceRequest::new(StructureId(1), WOOD, Priority::new(5).unwrap(), c(9, 9));
        assert!(board.submit(existing));

        let mut t = DemandTracker::new(StructureId(1), c(0, 0), Priority::default());
        assert_eq!(t.observe(WOOD, 0.0, 10.0, &mut board), None);
        assert!(!t.is_open(WOOD));
        assert_eq!(board.len(), 1);
        assert_eq!(board.candidates_for(WOOD)[0].destination, c(9, 9));

        board.withdraw(existing.key());
        assert_eq!(t.observe(WOOD, 0.0, 10.0, &mut board), Some(DemandChange::Requested(WOOD)));
        assert!(t.is_open(WOOD));
    }

    #[test]
    fn thresholds_must_be_ordered() {
        assert!(DemandThresholds::new(0.3, 0.7).is_ok());
        assert!(DemandThresholds::new(0.8, 0.2).is_err());
        assert!(DemandThresholds::new(-0.1, 0.5).is_err());
    }
}
