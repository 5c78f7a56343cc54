//! Producer → consumer supply arbitration.
//!
//! # Reservations
//!
//! When producer A starts supplying consumer X it registers a route; a second
//! producer B in the same road network then sees X as reserved and picks
//! another consumer.  Reservations only matter within one connected road
//! component: two separate settlements never contend.
//!
//! # Invariants
//!
//! * At most one route per consumer (`routes`) and per producer
//!   (`by_producer`).  The two maps always change together, so
//!   `by_producer[r.producer] == r.consumer` for every route `r`.
//! * A route not refreshed within `timeout_ticks` is stale.  Stale routes are
//!   evicted lazily by [`SupplyCoordinator::is_reserved`] and eagerly by
//!   [`SupplyCoordinator::sweep`].

use rustc_hash::FxHashMap;
use tracing::debug;

use rl_core::{LogisticsConfig, ResourceType, Site, StructureId, StructureRegistry, Tick};
use rl_roads::Pathfinder;

// ── SupplyRoute ───────────────────────────────────────────────────────────────

/// An active exclusive reservation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SupplyRoute {
    pub producer:      StructureId,
    pub consumer:      StructureId,
    pub resource:      ResourceType,
    /// Where the producer stood when it last registered.
    pub producer_site: Site,
    pub last_update:   Tick,
}

// ── SupplyCoordinator ─────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct SupplyCoordinator {
    routes:        FxHashMap<StructureId, SupplyRoute>,
    by_producer:   FxHashMap<StructureId, StructureId>,
    timeout_ticks: u64,
}

impl SupplyCoordinator {
    pub fn new(timeout_ticks: u64) -> Self {
        Self {
            routes: FxHashMap::default(),
            by_producer: FxHashMap::default(),
            timeout_ticks,
        }
    }

    pub fn from_config(config: &LogisticsConfig) -> Self {
        Self::new(config.make_clock().ticks_for_secs(config.route_timeout_secs))
    }

    #[inline]
    pub fn timeout_ticks(&self) -> u64 {
        self.timeout_ticks
    }

    #[inline]
    fn is_stale(&self, route: &SupplyRoute, now: Tick) -> bool {
        now.since(route.last_update) > self.timeout_ticks
    }

    // ── Registration ──────────────────────────────────────────────────────

    /// Record that `producer` is now supplying `consumer`.
    ///
    /// The same producer only refreshes the timestamp.  A different producer
    /// takes the consumer over.  A producer that was pinned to some other
    /// consumer gives that route up.
    pub fn register(
        &mut self,
        producer: StructureId,
        consumer: StructureId,
        resource: ResourceType,
        producer_site: Site,
        now: Tick,
    ) {
        if let Some(existing) = self.routes.get_mut(&consumer) {
            if existing.producer == producer {
                existing.last_update = now;
                existing.producer_site = producer_site;
                existing.resource = resource;
                debug!(%producer, %consumer, "supply route refreshed");
                return;
            }
            debug!(
                %consumer,
                old = %existing.producer,
                new = %producer,
                "supply route preempted"
            );
            let old = existing.producer;
            self.by_producer.remove(&old);
        }

        if let Some(previous) = self.by_producer.get(&producer).copied() {
            if previous != consumer {
                self.routes.remove(&previous);
                debug!(%producer, consumer = %previous, "producer released its previous route");
            }
        }

        self.routes.insert(
            consumer,
            SupplyRoute { producer, consumer, resource, producer_site, last_update: now },
        );
        self.by_producer.insert(producer, consumer);
        debug!(%producer, %consumer, %resource, "supply route registered");
    }

    /// Drop the route to `consumer` if `producer` still owns it.
    pub fn unregister(&mut self, producer: StructureId, consumer: StructureId) -> bool {
        match self.routes.get(&consumer) {
            Some(route) if route.producer == producer => {
                self.routes.remove(&consumer);
                self.by_producer.remove(&producer);
                debug!(%producer, %consumer, "supply route unregistered");
                true
            }
            _ => false,
        }
    }

    fn evict(&mut self, consumer: StructureId) -> Option<SupplyRoute> {
        let route = self.routes.remove(&consumer)?;
        if self.by_producer.get(&route.producer) == Some(&consumer) {
            self.by_producer.remove(&route.producer);
        }
        Some(route)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Is `consumer` pinned to a producer other than `requesting`?
    ///
    /// `false` when there is no route, when `requesting` owns it, when it
    /// is stale (the route is evicted), or when the two producers sit on
    /// different road networks.  An empty road graph, or a requesting
    /// producer the registry cannot place, counts as one shared network.
    pub fn is_reserved<R>(
        &mut self,
        consumer: StructureId,
        requesting: StructureId,
        now: Tick,
        finder: &Pathfinder<'_>,
        registry: &R,
    ) -> bool
    where
        R: StructureRegistry + ?Sized,
    {
        let Some(route) = self.routes.get(&consumer).copied() else {
            return false;
        };
        if route.producer == requesting {
            return false;
        }
        if self.is_stale(&route, now) {
            debug!(%consumer, producer = %route.producer, "stale supply route evicted");
            self.evict(consumer);
            return false;
        }
        if !self.share_network(requesting, &route, finder, registry) {
            return false;
        }
        debug!(%consumer, owner = %route.producer, %requesting, "consumer reserved");
        true
    }

    fn share_network<R>(
        &self,
        requesting: StructureId,
        route: &SupplyRoute,
        finder: &Pathfinder<'_>,
        registry: &R,
    ) -> bool
    where
        R: StructureRegistry + ?Sized,
    {
        if finder.graph().is_empty() {
            return true;
        }
        let Some(requesting_site) = registry.structure_site(requesting) else {
            return true;
        };
        let owner_site = registry.structure_site(route.producer).unwrap_or(route.producer_site);
        finder.same_network(&requesting_site, &owner_site)
    }

    /// Consumers of `resource` currently pinned to some other fresh producer
    /// on `requesting`'s road network, sorted by handle.  Nothing is evicted.
    pub fn reserved_consumers<R>(
        &self,
        resource: ResourceType,
        requesting: StructureId,
        now: Tick,
        finder: &Pathfinder<'_>,
        registry: &R,
    ) -> Vec<StructureId>
    where
        R: StructureRegistry + ?Sized,
    {
        let mut reserved: Vec<StructureId> = self
            .routes
            .values()
            .filter(|r| r.resource == resource && r.producer != requesting)
            .filter(|r| !self.is_stale(r, now))
            .filter(|r| self.share_network(requesting, r, finder, registry))
            .map(|r| r.consumer)
            .collect();
        reserved.sort_unstable();
        reserved
    }

    /// The consumer `producer` is pinned to, if the route is still fresh.
    pub fn consumer_for(&self, producer: StructureId, now: Tick) -> Option<StructureId> {
        let consumer = *self.by_producer.get(&producer)?;
        let route = self.routes.get(&consumer)?;
        (!self.is_stale(route, now)).then_some(consumer)
    }

    pub fn route(&self, consumer: StructureId) -> Option<&SupplyRoute> {
        self.routes.get(&consumer)
    }

    pub fn routes(&self) -> impl Iterator<Item = &SupplyRoute> {
        self.routes.values()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Should `producer` pin itself 1:1 to a consumer of `resource`?
    ///
    /// Counts producers and consumers of `resource` whose access points lie
    /// in `producer`'s road component.  `true` when producers ≥ consumers:
    /// scarce supply gets strict pairing, abundant demand may be shared.
    pub fn should_use_exclusive_reservation<R>(
        &self,
        producer: StructureId,
        resource: ResourceType,
        finder: &Pathfinder<'_>,
        registry: &R,
    ) -> bool
    where
        R: StructureRegistry + ?Sized,
    {
        let everywhere = finder.graph().is_empty();
        let origin = registry.structure_site(producer);
        let component = match (everywhere, origin) {
            (false, Some(site)) => Some(finder.component_of(&[site])),
            _ => None,
        };

        let in_network = |id: StructureId| -> bool {
            let Some(component) = &component else {
                return true;
            };
            match registry.structure_site(id) {
                None => true,
                Some(site) => finder
                    .access_points(&site)
                    .iter()
                    .any(|p| component.contains_key(p)),
            }
        };

        let producers = registry.producers_of(resource).into_iter().filter(|&p| in_network(p)).count();
        let consumers = registry.consumers_of(resource).into_iter().filter(|&c| in_network(c)).count();
        let exclusive = producers >= consumers;
        debug!(%producer, %resource, producers, consumers, exclusive, "reservation mode");
        exclusive
    }

    // ── Maintenance ───────────────────────────────────────────────────────

    /// Evict stale routes and routes with a destroyed endpoint, then scrub
    /// reverse entries that no longer match a route.  Returns the number of
    /// routes removed.
    pub fn sweep<R>(&mut self, now: Tick, registry: &R) -> usize
    where
        R: StructureRegistry + ?Sized,
    {
        let doomed: Vec<StructureId> = self
            .routes
            .values()
            .filter(|r| {
                self.is_stale(r, now)
                    || !registry.is_alive(r.producer)
                    || !registry.is_alive(r.consumer)
            })
            .map(|r| r.consumer)
            .collect();
        for consumer in &doomed {
            self.evict(*consumer);
        }

        let before = self.by_producer.len();
        let routes = &self.routes;
        self.by_producer.retain(|producer, consumer| {
            registry.is_alive(*producer)
                && routes.get(consumer).is_some_and(|r| r.producer == *producer)
        });
        let scrubbed = before - self.by_producer.len();

        if !doomed.is_empty() || scrubbed > 0 {
            debug!(routes = doomed.len(), scrubbed, %now, "coordinator sweep");
        }
        doomed.len()
    }

    /// Remove every route touching `id`, as producer or consumer.
    pub fn release_structure(&mut self, id: StructureId) -> Vec<SupplyRoute> {
        let mut released = Vec::new();
        if let Some(route) = self.evict(id) {
            released.push(route);
        }
        if let Some(consumer) = self.by_producer.get(&id).copied() {
            if let Some(route) = self.evict(consumer) {
                released.push(route);
            }
        }
        released
    }

    /// Re-register a previously released route at `now`.
    pub fn restore(&mut self, route: SupplyRoute, now: Tick) {
        self.register(route.producer, route.consumer, route.resource, route.producer_site, now);
    }

    /// Both maps describe the same set of routes.
    pub fn is_consistent(&self) -> bool {
        self.routes.len() == self.by_producer.len()
            && self.routes.values().all(|r| self.by_producer.get(&r.producer) == Some(&r.consumer))
    }
}
