//! Sentinel-returning facade over the beacon registry and the fibre network
//!
//! Every operation answers every input. Unknown ids and points produce the
//! sentinels from [`crate::types`] or `false`; the reason for a rejected
//! mutation is logged at debug level.

use crate::beacons::BeaconIndex;
use crate::config::NetworkConfig;
use crate::fibres::{FibreGraph, Route, RoutePlanner};
use crate::invariants::{InvariantChecker, Violation};
use crate::types::{BeaconId, Color, Coord, Cost, NO_ID, NO_NAME, NO_VALUE};
use crate::Result;

/// Beacons, light beams and fibres behind one call interface
#[derive(Debug, Clone, Default)]
pub struct LightNetwork {
    beacons: BeaconIndex,
    fibres: FibreGraph,
    config: NetworkConfig,
}

fn accepted<T>(operation: &str, result: Result<T>) -> bool {
    match result {
        Ok(_) => true,
        Err(e) => {
            tracing::debug!("{} rejected: {}", operation, e);
            false
        }
    }
}

fn or_marker(ids: Option<Vec<BeaconId>>) -> Vec<BeaconId> {
    ids.unwrap_or_else(|| vec![NO_ID.to_string()])
}

impl LightNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: NetworkConfig) -> Self {
        Self {
            beacons: BeaconIndex::with_config(config.beacons.clone()),
            fibres: FibreGraph::new(),
            config,
        }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn beacons(&self) -> &BeaconIndex {
        &self.beacons
    }

    pub fn fibres(&self) -> &FibreGraph {
        &self.fibres
    }

    fn planner(&self) -> RoutePlanner<'_> {
        RoutePlanner::new(&self.fibres).with_order(self.config.routing.neighbor_order)
    }

    // ============ Beacons ============

    pub fn beacon_count(&self) -> usize {
        self.beacons.len()
    }

    pub fn clear_beacons(&mut self) {
        tracing::info!("Clearing {} beacons", self.beacons.len());
        self.beacons.clear();
    }

    pub fn all_beacons(&self) -> Vec<BeaconId> {
        self.beacons.ids()
    }

    pub fn add_beacon(&mut self, id: &str, name: &str, coord: Coord, color: Color) -> bool {
        accepted("add_beacon", self.beacons.add(id, name, coord, color))
    }

    pub fn get_name(&self, id: &str) -> String {
        self.beacons
            .get(id)
            .map_or_else(|| NO_NAME.to_string(), |b| b.name().to_string())
    }

    pub fn get_coordinates(&self, id: &str) -> Coord {
        self.beacons.get(id).map_or(Coord::NONE, |b| b.coord())
    }

    pub fn get_color(&self, id: &str) -> Color {
        self.beacons.get(id).map_or(Color::NONE, |b| b.color())
    }

    pub fn get_brightness(&self, id: &str) -> i32 {
        self.beacons.get(id).map_or(NO_VALUE, |b| b.brightness())
    }

    pub fn beacons_alphabetically(&self) -> Vec<BeaconId> {
        self.beacons.by_name()
    }

    pub fn beacons_brightness_increasing(&self) -> Vec<BeaconId> {
        self.beacons.by_brightness()
    }

    pub fn min_brightness(&self) -> BeaconId {
        self.beacons.min_brightness().unwrap_or(NO_ID).to_string()
    }

    pub fn max_brightness(&self) -> BeaconId {
        self.beacons.max_brightness().unwrap_or(NO_ID).to_string()
    }

    pub fn find_beacons(&self, name: &str) -> Vec<BeaconId> {
        self.beacons.find_by_name(name)
    }

    pub fn rename_beacon(&mut self, id: &str, name: &str) -> bool {
        accepted("rename_beacon", self.beacons.rename(id, name))
    }

    pub fn recolor_beacon(&mut self, id: &str, color: Color) -> bool {
        accepted("recolor_beacon", self.beacons.recolor(id, color))
    }

    pub fn connect_beam(&mut self, source: &str, target: &str) -> bool {
        accepted("connect_beam", self.beacons.connect(source, target))
    }

    /// Direct sources of `id` ascending, or `[NO_ID]` if `id` is unknown
    pub fn incoming_sources(&self, id: &str) -> Vec<BeaconId> {
        or_marker(self.beacons.incoming_sources(id))
    }

    /// Root first, `id` last, or `[NO_ID]` if `id` is unknown
    pub fn path_to_root(&self, id: &str) -> Vec<BeaconId> {
        or_marker(self.beacons.path_to_root(id))
    }

    /// Farthest source first, `id` last, or `[NO_ID]` if `id` is unknown
    pub fn longest_incoming_path(&self, id: &str) -> Vec<BeaconId> {
        or_marker(self.beacons.longest_incoming_path(id))
    }

    pub fn remove_beacon(&mut self, id: &str) -> bool {
        accepted("remove_beacon", self.beacons.remove(id))
    }

    pub fn total_color(&self, id: &str) -> Color {
        self.beacons.total_color(id).unwrap_or(Color::NONE)
    }

    // ============ Fibres ============

    pub fn all_cross_points(&self) -> Vec<Coord> {
        self.fibres.vertices()
    }

    pub fn add_fibre(&mut self, a: Coord, b: Coord, cost: Cost) -> bool {
        accepted("add_fibre", self.fibres.add_fibre(a, b, cost))
    }

    pub fn fibres_from(&self, point: Coord) -> Vec<(Coord, Cost)> {
        self.fibres.neighbors(point)
    }

    pub fn all_fibres(&self) -> Vec<(Coord, Coord)> {
        self.fibres.edges()
    }

    pub fn remove_fibre(&mut self, a: Coord, b: Coord) -> bool {
        accepted("remove_fibre", self.fibres.remove_fibre(a, b))
    }

    pub fn clear_fibres(&mut self) {
        tracing::info!("Clearing {} fibres", self.fibres.edge_count());
        self.fibres.clear();
    }

    pub fn route_any(&self, from: Coord, to: Coord) -> Vec<(Coord, Cost)> {
        self.planner().any_route(from, to).to_pairs()
    }

    pub fn shortest_by_hops(&self, from: Coord, to: Coord) -> Vec<(Coord, Cost)> {
        self.planner().shortest_by_hops(from, to).to_pairs()
    }

    pub fn cheapest_by_cost(&self, from: Coord, to: Coord) -> Vec<(Coord, Cost)> {
        self.planner().cheapest_by_cost(from, to).to_pairs()
    }

    /// Same as [`Self::cheapest_by_cost`], keeping the structured [`Route`]
    pub fn cheapest_route(&self, from: Coord, to: Coord) -> Route {
        self.planner().cheapest_by_cost(from, to)
    }

    pub fn find_cycle(&self, start: Coord) -> Vec<Coord> {
        self.planner().find_cycle(start)
    }

    /// Cost of the fibres removed, or the configured no-op cost
    pub fn trim_to_minimum(&mut self) -> Cost {
        self.fibres
            .trim_to_minimum()
            .unwrap_or(self.config.routing.trim_noop_cost)
    }

    // ============ Diagnostics ============

    pub fn check_consistency(&self) -> Vec<Violation> {
        InvariantChecker::new().check_all(&self.beacons, &self.fibres)
    }
}
