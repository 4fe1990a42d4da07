//! Route planning - hop-count and cost routing, cycle search, network trimming

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::graph::FibreGraph;
use crate::config::NeighborOrder;
use crate::types::{Coord, Cost};

/// A point on a route with the cost accumulated up to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStep {
    pub point: Coord,
    pub cost: Cost,
}

/// A route through the fibre network.
///
/// Starts at the origin with cost 0 and ends at the destination with the
/// total cost. Empty when no route exists or origin and destination are the
/// same point. Cumulative costs saturate at `Cost::MAX`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub steps: Vec<RouteStep>,
}

impl Route {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Cost at the destination, `None` for an empty route
    pub fn total_cost(&self) -> Option<Cost> {
        self.steps.last().map(|s| s.cost)
    }

    pub fn points(&self) -> Vec<Coord> {
        self.steps.iter().map(|s| s.point).collect()
    }

    pub fn to_pairs(&self) -> Vec<(Coord, Cost)> {
        self.steps.iter().map(|s| (s.point, s.cost)).collect()
    }
}

/// State for Dijkstra's algorithm
#[derive(Clone, Copy, PartialEq, Eq)]
struct DijkstraState {
    cost: i64,
    point: Coord,
    order: NeighborOrder,
}

impl Ord for DijkstraState {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap; equal costs pop in expansion order
        other.cost.cmp(&self.cost).then_with(|| match self.order {
            NeighborOrder::Ascending => other.point.cmp(&self.point),
            NeighborOrder::Descending => self.point.cmp(&other.point),
        })
    }
}

impl PartialOrd for DijkstraState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Union-find over vertex indices
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merge the sets of `a` and `b`; false if they were already one set
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            Ordering::Less => self.parent[ra] = rb,
            Ordering::Greater => self.parent[rb] = ra,
            Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

/// Read-only route planner over a [`FibreGraph`]
pub struct RoutePlanner<'a> {
    graph: &'a FibreGraph,
    order: NeighborOrder,
}

impl<'a> RoutePlanner<'a> {
    pub fn new(graph: &'a FibreGraph) -> Self {
        Self {
            graph,
            order: NeighborOrder::default(),
        }
    }

    pub fn with_order(mut self, order: NeighborOrder) -> Self {
        self.order = order;
        self
    }

    /// A route with the fewest fibres, found breadth-first.
    ///
    /// Only the hop count is minimized; the reported costs are whatever the
    /// chosen fibres add up to.
    pub fn shortest_by_hops(&self, from: Coord, to: Coord) -> Route {
        if !self.graph.contains(from) || !self.graph.contains(to) {
            return Route::new();
        }

        let mut prev: HashMap<Coord, Coord> = HashMap::new();
        let mut visited: HashSet<Coord> = HashSet::from([from]);
        let mut queue = VecDeque::from([from]);

        while let Some(point) = queue.pop_front() {
            if point == to {
                break;
            }
            for (next, _) in self.expand(point) {
                if visited.insert(next) {
                    prev.insert(next, point);
                    queue.push_back(next);
                }
            }
        }

        let route = self.build_route(from, to, &prev);
        tracing::debug!("Hop route {} -> {}: {} points", from, to, route.len());
        route
    }

    /// Any route between the points. Currently the fewest-hops one.
    pub fn any_route(&self, from: Coord, to: Coord) -> Route {
        self.shortest_by_hops(from, to)
    }

    /// The route with the lowest total cost, using Dijkstra's algorithm
    pub fn cheapest_by_cost(&self, from: Coord, to: Coord) -> Route {
        if !self.graph.contains(from) || !self.graph.contains(to) {
            return Route::new();
        }

        let mut dist: HashMap<Coord, i64> = HashMap::from([(from, 0)]);
        let mut prev: HashMap<Coord, Coord> = HashMap::new();
        let mut heap = BinaryHeap::new();
        heap.push(DijkstraState {
            cost: 0,
            point: from,
            order: self.order,
        });

        while let Some(DijkstraState { cost, point, .. }) = heap.pop() {
            if point == to {
                break;
            }
            if cost > dist.get(&point).copied().unwrap_or(i64::MAX) {
                continue;
            }

            for (next, weight) in self.expand(point) {
                let next_cost = cost + i64::from(weight);
                if next_cost < dist.get(&next).copied().unwrap_or(i64::MAX) {
                    dist.insert(next, next_cost);
                    prev.insert(next, point);
                    heap.push(DijkstraState {
                        cost: next_cost,
                        point: next,
                        order: self.order,
                    });
                }
            }
        }

        let route = self.build_route(from, to, &prev);
        tracing::debug!(
            "Cheapest route {} -> {}: {} points, cost {:?}",
            from,
            to,
            route.len(),
            route.total_cost()
        );
        route
    }

    /// A closed walk through a cycle reachable from `start`.
    ///
    /// The walk runs from `start` to the point where the cycle closes and
    /// then repeats the point it closes on, e.g. `[A, B, C, A]`. Empty if
    /// `start` is unknown or its component is a tree.
    pub fn find_cycle(&self, start: Coord) -> Vec<Coord> {
        struct Frame {
            point: Coord,
            parent: Option<Coord>,
            neighbors: Vec<Coord>,
            next: usize,
        }

        if !self.graph.contains(start) {
            return Vec::new();
        }

        let frame = |point: Coord, parent: Option<Coord>| Frame {
            point,
            parent,
            neighbors: self.expand(point).into_iter().map(|(c, _)| c).collect(),
            next: 0,
        };

        let mut visited: HashSet<Coord> = HashSet::from([start]);
        let mut on_path: HashSet<Coord> = HashSet::from([start]);
        let mut stack = vec![frame(start, None)];

        while let Some(top) = stack.last_mut() {
            let Some(&next) = top.neighbors.get(top.next) else {
                on_path.remove(&top.point);
                stack.pop();
                continue;
            };
            top.next += 1;

            if Some(next) == top.parent {
                continue;
            }
            if on_path.contains(&next) {
                let mut walk: Vec<Coord> = stack.iter().map(|f| f.point).collect();
                walk.push(next);
                tracing::debug!("Cycle from {}: {} points", start, walk.len());
                return walk;
            }
            if visited.insert(next) {
                on_path.insert(next);
                let parent = top.point;
                stack.push(frame(next, Some(parent)));
            }
        }

        Vec::new()
    }

    /// Fibres of a minimum spanning forest, chosen with Kruskal's algorithm.
    ///
    /// Candidates are taken by `(cost, first endpoint, second endpoint)`, so
    /// equal-cost choices are deterministic.
    pub fn spanning_forest(&self) -> Vec<(Coord, Coord)> {
        let index: HashMap<Coord, usize> = self
            .graph
            .vertices()
            .into_iter()
            .enumerate()
            .map(|(i, c)| (c, i))
            .collect();

        let mut candidates: Vec<((Coord, Coord), Cost)> = self.graph.weighted_edges().collect();
        candidates.sort_by(|(ka, ca), (kb, cb)| ca.cmp(cb).then(ka.cmp(kb)));

        let mut sets = DisjointSet::new(index.len());
        candidates
            .into_iter()
            .filter(|((a, b), _)| sets.union(index[a], index[b]))
            .map(|(key, _)| key)
            .collect()
    }

    /// Connected components, each listed in coordinate order
    pub fn components(&self) -> Vec<Vec<Coord>> {
        let mut components = Vec::new();
        let mut visited = HashSet::new();

        for &start in self.graph.adjacency().keys() {
            if !visited.insert(start) {
                continue;
            }
            let mut component = vec![start];
            let mut queue = VecDeque::from([start]);
            while let Some(point) = queue.pop_front() {
                for (next, _) in self.graph.neighbors(point) {
                    if visited.insert(next) {
                        component.push(next);
                        queue.push_back(next);
                    }
                }
            }
            component.sort();
            components.push(component);
        }

        components
    }

    fn expand(&self, point: Coord) -> Vec<(Coord, Cost)> {
        let mut neighbors = self.graph.neighbors(point);
        if self.order == NeighborOrder::Descending {
            neighbors.reverse();
        }
        neighbors
    }

    /// Walk `prev` back from `to`. A route needs at least one fibre, so
    /// `from == to` gives an empty route.
    fn build_route(&self, from: Coord, to: Coord, prev: &HashMap<Coord, Coord>) -> Route {
        if from == to || !prev.contains_key(&to) {
            return Route::new();
        }

        let mut points = vec![to];
        let mut current = to;
        while current != from {
            match prev.get(&current) {
                Some(&p) => {
                    points.push(p);
                    current = p;
                }
                None => return Route::new(),
            }
        }
        points.reverse();

        // Sums run in i64; a step cost past Cost::MAX is reported as Cost::MAX.
        let mut steps = Vec::with_capacity(points.len());
        let mut total: i64 = 0;
        for (i, point) in points.iter().enumerate() {
            if i > 0 {
                let fibre = self.graph.cost_between(points[i - 1], *point).unwrap_or(0);
                total += i64::from(fibre);
            }
            steps.push(RouteStep {
                point: *point,
                cost: Cost::try_from(total).unwrap_or(Cost::MAX),
            });
        }

        Route { steps }
    }
}

impl FibreGraph {
    /// Reduce the network to a minimum spanning forest.
    ///
    /// Returns the summed cost of the removed fibres, or `None` if the
    /// network was already free of cycles.
    pub fn trim_to_minimum(&mut self) -> Option<Cost> {
        let kept: HashSet<(Coord, Coord)> =
            RoutePlanner::new(self).spanning_forest().into_iter().collect();
        let redundant: Vec<(Coord, Coord)> = self
            .edges()
            .into_iter()
            .filter(|key| !kept.contains(key))
            .collect();

        if redundant.is_empty() {
            tracing::debug!("Fibre network already minimal");
            return None;
        }

        let mut removed: Cost = 0;
        for (a, b) in &redundant {
            if let Ok(cost) = self.remove_fibre(*a, *b) {
                removed = removed.saturating_add(cost);
            }
        }

        tracing::info!(
            "Trimmed {} fibres with total cost {}",
            redundant.len(),
            removed
        );
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: i32, y: i32) -> Coord {
        Coord::new(x, y)
    }

    fn create_test_graph() -> FibreGraph {
        // A(0,0) - B(1,0) - C(2,0) with unit costs, plus an isolated D(9,9) - E(9,10)
        let mut graph = FibreGraph::new();
        graph.add_fibre(c(0, 0), c(1, 0), 1).unwrap();
        graph.add_fibre(c(1, 0), c(2, 0), 1).unwrap();
        graph.add_fibre(c(9, 9), c(9, 10), 4).unwrap();
        graph
    }

    #[test]
    fn test_shortest_by_hops_on_line() {
        let graph = create_test_graph();
        let route = RoutePlanner::new(&graph).shortest_by_hops(c(0, 0), c(2, 0));

        assert_eq!(
            route.to_pairs(),
            vec![(c(0, 0), 0), (c(1, 0), 1), (c(2, 0), 2)]
        );
        assert_eq!(route.total_cost(), Some(2));
    }

    #[test]
    fn test_routes_between_components_are_empty() {
        let graph = create_test_graph();
        let planner = RoutePlanner::new(&graph);

        assert!(planner.shortest_by_hops(c(0, 0), c(9, 9)).is_empty());
        assert!(planner.cheapest_by_cost(c(0, 0), c(9, 9)).is_empty());
        assert!(planner.shortest_by_hops(c(0, 0), c(5, 5)).is_empty());
        assert!(planner.cheapest_by_cost(c(5, 5), c(0, 0)).is_empty());
    }

    #[test]
    fn test_route_to_self_is_empty() {
        let graph = create_test_graph();
        let planner = RoutePlanner::new(&graph);
        assert!(planner.shortest_by_hops(c(1, 0), c(1, 0)).is_empty());
        assert!(planner.any_route(c(1, 0), c(1, 0)).is_empty());
        assert!(planner.cheapest_by_cost(c(1, 0), c(1, 0)).is_empty());
        assert!(planner.cheapest_by_cost(c(1, 0), c(1, 0)).total_cost().is_none());
    }

    #[test]
    fn test_route_cost_saturates() {
        let mut graph = FibreGraph::new();
        graph.add_fibre(c(0, 0), c(1, 0), Cost::MAX - 1).unwrap();
        graph.add_fibre(c(1, 0), c(2, 0), 5).unwrap();
        graph.add_fibre(c(2, 0), c(3, 0), 1).unwrap();

        let route = RoutePlanner::new(&graph).cheapest_by_cost(c(0, 0), c(3, 0));
        assert_eq!(
            route.to_pairs(),
            vec![
                (c(0, 0), 0),
                (c(1, 0), Cost::MAX - 1),
                (c(2, 0), Cost::MAX),
                (c(3, 0), Cost::MAX),
            ]
        );
    }

    #[test]
    fn test_hops_versus_cost() {
        // Direct fibre costs 10, detour through two points costs 3
        let mut graph = FibreGraph::new();
        graph.add_fibre(c(0, 0), c(5, 0), 10).unwrap();
        graph.add_fibre(c(0, 0), c(0, 1), 1).unwrap();
        graph.add_fibre(c(0, 1), c(0, 2), 1).unwrap();
        graph.add_fibre(c(0, 2), c(5, 0), 1).unwrap();
        let planner = RoutePlanner::new(&graph);

        let by_hops = planner.shortest_by_hops(c(0, 0), c(5, 0));
        assert_eq!(by_hops.to_pairs(), vec![(c(0, 0), 0), (c(5, 0), 10)]);

        let by_cost = planner.cheapest_by_cost(c(0, 0), c(5, 0));
        assert_eq!(
            by_cost.to_pairs(),
            vec![(c(0, 0), 0), (c(0, 1), 1), (c(0, 2), 2), (c(5, 0), 3)]
        );
    }

    #[test]
    fn test_equal_cost_tie_follows_neighbor_order() {
        // Square: (0,0)-(1,0)-(1,1) and (0,0)-(0,1)-(1,1), all cost 1
        let mut graph = FibreGraph::new();
        graph.add_fibre(c(0, 0), c(1, 0), 1).unwrap();
        graph.add_fibre(c(1, 0), c(1, 1), 1).unwrap();
        graph.add_fibre(c(0, 0), c(0, 1), 1).unwrap();
        graph.add_fibre(c(0, 1), c(1, 1), 1).unwrap();

        let asc = RoutePlanner::new(&graph);
        assert_eq!(asc.cheapest_by_cost(c(0, 0), c(1, 1)).points()[1], c(1, 0));
        assert_eq!(asc.shortest_by_hops(c(0, 0), c(1, 1)).points()[1], c(1, 0));

        let desc = RoutePlanner::new(&graph).with_order(NeighborOrder::Descending);
        assert_eq!(desc.cheapest_by_cost(c(0, 0), c(1, 1)).points()[1], c(0, 1));
        assert_eq!(desc.shortest_by_hops(c(0, 0), c(1, 1)).points()[1], c(0, 1));
    }

    #[test]
    fn test_find_cycle_triangle() {
        let mut graph = FibreGraph::new();
        graph.add_fibre(c(0, 0), c(1, 0), 1).unwrap();
        graph.add_fibre(c(1, 0), c(0, 1), 1).unwrap();
        graph.add_fibre(c(0, 0), c(0, 1), 1).unwrap();

        let cycle = RoutePlanner::new(&graph).find_cycle(c(0, 0));
        assert_eq!(cycle, vec![c(0, 0), c(1, 0), c(0, 1), c(0, 0)]);
    }

    #[test]
    fn test_find_cycle_from_tail() {
        // S(0,-1) hangs off a triangle A(0,0), B(1,0), C(0,1)
        let mut graph = FibreGraph::new();
        graph.add_fibre(c(0, -1), c(0, 0), 1).unwrap();
        graph.add_fibre(c(0, 0), c(1, 0), 1).unwrap();
        graph.add_fibre(c(1, 0), c(0, 1), 1).unwrap();
        graph.add_fibre(c(0, 1), c(0, 0), 1).unwrap();

        let cycle = RoutePlanner::new(&graph).find_cycle(c(0, -1));
        assert_eq!(cycle.first(), Some(&c(0, -1)));
        assert_eq!(cycle.len(), 5);
        let closing = *cycle.last().unwrap();
        assert_eq!(cycle.iter().filter(|p| **p == closing).count(), 2);
        for pair in cycle.windows(2) {
            assert!(graph.cost_between(pair[0], pair[1]).is_some());
        }
    }

    #[test]
    fn test_find_cycle_in_tree_or_unknown() {
        let graph = create_test_graph();
        let planner = RoutePlanner::new(&graph);
        assert!(planner.find_cycle(c(1, 0)).is_empty());
        assert!(planner.find_cycle(c(7, 7)).is_empty());
    }

    #[test]
    fn test_trim_triangle_removes_expensive_fibre() {
        let (a, b, cc) = (c(0, 0), c(1, 0), c(2, 0));
        let mut graph = FibreGraph::new();
        graph.add_fibre(a, b, 1).unwrap();
        graph.add_fibre(b, cc, 1).unwrap();
        graph.add_fibre(a, cc, 5).unwrap();

        assert_eq!(graph.trim_to_minimum(), Some(5));
        assert_eq!(graph.edges(), vec![(a, b), (b, cc)]);
        assert!(RoutePlanner::new(&graph).find_cycle(a).is_empty());
    }

    #[test]
    fn test_trim_acyclic_is_noop() {
        let mut graph = create_test_graph();
        assert_eq!(graph.trim_to_minimum(), None);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_trim_per_component() {
        let mut graph = FibreGraph::new();
        // Square with one heavy side
        graph.add_fibre(c(0, 0), c(1, 0), 2).unwrap();
        graph.add_fibre(c(1, 0), c(1, 1), 2).unwrap();
        graph.add_fibre(c(1, 1), c(0, 1), 2).unwrap();
        graph.add_fibre(c(0, 1), c(0, 0), 7).unwrap();
        // Separate triangle
        graph.add_fibre(c(10, 10), c(11, 10), 3).unwrap();
        graph.add_fibre(c(11, 10), c(10, 11), 4).unwrap();
        graph.add_fibre(c(10, 11), c(10, 10), 1).unwrap();

        assert_eq!(graph.trim_to_minimum(), Some(7 + 4));
        assert_eq!(graph.edge_count(), 5);
        assert_eq!(graph.vertex_count(), 7);
        assert_eq!(RoutePlanner::new(&graph).components().len(), 2);
    }

    #[test]
    fn test_route_json_shape() {
        let graph = create_test_graph();
        let route = RoutePlanner::new(&graph).cheapest_by_cost(c(0, 0), c(1, 0));

        let json = serde_json::to_value(&route).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "steps": [
                    { "point": { "x": 0, "y": 0 }, "cost": 0 },
                    { "point": { "x": 1, "y": 0 }, "cost": 1 }
                ]
            })
        );
    }

    #[test]
    fn test_components() {
        let graph = create_test_graph();
        let components = RoutePlanner::new(&graph).components();
        assert_eq!(
            components,
            vec![vec![c(0, 0), c(1, 0), c(2, 0)], vec![c(9, 9), c(9, 10)]]
        );
    }
}
