//! Graph model for the fibre network

use std::collections::BTreeMap;

use crate::types::{Coord, Cost};
use crate::{LightNetError, Result};

/// Endpoints of a fibre in coordinate order, so `(a, b)` and `(b, a)` map
/// to the same key.
pub fn canonical(a: Coord, b: Coord) -> (Coord, Coord) {
    if b < a {
        (b, a)
    } else {
        (a, b)
    }
}

/// Undirected weighted graph over cross-points.
///
/// `edges` is the source of truth for which fibres exist; `adjacency` mirrors
/// it per endpoint. A cross-point is present exactly while it has a fibre.
#[derive(Debug, Clone, Default)]
pub struct FibreGraph {
    adjacency: BTreeMap<Coord, BTreeMap<Coord, Cost>>,
    edges: BTreeMap<(Coord, Coord), Cost>,
}

impl FibreGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fibre between two distinct cross-points
    pub fn add_fibre(&mut self, a: Coord, b: Coord, cost: Cost) -> Result<()> {
        if a == b {
            return Err(LightNetError::SelfLoop(a));
        }
        if cost < 0 {
            return Err(LightNetError::NegativeCost(cost));
        }
        let key = canonical(a, b);
        if self.edges.contains_key(&key) {
            return Err(LightNetError::FibreExists(key.0, key.1));
        }

        self.edges.insert(key, cost);
        self.adjacency.entry(a).or_default().insert(b, cost);
        self.adjacency.entry(b).or_default().insert(a, cost);
        Ok(())
    }

    /// Remove the fibre between `a` and `b`, in either order, returning its cost
    pub fn remove_fibre(&mut self, a: Coord, b: Coord) -> Result<Cost> {
        let key = canonical(a, b);
        let cost = self
            .edges
            .remove(&key)
            .ok_or(LightNetError::FibreNotFound(key.0, key.1))?;

        self.detach(a, b);
        self.detach(b, a);
        Ok(cost)
    }

    fn detach(&mut self, from: Coord, to: Coord) {
        if let Some(neighbors) = self.adjacency.get_mut(&from) {
            neighbors.remove(&to);
            if neighbors.is_empty() {
                self.adjacency.remove(&from);
            }
        }
    }

    /// Neighbors of `point` with fibre costs, in coordinate order
    pub fn neighbors(&self, point: Coord) -> Vec<(Coord, Cost)> {
        self.adjacency
            .get(&point)
            .map(|n| n.iter().map(|(c, cost)| (*c, *cost)).collect())
            .unwrap_or_default()
    }

    /// Every cross-point with at least one fibre, in coordinate order
    pub fn vertices(&self) -> Vec<Coord> {
        self.adjacency.keys().copied().collect()
    }

    /// Every fibre as a canonical pair, ordered by first then second endpoint
    pub fn edges(&self) -> Vec<(Coord, Coord)> {
        self.edges.keys().copied().collect()
    }

    /// Every fibre with its cost
    pub fn weighted_edges(&self) -> impl Iterator<Item = ((Coord, Coord), Cost)> + '_ {
        self.edges.iter().map(|(k, c)| (*k, *c))
    }

    pub fn cost_between(&self, a: Coord, b: Coord) -> Option<Cost> {
        self.edges.get(&canonical(a, b)).copied()
    }

    pub fn contains(&self, point: Coord) -> bool {
        self.adjacency.contains_key(&point)
    }

    pub fn degree(&self, point: Coord) -> usize {
        self.adjacency.get(&point).map_or(0, BTreeMap::len)
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn clear(&mut self) {
        self.adjacency.clear();
        self.edges.clear();
    }

    pub(crate) fn adjacency(&self) -> &BTreeMap<Coord, BTreeMap<Coord, Cost>> {
        &self.adjacency
    }
}
