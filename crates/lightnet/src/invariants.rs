//! Consistency invariants - rules that must hold after every public mutation
//!
//! The beacon orderings must mirror the record store, beam links must be
//! recorded on both ends, and the fibre adjacency must mirror the edge map.
//! Beam acyclicity is a caller precondition, so breaking it is only a
//! warning.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::beacons::BeaconIndex;
use crate::fibres::FibreGraph;
use crate::types::Coord;

/// A violation of a consistency invariant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub invariant_name: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub affected_beacons: Vec<String>,
    pub affected_points: Vec<Coord>,
}

/// Severity levels for invariant violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationSeverity {
    /// A caller precondition is broken; queries may return partial answers
    Warning,
    /// Internal indexes disagree with each other
    Error,
}

impl Violation {
    fn beacons(name: &str, severity: ViolationSeverity, message: String, ids: Vec<String>) -> Self {
        Self {
            invariant_name: name.to_string(),
            severity,
            message,
            affected_beacons: ids,
            affected_points: Vec::new(),
        }
    }

    fn points(name: &str, message: String, points: Vec<Coord>) -> Self {
        Self {
            invariant_name: name.to_string(),
            severity: ViolationSeverity::Error,
            message,
            affected_beacons: Vec::new(),
            affected_points: points,
        }
    }
}

/// Invariant checker for beacon and fibre structures
#[derive(Debug, Default)]
pub struct InvariantChecker {
    /// Upgrade warnings to errors
    strict_mode: bool,
}

impl InvariantChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    /// Check every invariant of both structures
    pub fn check_all(&self, beacons: &BeaconIndex, fibres: &FibreGraph) -> Vec<Violation> {
        let mut violations = self.check_beacons(beacons);
        violations.extend(self.check_fibres(fibres));

        if self.strict_mode {
            for v in &mut violations {
                v.severity = ViolationSeverity::Error;
            }
        }
        violations
    }

    pub fn check_beacons(&self, index: &BeaconIndex) -> Vec<Violation> {
        let mut violations = Vec::new();
        violations.extend(self.check_name_index(index));
        violations.extend(self.check_brightness_index(index));
        violations.extend(self.check_beam_links(index));
        violations.extend(self.check_beams_acyclic(index));
        violations
    }

    pub fn check_fibres(&self, graph: &FibreGraph) -> Vec<Violation> {
        let mut violations = Vec::new();
        violations.extend(self.check_edges_mirrored(graph));
        violations.extend(self.check_adjacency_backed(graph));
        violations
    }

    fn check_name_index(&self, index: &BeaconIndex) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut seen = HashSet::new();

        for (name, id) in index.name_entries() {
            seen.insert(id.as_str());
            if index.get(id).map(|b| b.name()) != Some(name.as_str()) {
                violations.push(Violation::beacons(
                    "name_index_matches_store",
                    ViolationSeverity::Error,
                    format!("Name entry ({}, {}) has no matching beacon", name, id),
                    vec![id.clone()],
                ));
            }
        }
        for beacon in index.iter().filter(|b| !seen.contains(b.id())) {
            violations.push(Violation::beacons(
                "name_index_matches_store",
                ViolationSeverity::Error,
                format!("Beacon {} is missing from the name index", beacon.id()),
                vec![beacon.id().to_string()],
            ));
        }

        violations
    }

    fn check_brightness_index(&self, index: &BeaconIndex) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut seen = HashSet::new();

        for (brightness, id) in index.brightness_entries() {
            seen.insert(id.as_str());
            let live = index.get(id).map(|b| (b.brightness(), b.color().brightness()));
            if live != Some((*brightness, *brightness)) {
                violations.push(Violation::beacons(
                    "brightness_index_matches_store",
                    ViolationSeverity::Error,
                    format!("Brightness entry ({}, {}) is stale", brightness, id),
                    vec![id.clone()],
                ));
            }
        }
        for beacon in index.iter().filter(|b| !seen.contains(b.id())) {
            violations.push(Violation::beacons(
                "brightness_index_matches_store",
                ViolationSeverity::Error,
                format!("Beacon {} is missing from the brightness index", beacon.id()),
                vec![beacon.id().to_string()],
            ));
        }

        violations
    }

    fn check_beam_links(&self, index: &BeaconIndex) -> Vec<Violation> {
        let mut violations = Vec::new();

        for beacon in index.iter() {
            if let Some(target) = beacon.target() {
                let recorded = index
                    .get(target)
                    .is_some_and(|t| t.sources().any(|s| s == beacon.id()));
                if !recorded {
                    violations.push(Violation::beacons(
                        "beams_recorded_on_both_ends",
                        ViolationSeverity::Error,
                        format!("Beam {} -> {} is missing at the target", beacon.id(), target),
                        vec![beacon.id().to_string(), target.to_string()],
                    ));
                }
            }
            for source in beacon.sources() {
                if index.get(source).and_then(|s| s.target()) != Some(beacon.id()) {
                    violations.push(Violation::beacons(
                        "beams_recorded_on_both_ends",
                        ViolationSeverity::Error,
                        format!("Beam {} -> {} is missing at the source", source, beacon.id()),
                        vec![source.to_string(), beacon.id().to_string()],
                    ));
                }
            }
        }

        violations
    }

    fn check_beams_acyclic(&self, index: &BeaconIndex) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut cleared: HashSet<&str> = HashSet::new();

        for beacon in index.iter() {
            let mut walk: Vec<&str> = Vec::new();
            let mut on_walk: HashSet<&str> = HashSet::new();
            let mut current = Some(beacon.id());

            while let Some(id) = current {
                if cleared.contains(id) {
                    break;
                }
                if !on_walk.insert(id) {
                    let start = walk.iter().position(|w| *w == id).unwrap_or(0);
                    let cycle: Vec<String> = walk[start..].iter().map(|s| s.to_string()).collect();
                    violations.push(Violation::beacons(
                        "beams_acyclic",
                        ViolationSeverity::Warning,
                        format!("Beams form a cycle: {}", cycle.join(" -> ")),
                        cycle,
                    ));
                    break;
                }
                walk.push(id);
                current = index.get(id).and_then(|b| b.target());
            }
            cleared.extend(walk);
        }

        violations
    }

    fn check_edges_mirrored(&self, graph: &FibreGraph) -> Vec<Violation> {
        let mut violations = Vec::new();
        let adjacency = graph.adjacency();

        for ((a, b), cost) in graph.weighted_edges() {
            if a >= b {
                violations.push(Violation::points(
                    "edges_canonical",
                    format!("Fibre key ({}, {}) is not in canonical order", a, b),
                    vec![a, b],
                ));
            }
            if cost < 0 {
                violations.push(Violation::points(
                    "non_negative_costs",
                    format!("Fibre {} - {} has negative cost {}", a, b, cost),
                    vec![a, b],
                ));
            }
            let forward = adjacency.get(&a).and_then(|n| n.get(&b)).copied();
            let backward = adjacency.get(&b).and_then(|n| n.get(&a)).copied();
            if forward != Some(cost) || backward != Some(cost) {
                violations.push(Violation::points(
                    "adjacency_mirrors_edges",
                    format!("Fibre {} - {} (cost {}) is not mirrored in adjacency", a, b, cost),
                    vec![a, b],
                ));
            }
        }

        violations
    }

    fn check_adjacency_backed(&self, graph: &FibreGraph) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (point, neighbors) in graph.adjacency() {
            if neighbors.is_empty() {
                violations.push(Violation::points(
                    "no_isolated_points",
                    format!("Cross-point {} has no fibres", point),
                    vec![*point],
                ));
            }
            for (next, cost) in neighbors {
                if graph.cost_between(*point, *next) != Some(*cost) {
                    violations.push(Violation::points(
                        "adjacency_mirrors_edges",
                        format!("Adjacency {} -> {} has no matching fibre", point, next),
                        vec![*point, *next],
                    ));
                }
            }
        }

        violations
    }
}
