//! # LightNet
//!
//! In-memory model of a simulated lighting and telecom network. Two independent
//! structures live side by side:
//!
//! - **Beacons**: named, colored points indexed by name and brightness. Each
//!   beacon may send one light beam to another beacon, so the beams form a
//!   forest of in-trees.
//! - **Fibres**: an undirected weighted graph over integer cross-points with
//!   hop-count and cost routing, cycle search and minimum spanning trimming.
//!
//! [`LightNetwork`] bundles both behind a sentinel-returning call interface;
//! the lower-level [`BeaconIndex`] and [`FibreGraph`] expose the same
//! operations with `Option`/`Result` returns.
//!
//! Everything is single-threaded. Wrap a [`LightNetwork`] in a mutex if it has
//! to be shared.

pub mod beacons;
pub mod config;
pub mod fibres;
pub mod invariants;
pub mod network;
pub mod types;

#[cfg(test)]
mod network_tests;

pub use beacons::{Beacon, BeaconIndex};
pub use config::{BeaconConfig, NeighborOrder, NetworkConfig, RoutingConfig};
pub use fibres::{FibreGraph, Route, RoutePlanner, RouteStep};
pub use invariants::{InvariantChecker, Violation, ViolationSeverity};
pub use network::LightNetwork;
pub use types::{
    BeaconId, Color, Coord, Cost, NO_COST, NO_ID, NO_NAME, NO_VALUE,
};

/// Error types for LightNet operations
#[derive(Debug, thiserror::Error)]
pub enum LightNetError {
    #[error("Beacon not found: {0}")]
    BeaconNotFound(BeaconId),

    #[error("Beacon already exists: {0}")]
    DuplicateBeacon(BeaconId),

    #[error("Beacon {source_id} already sends a beam to {target}")]
    BeamAlreadySet { source_id: BeaconId, target: BeaconId },

    #[error("Color channel out of range 0..={max}: {color}")]
    ColorOutOfRange { color: Color, max: i32 },

    #[error("Brightness of color {0} does not fit an i32")]
    BrightnessOverflow(Color),

    #[error("Fibre would connect {0} to itself")]
    SelfLoop(Coord),

    #[error("Fibre cost must be non-negative, got {0}")]
    NegativeCost(Cost),

    #[error("Fibre already exists between {0} and {1}")]
    FibreExists(Coord, Coord),

    #[error("No fibre between {0} and {1}")]
    FibreNotFound(Coord, Coord),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LightNetError>;
