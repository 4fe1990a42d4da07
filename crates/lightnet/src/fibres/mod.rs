//! Fibre network - weighted cross-point graph and routing over it

pub mod graph;
pub mod routing;

pub use graph::FibreGraph;
pub use routing::{Route, RoutePlanner, RouteStep};
