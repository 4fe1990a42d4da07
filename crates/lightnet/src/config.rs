//! Configuration for LightNet

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{Color, Cost, NO_COST};
use crate::Result;

/// Order in which traversals expand the neighbors of a cross-point.
///
/// Routing picks among equally good candidates by expansion order, so this
/// is the tie-breaking knob.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NeighborOrder {
    /// Smallest coordinate first
    #[default]
    Ascending,
    /// Largest coordinate first
    Descending,
}

/// Routing engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RoutingConfig {
    /// Neighbor expansion order for BFS, Dijkstra and cycle search
    #[serde(default)]
    pub neighbor_order: NeighborOrder,
    /// Value reported when trimming finds nothing to remove
    #[serde(default = "default_trim_noop_cost")]
    pub trim_noop_cost: Cost,
}

fn default_trim_noop_cost() -> Cost {
    NO_COST
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            neighbor_order: NeighborOrder::default(),
            trim_noop_cost: default_trim_noop_cost(),
        }
    }
}

/// Beacon registry configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct BeaconConfig {
    /// Upper bound for color channels. `None` accepts any color.
    #[serde(default)]
    pub max_channel: Option<i32>,
}

impl BeaconConfig {
    /// Check a color against the configured channel bound
    pub fn accepts(&self, color: Color) -> bool {
        match self.max_channel {
            Some(max) => color.channels().iter().all(|c| (0..=max).contains(c)),
            None => true,
        }
    }
}

/// Core configuration for a [`crate::LightNetwork`]
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct NetworkConfig {
    #[serde(default)]
    pub beacons: BeaconConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
}

impl NetworkConfig {
    /// Configuration that rejects colors outside the 8-bit range
    pub fn strict_colors() -> Self {
        Self {
            beacons: BeaconConfig {
                max_channel: Some(255),
            },
            ..Default::default()
        }
    }

    /// Parse configuration from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded network config from {}", path.as_ref().display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = NetworkConfig::default();
        assert_eq!(config.routing.neighbor_order, NeighborOrder::Ascending);
        assert_eq!(config.routing.trim_noop_cost, NO_COST);
        assert!(config.beacons.max_channel.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = NetworkConfig::from_toml_str(
            r#"
            [routing]
            neighbor_order = "descending"
            "#,
        )
        .unwrap();

        assert_eq!(config.routing.neighbor_order, NeighborOrder::Descending);
        assert_eq!(config.routing.trim_noop_cost, NO_COST);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = NetworkConfig::from_toml_str("[routing]\nneighbor_order = 7");
        assert!(matches!(result, Err(crate::LightNetError::ConfigError(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[beacons]\nmax_channel = 100\n[routing]\ntrim_noop_cost = -1").unwrap();

        let config = NetworkConfig::load(file.path()).unwrap();
        assert_eq!(config.beacons.max_channel, Some(100));
        assert_eq!(config.routing.trim_noop_cost, -1);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = NetworkConfig::load("/nonexistent/lightnet.toml");
        assert!(matches!(result, Err(crate::LightNetError::IoError(_))));
    }

    #[test]
    fn test_channel_bound() {
        let config = NetworkConfig::strict_colors();
        assert!(config.beacons.accepts(Color::new(0, 255, 10)));
        assert!(!config.beacons.accepts(Color::new(0, 256, 10)));
        assert!(!config.beacons.accepts(Color::new(-1, 0, 0)));
        assert!(BeaconConfig::default().accepts(Color::new(-1, 9000, 0)));
    }
}
