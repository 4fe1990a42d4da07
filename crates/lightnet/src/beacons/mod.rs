//! Beacon registry - record store, ordered indexes and the light-beam forest

pub mod forest;
pub mod index;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{BeaconId, Color, Coord};

pub use index::BeaconIndex;

/// A named, colored point that may send one light beam to another beacon.
///
/// Beam links are stored as ids only; the records themselves live in the
/// owning [`BeaconIndex`], which is also the only place they are mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beacon {
    id: BeaconId,
    name: String,
    coord: Coord,
    color: Color,
    brightness: i32,
    target: Option<BeaconId>,
    sources: BTreeSet<BeaconId>,
}

impl Beacon {
    pub(crate) fn new(id: BeaconId, name: String, coord: Coord, color: Color) -> Self {
        Self {
            id,
            name,
            coord,
            brightness: color.brightness(),
            color,
            target: None,
            sources: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn brightness(&self) -> i32 {
        self.brightness
    }

    /// The beacon this one illuminates, if any
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Beacons sending a beam to this one, ascending by id
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(String::as_str)
    }

    pub fn is_root(&self) -> bool {
        self.target.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.sources.is_empty()
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
        self.brightness = color.brightness();
    }
}
