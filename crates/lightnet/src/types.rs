//! Value types shared by both structures, plus the "not found" sentinels

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Beacon identity. Opaque and unique within a [`crate::BeaconIndex`].
pub type BeaconId = String;

/// Fibre transmission cost.
pub type Cost = i32;

/// Integer value returned when a numeric field is not found.
pub const NO_VALUE: i32 = i32::MIN;

/// Id returned when no beacon matches.
pub const NO_ID: &str = "----------";

/// Name returned for an unknown beacon.
pub const NO_NAME: &str = "-- unknown --";

/// Cost returned when a cost is unknown.
pub const NO_COST: Cost = NO_VALUE;

/// A 2-D integer coordinate.
///
/// Ordered by `y` first and `x` second, so cross-points iterate row by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const NONE: Coord = Coord {
        x: NO_VALUE,
        y: NO_VALUE,
    };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

impl Ord for Coord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return write!(f, "(--,--)");
        }
        write!(f, "({},{})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

impl Color {
    pub const NONE: Color = Color {
        r: NO_VALUE,
        g: NO_VALUE,
        b: NO_VALUE,
    };

    pub const fn new(r: i32, g: i32, b: i32) -> Self {
        Self { r, g, b }
    }

    /// Perceived brightness: `3r + 6g + b`, or `None` if it does not fit an `i32`.
    pub fn checked_brightness(&self) -> Option<i32> {
        self.r
            .checked_mul(3)?
            .checked_add(self.g.checked_mul(6)?)?
            .checked_add(self.b)
    }

    /// Perceived brightness: `3r + 6g + b`. [`NO_VALUE`] when out of range.
    pub fn brightness(&self) -> i32 {
        self.checked_brightness().unwrap_or(NO_VALUE)
    }

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    pub(crate) fn channels(&self) -> [i32; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return write!(f, "(--,--,--)");
        }
        write!(f, "({},{},{})", self.r, self.g, self.b)
    }
}

impl From<(i32, i32, i32)> for Color {
    fn from((r, g, b): (i32, i32, i32)) -> Self {
        Self { r, g, b }
    }
}
