//! Primary beacon store with name and brightness orderings

use std::collections::BTreeSet;

use indexmap::IndexMap;

use super::Beacon;
use crate::config::BeaconConfig;
use crate::types::{BeaconId, Color, Coord};
use crate::{LightNetError, Result};

/// Owns every [`Beacon`] and keeps two ordered views over them.
///
/// Both orderings hold `(key, id)` pairs, so equal names or equal
/// brightnesses fall back to id order and every entry stays unique.
#[derive(Debug, Clone, Default)]
pub struct BeaconIndex {
    pub(super) beacons: IndexMap<BeaconId, Beacon>,
    by_name: BTreeSet<(String, BeaconId)>,
    by_brightness: BTreeSet<(i32, BeaconId)>,
    config: BeaconConfig,
}

impl BeaconIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BeaconConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Add a beacon. Fails without touching anything if the id is taken.
    pub fn add(
        &mut self,
        id: impl Into<BeaconId>,
        name: impl Into<String>,
        coord: Coord,
        color: Color,
    ) -> Result<()> {
        let id = id.into();
        if self.beacons.contains_key(&id) {
            return Err(LightNetError::DuplicateBeacon(id));
        }
        self.check_color(color)?;

        let beacon = Beacon::new(id.clone(), name.into(), coord, color);
        self.by_name.insert((beacon.name.clone(), id.clone()));
        self.by_brightness.insert((beacon.brightness, id.clone()));
        self.beacons.insert(id, beacon);
        Ok(())
    }

    /// Remove a beacon, its index entries and every beam touching it
    pub fn remove(&mut self, id: &str) -> Result<Beacon> {
        if !self.beacons.contains_key(id) {
            return Err(LightNetError::BeaconNotFound(id.to_string()));
        }
        self.sever_beams(id);

        let beacon = self
            .beacons
            .swap_remove(id)
            .ok_or_else(|| LightNetError::BeaconNotFound(id.to_string()))?;
        self.by_name.remove(&(beacon.name.clone(), beacon.id.clone()));
        self.by_brightness.remove(&(beacon.brightness, beacon.id.clone()));
        Ok(beacon)
    }

    pub fn rename(&mut self, id: &str, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        let beacon = self
            .beacons
            .get_mut(id)
            .ok_or_else(|| LightNetError::BeaconNotFound(id.to_string()))?;

        // The stale entry has to go first, otherwise the ordering keeps both.
        self.by_name.remove(&(beacon.name.clone(), beacon.id.clone()));
        beacon.name = name;
        self.by_name.insert((beacon.name.clone(), beacon.id.clone()));
        Ok(())
    }

    pub fn recolor(&mut self, id: &str, color: Color) -> Result<()> {
        if !self.beacons.contains_key(id) {
            return Err(LightNetError::BeaconNotFound(id.to_string()));
        }
        self.check_color(color)?;
        let beacon = self
            .beacons
            .get_mut(id)
            .ok_or_else(|| LightNetError::BeaconNotFound(id.to_string()))?;

        self.by_brightness
            .remove(&(beacon.brightness, beacon.id.clone()));
        beacon.set_color(color);
        self.by_brightness
            .insert((beacon.brightness, beacon.id.clone()));
        Ok(())
    }

    /// Remove every beacon and beam
    pub fn clear(&mut self) {
        self.beacons.clear();
        self.by_name.clear();
        self.by_brightness.clear();
    }

    pub fn get(&self, id: &str) -> Option<&Beacon> {
        self.beacons.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.beacons.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.beacons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beacons.is_empty()
    }

    /// All ids, in no particular order
    pub fn ids(&self) -> Vec<BeaconId> {
        self.beacons.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Beacon> {
        self.beacons.values()
    }

    /// Ids ordered by name
    pub fn by_name(&self) -> Vec<BeaconId> {
        self.by_name.iter().map(|(_, id)| id.clone()).collect()
    }

    /// Ids ordered by increasing brightness
    pub fn by_brightness(&self) -> Vec<BeaconId> {
        self.by_brightness.iter().map(|(_, id)| id.clone()).collect()
    }

    pub fn min_brightness(&self) -> Option<&str> {
        self.by_brightness.first().map(|(_, id)| id.as_str())
    }

    pub fn max_brightness(&self) -> Option<&str> {
        self.by_brightness.last().map(|(_, id)| id.as_str())
    }

    /// Every beacon carrying exactly this name, sorted by id
    pub fn find_by_name(&self, name: &str) -> Vec<BeaconId> {
        self.by_name
            .range((name.to_string(), BeaconId::new())..)
            .take_while(|(n, _)| n == name)
            .map(|(_, id)| id.clone())
            .collect()
    }

    pub(crate) fn name_entries(&self) -> impl Iterator<Item = &(String, BeaconId)> {
        self.by_name.iter()
    }

    pub(crate) fn brightness_entries(&self) -> impl Iterator<Item = &(i32, BeaconId)> {
        self.by_brightness.iter()
    }

    fn check_color(&self, color: Color) -> Result<()> {
        if color.checked_brightness().is_none() {
            return Err(LightNetError::BrightnessOverflow(color));
        }
        if self.config.accepts(color) {
            Ok(())
        } else {
            Err(LightNetError::ColorOutOfRange {
                color,
                max: self.config.max_channel.unwrap_or_default(),
            })
        }
    }
}
