//! Light-beam forest - beam links, path walks and color aggregation
//!
//! Every beacon sends at most one beam, so following targets always climbs
//! towards a single root. Beams are assumed acyclic; that is a precondition
//! on callers and is not checked. The walks below are iterative and bounded
//! by the beacon count, so a caller-made cycle yields a truncated answer
//! rather than a hang.

use std::collections::{HashMap, HashSet};

use super::BeaconIndex;
use crate::types::{BeaconId, Color};
use crate::{LightNetError, Result};

impl BeaconIndex {
    /// Send a beam from `source` to `target`
    pub fn connect(&mut self, source: &str, target: &str) -> Result<()> {
        if !self.beacons.contains_key(target) {
            return Err(LightNetError::BeaconNotFound(target.to_string()));
        }
        let beacon = self
            .beacons
            .get_mut(source)
            .ok_or_else(|| LightNetError::BeaconNotFound(source.to_string()))?;

        if let Some(existing) = &beacon.target {
            return Err(LightNetError::BeamAlreadySet {
                source_id: source.to_string(),
                target: existing.clone(),
            });
        }
        beacon.target = Some(target.to_string());

        if let Some(receiver) = self.beacons.get_mut(target) {
            receiver.sources.insert(source.to_string());
        }
        Ok(())
    }

    /// Beacons sending directly to `id`, ascending
    pub fn incoming_sources(&self, id: &str) -> Option<Vec<BeaconId>> {
        let beacon = self.beacons.get(id)?;
        Some(beacon.sources.iter().cloned().collect())
    }

    /// Ids from the root of `id`'s tree down to `id` itself
    pub fn path_to_root(&self, id: &str) -> Option<Vec<BeaconId>> {
        let mut current = self.beacons.get(id)?;
        let mut path = vec![current.id.clone()];

        while let Some(next) = current.target.as_deref().and_then(|t| self.beacons.get(t)) {
            if path.len() > self.beacons.len() {
                break;
            }
            path.push(next.id.clone());
            current = next;
        }

        path.reverse();
        Some(path)
    }

    /// Average of `id`'s color and the total colors of its direct sources.
    ///
    /// Each beacon divides the channel sums by `1 + sources` with integer
    /// division, working up from the leaves of the incoming subtree.
    pub fn total_color(&self, id: &str) -> Option<Color> {
        let root = self.beacons.get(id)?;
        let mut totals: HashMap<&str, Color> = HashMap::new();

        for beacon in self.post_order(root.id.as_str()) {
            let Some(record) = self.beacons.get(beacon) else {
                continue;
            };

            let mut sums = record.color.channels().map(i64::from);
            for source in &record.sources {
                let color = totals.get(source.as_str()).copied().unwrap_or(record.color);
                for (sum, channel) in sums.iter_mut().zip(color.channels()) {
                    *sum += i64::from(channel);
                }
            }

            let divider = 1 + record.sources.len() as i64;
            let [r, g, b] = sums.map(|sum| (sum / divider) as i32);
            totals.insert(beacon, Color::new(r, g, b));
        }

        totals.get(root.id.as_str()).copied()
    }

    /// Longest chain of beams ending at `id`, farthest source first.
    ///
    /// Among equally long chains the smallest source id wins at each step.
    pub fn longest_incoming_path(&self, id: &str) -> Option<Vec<BeaconId>> {
        let root = self.beacons.get(id)?;
        let mut depth: HashMap<&str, usize> = HashMap::new();

        for beacon in self.post_order(root.id.as_str()) {
            let Some(record) = self.beacons.get(beacon) else {
                continue;
            };
            let deepest = record
                .sources
                .iter()
                .filter_map(|s| depth.get(s.as_str()))
                .max()
                .copied()
                .unwrap_or(0);
            depth.insert(beacon, deepest + 1);
        }

        let mut chain = vec![root.id.clone()];
        let mut current = root;
        loop {
            let mut best: Option<(&str, usize)> = None;
            for source in &current.sources {
                let d = depth.get(source.as_str()).copied().unwrap_or(0);
                if best.map_or(true, |(_, best_depth)| d > best_depth) {
                    best = Some((source.as_str(), d));
                }
            }
            let Some(next) = best.and_then(|(id, _)| self.beacons.get(id)) else {
                break;
            };
            if chain.len() > self.beacons.len() {
                break;
            }
            chain.push(next.id.clone());
            current = next;
        }

        chain.reverse();
        Some(chain)
    }

    /// Cut every beam touching `id`. Its sources become roots.
    pub(super) fn sever_beams(&mut self, id: &str) {
        let Some(beacon) = self.beacons.get_mut(id) else {
            return;
        };
        let target = beacon.target.take();
        let sources = std::mem::take(&mut beacon.sources);

        if let Some(target) = target {
            if let Some(receiver) = self.beacons.get_mut(&target) {
                receiver.sources.remove(id);
            }
        }
        for source in sources {
            if let Some(sender) = self.beacons.get_mut(&source) {
                sender.target = None;
            }
        }
        tracing::trace!("Severed beams of beacon {}", id);
    }

    /// Incoming subtree of `id`, every source before the beacon it feeds
    fn post_order<'a>(&'a self, id: &'a str) -> Vec<&'a str> {
        let mut order = Vec::new();
        let mut entered: HashSet<&str> = HashSet::new();
        let mut stack: Vec<(&str, bool)> = vec![(id, false)];

        while let Some((current, expanded)) = stack.pop() {
            if expanded {
                order.push(current);
                continue;
            }
            if !entered.insert(current) {
                continue;
            }
            stack.push((current, true));
            if let Some(beacon) = self.beacons.get(current) {
                for source in beacon.sources.iter().rev() {
                    if !entered.contains(source.as_str()) {
                        stack.push((source.as_str(), false));
                    }
                }
            }
        }

        order
    }
}
