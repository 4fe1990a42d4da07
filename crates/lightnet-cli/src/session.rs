//! Shell session state
//!
//! Owns the network being edited and the random generator behind
//! `random_add`, and turns parsed commands into replies.

use lightnet::{BeaconId, Color, Coord, Cost, LightNetwork, Violation};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::Serialize;

use crate::{commands::Command, config::Config};

const RANDOM_NAMES: &[&str] = &[
    "Aurora", "Beacon", "Corona", "Delta", "Ember", "Flare", "Glow", "Halo", "Iris", "Lumen",
];

/// Coordinates of random beacons fall in `0..=RANDOM_COORD_MAX`
const RANDOM_COORD_MAX: i32 = 10_000;

/// Result of executing one command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Reply {
    Ok(bool),
    Count(usize),
    Id(BeaconId),
    Ids(Vec<BeaconId>),
    Name(String),
    Coord(Coord),
    Color(Color),
    Value(i32),
    Points(Vec<Coord>),
    Neighbors(Vec<(Coord, Cost)>),
    Fibres(Vec<(Coord, Coord)>),
    Route(Vec<(Coord, Cost)>),
    Cost(Cost),
    Violations(Vec<Violation>),
    Added { count: usize, beams: usize },
    Text(String),
    Help,
    Quit,
}

/// An editing session over one [`LightNetwork`]
pub struct Session {
    network: LightNetwork,
    config: Config,
    rng: StdRng,
    next_random: usize,
}

impl Session {
    pub fn new(config: Config) -> Self {
        let rng = match config.session.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        tracing::debug!("Session started (seed: {:?})", config.session.seed);

        Self {
            network: LightNetwork::with_config(config.network.clone()),
            config,
            rng,
            next_random: 0,
        }
    }

    pub fn network(&self) -> &LightNetwork {
        &self.network
    }

    /// Execute a parsed command against the network
    pub fn execute(&mut self, command: Command) -> Reply {
        let net = &mut self.network;

        match command {
            Command::BeaconCount => Reply::Count(net.beacon_count()),
            Command::ClearBeacons => {
                net.clear_beacons();
                Reply::Ok(true)
            }
            Command::AllBeacons => Reply::Ids(net.all_beacons()),
            Command::AddBeacon {
                id,
                name,
                coord,
                color,
            } => Reply::Ok(net.add_beacon(&id, &name, coord, color)),
            Command::GetName(id) => Reply::Name(net.get_name(&id)),
            Command::GetCoordinates(id) => Reply::Coord(net.get_coordinates(&id)),
            Command::GetColor(id) => Reply::Color(net.get_color(&id)),
            Command::GetBrightness(id) => Reply::Value(net.get_brightness(&id)),
            Command::BeaconsAlphabetically => Reply::Ids(net.beacons_alphabetically()),
            Command::BeaconsBrightnessIncreasing => {
                Reply::Ids(net.beacons_brightness_increasing())
            }
            Command::MinBrightness => Reply::Id(net.min_brightness()),
            Command::MaxBrightness => Reply::Id(net.max_brightness()),
            Command::FindBeacons(name) => Reply::Ids(net.find_beacons(&name)),
            Command::RenameBeacon { id, name } => Reply::Ok(net.rename_beacon(&id, &name)),
            Command::RecolorBeacon { id, color } => Reply::Ok(net.recolor_beacon(&id, color)),
            Command::ConnectBeam { source, target } => {
                Reply::Ok(net.connect_beam(&source, &target))
            }
            Command::IncomingSources(id) => Reply::Ids(net.incoming_sources(&id)),
            Command::PathToRoot(id) => Reply::Ids(net.path_to_root(&id)),
            Command::LongestIncomingPath(id) => Reply::Ids(net.longest_incoming_path(&id)),
            Command::RemoveBeacon(id) => Reply::Ok(net.remove_beacon(&id)),
            Command::TotalColor(id) => Reply::Color(net.total_color(&id)),

            Command::AllCrossPoints => Reply::Points(net.all_cross_points()),
            Command::AddFibre { a, b, cost } => Reply::Ok(net.add_fibre(a, b, cost)),
            Command::FibresFrom(point) => Reply::Neighbors(net.fibres_from(point)),
            Command::AllFibres => Reply::Fibres(net.all_fibres()),
            Command::RemoveFibre { a, b } => Reply::Ok(net.remove_fibre(a, b)),
            Command::ClearFibres => {
                net.clear_fibres();
                Reply::Ok(true)
            }
            Command::RouteAny { from, to } => Reply::Route(net.route_any(from, to)),
            Command::ShortestByHops { from, to } => Reply::Route(net.shortest_by_hops(from, to)),
            Command::CheapestByCost { from, to } => Reply::Route(net.cheapest_by_cost(from, to)),
            Command::FindCycle(point) => Reply::Points(net.find_cycle(point)),
            Command::Trim => Reply::Cost(net.trim_to_minimum()),

            Command::Check => Reply::Violations(net.check_consistency()),
            Command::RandomAdd(count) => self.random_add(count),
            Command::ShowConfig => match self.config.to_toml() {
                Ok(text) => Reply::Text(text),
                Err(e) => Reply::Text(format!("Could not render configuration: {}", e)),
            },
            Command::Help => Reply::Help,
            Command::Quit => Reply::Quit,
        }
    }

    /// Add `count` random beacons. Each new beacon beams to an existing one
    /// half of the time, which cannot close a cycle since it has no sources.
    fn random_add(&mut self, count: usize) -> Reply {
        let max_channel = self.config.network.beacons.max_channel.unwrap_or(255).max(0);
        let mut existing = self.network.all_beacons();
        let mut added = 0;
        let mut beams = 0;

        for _ in 0..count {
            let id = loop {
                self.next_random += 1;
                let candidate = format!("R{}", self.next_random);
                if !self.network.beacons().contains(&candidate) {
                    break candidate;
                }
            };

            let name = RANDOM_NAMES.choose(&mut self.rng).copied().unwrap_or("Beacon");
            let coord = Coord::new(
                self.rng.gen_range(0..=RANDOM_COORD_MAX),
                self.rng.gen_range(0..=RANDOM_COORD_MAX),
            );
            let color = Color::new(
                self.rng.gen_range(0..=max_channel),
                self.rng.gen_range(0..=max_channel),
                self.rng.gen_range(0..=max_channel),
            );

            if !self.network.add_beacon(&id, name, coord, color) {
                continue;
            }
            added += 1;

            if self.rng.gen_bool(0.5) {
                if let Some(target) = existing.choose(&mut self.rng) {
                    if self.network.connect_beam(&id, target) {
                        beams += 1;
                    }
                }
            }
            existing.push(id);
        }

        tracing::info!("Added {} random beacons with {} beams", added, beams);
        Reply::Added {
            count: added,
            beams,
        }
    }
}
