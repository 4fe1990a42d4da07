//! Command line parsing
//!
//! One input line is one command: a command word followed by arguments.
//! Ids and names may be bare words or double-quoted, coordinates are written
//! `(x,y)` and colors `(r,g,b)`. Lines starting with `#` are comments.

use lightnet::{Color, Coord, Cost};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command: {0}. Use help for available commands.")]
    UnknownCommand(String),

    #[error("{command}: missing {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("{command}: expected {expected}, found {found}")]
    InvalidArgument {
        command: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("{0}: too many arguments")]
    TrailingInput(&'static str),

    #[error("Unterminated {0}")]
    Unterminated(&'static str),

    #[error("Invalid number in {0}")]
    InvalidNumber(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Quoted(String),
    Tuple(Vec<i32>),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Word(w) => w.clone(),
            Token::Quoted(q) => format!("\"{}\"", q),
            Token::Tuple(values) => format!(
                "({})",
                values
                    .iter()
                    .map(i32::to_string)
                    .collect::<Vec<_>>()
                    .join(",")
            ),
        }
    }
}

fn tokenize(line: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        match ch {
            '"' => {
                chars.next();
                let mut text = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(c) => text.push(c),
                        None => return Err(ParseError::Unterminated("quoted string")),
                    }
                }
                tokens.push(Token::Quoted(text));
            }
            '(' => {
                chars.next();
                let mut inner = String::new();
                loop {
                    match chars.next() {
                        Some(')') => break,
                        Some(c) => inner.push(c),
                        None => return Err(ParseError::Unterminated("parenthesis")),
                    }
                }
                let values = inner
                    .split(',')
                    .map(|v| v.trim().parse::<i32>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| ParseError::InvalidNumber(format!("({})", inner)))?;
                tokens.push(Token::Tuple(values));
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || c == '"' || c == '(' {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                tokens.push(Token::Word(word));
            }
        }
    }

    Ok(tokens)
}

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Beacons
    BeaconCount,
    ClearBeacons,
    AllBeacons,
    AddBeacon {
        id: String,
        name: String,
        coord: Coord,
        color: Color,
    },
    GetName(String),
    GetCoordinates(String),
    GetColor(String),
    GetBrightness(String),
    BeaconsAlphabetically,
    BeaconsBrightnessIncreasing,
    MinBrightness,
    MaxBrightness,
    FindBeacons(String),
    RenameBeacon { id: String, name: String },
    RecolorBeacon { id: String, color: Color },
    ConnectBeam { source: String, target: String },
    IncomingSources(String),
    PathToRoot(String),
    LongestIncomingPath(String),
    RemoveBeacon(String),
    TotalColor(String),

    // Fibres
    AllCrossPoints,
    AddFibre { a: Coord, b: Coord, cost: Cost },
    FibresFrom(Coord),
    AllFibres,
    RemoveFibre { a: Coord, b: Coord },
    ClearFibres,
    RouteAny { from: Coord, to: Coord },
    ShortestByHops { from: Coord, to: Coord },
    CheapestByCost { from: Coord, to: Coord },
    FindCycle(Coord),
    Trim,

    // Session
    Check,
    RandomAdd(usize),
    ShowConfig,
    Help,
    Quit,
}

struct Args {
    command: &'static str,
    tokens: std::vec::IntoIter<Token>,
}

impl Args {
    fn next(&mut self, expected: &'static str) -> Result<Token, ParseError> {
        self.tokens.next().ok_or(ParseError::MissingArgument {
            command: self.command,
            expected,
        })
    }

    fn invalid(&self, expected: &'static str, token: &Token) -> ParseError {
        ParseError::InvalidArgument {
            command: self.command,
            expected,
            found: token.describe(),
        }
    }

    fn text(&mut self, expected: &'static str) -> Result<String, ParseError> {
        match self.next(expected)? {
            Token::Word(text) | Token::Quoted(text) => Ok(text),
            other => Err(self.invalid(expected, &other)),
        }
    }

    fn coord(&mut self) -> Result<Coord, ParseError> {
        match self.next("coordinate (x,y)")? {
            Token::Tuple(v) if v.len() == 2 => Ok(Coord::new(v[0], v[1])),
            other => Err(self.invalid("coordinate (x,y)", &other)),
        }
    }

    fn color(&mut self) -> Result<Color, ParseError> {
        match self.next("color (r,g,b)")? {
            Token::Tuple(v) if v.len() == 3 => Ok(Color::new(v[0], v[1], v[2])),
            other => Err(self.invalid("color (r,g,b)", &other)),
        }
    }

    fn number<T: std::str::FromStr>(&mut self, expected: &'static str) -> Result<T, ParseError> {
        let token = self.next(expected)?;
        match &token {
            Token::Word(word) => word.parse().map_err(|_| self.invalid(expected, &token)),
            _ => Err(self.invalid(expected, &token)),
        }
    }

    fn finish<T>(mut self, command: T) -> Result<T, ParseError> {
        match self.tokens.next() {
            Some(_) => Err(ParseError::TrailingInput(self.command)),
            None => Ok(command),
        }
    }
}

/// Parse one input line. Blank lines and comments give `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut tokens = tokenize(line)?.into_iter();
    let word = match tokens.next() {
        Some(Token::Word(word)) => word,
        Some(other) => return Err(ParseError::UnknownCommand(other.describe())),
        None => return Ok(None),
    };

    let Some(command) = COMMANDS.iter().find(|c| c.name == word || c.alias == Some(word.as_str()))
    else {
        return Err(ParseError::UnknownCommand(word));
    };

    let args = Args {
        command: command.name,
        tokens,
    };
    (command.parse)(args).map(Some)
}

/// Entry in the command table
pub struct CommandEntry {
    pub name: &'static str,
    pub alias: Option<&'static str>,
    pub usage: &'static str,
    pub summary: &'static str,
    parse: fn(Args) -> Result<Command, ParseError>,
}

macro_rules! entry {
    ($name:literal, $alias:expr, $usage:literal, $summary:literal, $parse:expr) => {
        CommandEntry {
            name: $name,
            alias: $alias,
            usage: $usage,
            summary: $summary,
            parse: $parse,
        }
    };
}

pub const COMMANDS: &[CommandEntry] = &[
    entry!("beacon_count", None, "", "Number of beacons", |a| a.finish(Command::BeaconCount)),
    entry!("clear_beacons", None, "", "Remove every beacon", |a| a.finish(Command::ClearBeacons)),
    entry!("all_beacons", None, "", "Ids of every beacon", |a| a.finish(Command::AllBeacons)),
    entry!(
        "add_beacon",
        None,
        "<id> \"<name>\" (x,y) (r,g,b)",
        "Add a beacon",
        |mut a| {
            let id = a.text("beacon id")?;
            let name = a.text("name")?;
            let coord = a.coord()?;
            let color = a.color()?;
            a.finish(Command::AddBeacon {
                id,
                name,
                coord,
                color,
            })
        }
    ),
    entry!("get_name", Some("name"), "<id>", "Name of a beacon", |mut a| {
        let id = a.text("beacon id")?;
        a.finish(Command::GetName(id))
    }),
    entry!("get_coordinates", Some("coords"), "<id>", "Coordinates of a beacon", |mut a| {
        let id = a.text("beacon id")?;
        a.finish(Command::GetCoordinates(id))
    }),
    entry!("get_color", Some("color"), "<id>", "Color of a beacon", |mut a| {
        let id = a.text("beacon id")?;
        a.finish(Command::GetColor(id))
    }),
    entry!("get_brightness", Some("brightness"), "<id>", "Brightness of a beacon", |mut a| {
        let id = a.text("beacon id")?;
        a.finish(Command::GetBrightness(id))
    }),
    entry!("beacons_alphabetically", Some("by_name"), "", "Beacons ordered by name", |a| {
        a.finish(Command::BeaconsAlphabetically)
    }),
    entry!(
        "beacons_brightness_increasing",
        Some("by_brightness"),
        "",
        "Beacons ordered by brightness",
        |a| a.finish(Command::BeaconsBrightnessIncreasing)
    ),
    entry!("min_brightness", Some("min"), "", "Dimmest beacon", |a| {
        a.finish(Command::MinBrightness)
    }),
    entry!("max_brightness", Some("max"), "", "Brightest beacon", |a| {
        a.finish(Command::MaxBrightness)
    }),
    entry!("find_beacons", Some("find"), "\"<name>\"", "Beacons with a name", |mut a| {
        let name = a.text("name")?;
        a.finish(Command::FindBeacons(name))
    }),
    entry!("rename_beacon", Some("rename"), "<id> \"<name>\"", "Change a name", |mut a| {
        let id = a.text("beacon id")?;
        let name = a.text("name")?;
        a.finish(Command::RenameBeacon { id, name })
    }),
    entry!("recolor_beacon", Some("recolor"), "<id> (r,g,b)", "Change a color", |mut a| {
        let id = a.text("beacon id")?;
        let color = a.color()?;
        a.finish(Command::RecolorBeacon { id, color })
    }),
    entry!("connect_beam", Some("beam"), "<source> <target>", "Send a light beam", |mut a| {
        let source = a.text("source id")?;
        let target = a.text("target id")?;
        a.finish(Command::ConnectBeam { source, target })
    }),
    entry!("incoming_sources", Some("sources"), "<id>", "Direct beam sources", |mut a| {
        let id = a.text("beacon id")?;
        a.finish(Command::IncomingSources(id))
    }),
    entry!("path_to_root", Some("path"), "<id>", "Beam chain from the root", |mut a| {
        let id = a.text("beacon id")?;
        a.finish(Command::PathToRoot(id))
    }),
    entry!(
        "longest_incoming_path",
        Some("longest"),
        "<id>",
        "Longest beam chain ending here",
        |mut a| {
            let id = a.text("beacon id")?;
            a.finish(Command::LongestIncomingPath(id))
        }
    ),
    entry!("remove_beacon", Some("remove"), "<id>", "Remove a beacon and its beams", |mut a| {
        let id = a.text("beacon id")?;
        a.finish(Command::RemoveBeacon(id))
    }),
    entry!("total_color", None, "<id>", "Averaged color of incoming light", |mut a| {
        let id = a.text("beacon id")?;
        a.finish(Command::TotalColor(id))
    }),
    entry!("all_cross_points", Some("points"), "", "Every fibre endpoint", |a| {
        a.finish(Command::AllCrossPoints)
    }),
    entry!("add_fibre", None, "(x,y) (x,y) <cost>", "Add a fibre", |mut a| {
        let from = a.coord()?;
        let to = a.coord()?;
        let cost = a.number("cost")?;
        a.finish(Command::AddFibre {
            a: from,
            b: to,
            cost,
        })
    }),
    entry!("fibres_from", None, "(x,y)", "Fibres leaving a point", |mut a| {
        let point = a.coord()?;
        a.finish(Command::FibresFrom(point))
    }),
    entry!("all_fibres", None, "", "Every fibre", |a| a.finish(Command::AllFibres)),
    entry!("remove_fibre", None, "(x,y) (x,y)", "Remove a fibre", |mut a| {
        let from = a.coord()?;
        let to = a.coord()?;
        a.finish(Command::RemoveFibre { a: from, b: to })
    }),
    entry!("clear_fibres", None, "", "Remove every fibre", |a| a.finish(Command::ClearFibres)),
    entry!("route_any", None, "(x,y) (x,y)", "Any route", |mut a| {
        let from = a.coord()?;
        let to = a.coord()?;
        a.finish(Command::RouteAny { from, to })
    }),
    entry!("shortest_by_hops", Some("hops"), "(x,y) (x,y)", "Route with fewest fibres", |mut a| {
        let from = a.coord()?;
        let to = a.coord()?;
        a.finish(Command::ShortestByHops { from, to })
    }),
    entry!("cheapest_by_cost", Some("cheapest"), "(x,y) (x,y)", "Route with lowest cost", |mut a| {
        let from = a.coord()?;
        let to = a.coord()?;
        a.finish(Command::CheapestByCost { from, to })
    }),
    entry!("find_cycle", Some("cycle"), "(x,y)", "A fibre cycle reachable from a point", |mut a| {
        let point = a.coord()?;
        a.finish(Command::FindCycle(point))
    }),
    entry!("trim", Some("trim_to_minimum"), "", "Reduce fibres to a minimum spanning forest", |a| {
        a.finish(Command::Trim)
    }),
    entry!("check", None, "", "Run consistency checks", |a| a.finish(Command::Check)),
    entry!("random_add", None, "<n>", "Add n random beacons", |mut a| {
        let count = a.number("count")?;
        a.finish(Command::RandomAdd(count))
    }),
    entry!("config", None, "", "Show the active configuration", |a| {
        a.finish(Command::ShowConfig)
    }),
    entry!("help", Some("?"), "", "Show this help", |a| a.finish(Command::Help)),
    entry!("quit", Some("exit"), "", "Exit the shell", |a| a.finish(Command::Quit)),
];
