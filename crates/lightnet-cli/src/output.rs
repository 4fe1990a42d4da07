//! Output formatting and terminal rendering

use colored::Colorize;
use lightnet::{Color, Coord, Cost, Violation, ViolationSeverity, NO_COST, NO_ID, NO_NAME, NO_VALUE};

use crate::{commands::COMMANDS, session::Reply};

fn format_coord(coord: Coord) -> String {
    if coord.is_none() {
        coord.to_string().dimmed().to_string()
    } else {
        coord.to_string()
    }
}

fn format_color(color: Color) -> String {
    if color.is_none() {
        color.to_string().dimmed().to_string()
    } else {
        color.to_string()
    }
}

fn format_id(id: &str) -> String {
    if id == NO_ID {
        id.dimmed().to_string()
    } else {
        id.bright_white().to_string()
    }
}

/// Output handler for terminal display
pub struct OutputHandler {
    pub json: bool,
}

impl OutputHandler {
    pub fn new(colors: bool, json: bool) -> Self {
        if !colors || json {
            colored::control::set_override(false);
        }
        Self { json }
    }

    /// Print the welcome banner
    pub fn print_banner(&self) {
        println!();
        println!("{}", "LightNet shell".bright_cyan().bold());
        println!(
            "{}",
            format!("v{}  Type help for commands, quit to exit.", env!("CARGO_PKG_VERSION"))
                .dimmed()
        );
        println!();
    }

    /// Print a success message
    pub fn print_success(&self, text: &str) {
        println!("{} {}", "✓".bright_green(), text.bright_white());
    }

    /// Print an error message
    pub fn print_error(&self, text: &str) {
        println!("{} {}", "✗".bright_red(), text.bright_red());
    }

    /// Print a warning message
    pub fn print_warning(&self, text: &str) {
        println!("{} {}", "⚠".bright_yellow(), text.yellow());
    }

    /// Print an info message
    pub fn print_info(&self, text: &str) {
        println!("{} {}", "ℹ".bright_blue(), text);
    }

    /// Echo a script line before its result
    pub fn print_echo(&self, line: &str) {
        if !self.json {
            println!("{} {}", ">".bright_green(), line.dimmed());
        }
    }

    /// Print the command reference
    pub fn print_help(&self) {
        println!();
        println!("{}", "LightNet Commands".bright_white().bold());
        println!("{}", "─".repeat(60).dimmed());

        for command in COMMANDS {
            let usage = if command.usage.is_empty() {
                command.name.to_string()
            } else {
                format!("{} {}", command.name, command.usage)
            };
            let alias = command
                .alias
                .map(|a| format!(" ({})", a))
                .unwrap_or_default();
            println!(
                "  {:<48} {}{}",
                usage.bright_yellow(),
                command.summary,
                alias.dimmed()
            );
        }
        println!();
    }

    /// Print a command reply, as JSON when requested
    pub fn print_reply(&self, reply: &Reply) {
        if self.json {
            match serde_json::to_string(reply) {
                Ok(json) => println!("{}", json),
                Err(e) => self.print_error(&format!("Could not encode reply: {}", e)),
            }
            return;
        }

        match reply {
            Reply::Ok(true) => self.print_success("ok"),
            Reply::Ok(false) => self.print_warning("rejected"),
            Reply::Count(n) => println!("{}", n.to_string().bright_white()),
            Reply::Id(id) => println!("{}", format_id(id)),
            Reply::Ids(ids) => self.print_ids(ids),
            Reply::Name(name) if name == NO_NAME => println!("{}", name.dimmed()),
            Reply::Name(name) => println!("{}", name.bright_white()),
            Reply::Coord(coord) => println!("{}", format_coord(*coord)),
            Reply::Color(color) => println!("{}", format_color(*color)),
            Reply::Value(value) if *value == NO_VALUE => println!("{}", "--".dimmed()),
            Reply::Value(value) => println!("{}", value),
            Reply::Points(points) => self.print_points(points),
            Reply::Neighbors(neighbors) => self.print_costed(neighbors, "cost"),
            Reply::Fibres(fibres) => self.print_fibres(fibres),
            Reply::Route(route) => self.print_costed(route, "total"),
            Reply::Cost(cost) => self.print_cost(*cost),
            Reply::Violations(violations) => self.print_violations(violations),
            Reply::Added { count, beams } => {
                self.print_success(&format!("Added {} beacons, {} beams", count, beams))
            }
            Reply::Text(text) => println!("{}", text),
            Reply::Help => self.print_help(),
            Reply::Quit => {}
        }
    }

    fn print_ids(&self, ids: &[String]) {
        if ids.is_empty() {
            println!("{}", "(none)".dimmed());
            return;
        }
        for (i, id) in ids.iter().enumerate() {
            println!("{:>4}. {}", i + 1, format_id(id));
        }
    }

    fn print_points(&self, points: &[Coord]) {
        if points.is_empty() {
            println!("{}", "(none)".dimmed());
            return;
        }
        for (i, point) in points.iter().enumerate() {
            println!("{:>4}. {}", i + 1, point);
        }
    }

    fn print_costed(&self, steps: &[(Coord, Cost)], label: &str) {
        if steps.is_empty() {
            println!("{}", "(none)".dimmed());
            return;
        }
        for (i, (point, cost)) in steps.iter().enumerate() {
            println!(
                "{:>4}. {:<24} {} {}",
                i + 1,
                point.to_string(),
                format!("{}:", label).dimmed(),
                cost.to_string().bright_cyan()
            );
        }
    }

    fn print_fibres(&self, fibres: &[(Coord, Coord)]) {
        if fibres.is_empty() {
            println!("{}", "(none)".dimmed());
            return;
        }
        for (i, (a, b)) in fibres.iter().enumerate() {
            println!("{:>4}. {} {} {}", i + 1, a, "──".dimmed(), b);
        }
    }

    fn print_cost(&self, cost: Cost) {
        if cost == NO_COST {
            println!("{}", "nothing to trim".dimmed());
        } else {
            println!("{} {}", "Removed cost:".dimmed(), cost.to_string().bright_cyan());
        }
    }

    fn print_violations(&self, violations: &[Violation]) {
        if violations.is_empty() {
            self.print_success("All invariants hold");
            return;
        }
        for violation in violations {
            let text = format!("[{}] {}", violation.invariant_name, violation.message);
            match violation.severity {
                ViolationSeverity::Warning => self.print_warning(&text),
                ViolationSeverity::Error => self.print_error(&text),
            }
        }
    }
}
