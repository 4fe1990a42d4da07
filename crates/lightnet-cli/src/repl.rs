//! Interactive REPL and script runner for LightNet CLI

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use rustyline::{error::ReadlineError, history::DefaultHistory, Editor};

use crate::{
    commands::parse_line,
    config::Config,
    output::OutputHandler,
    session::{Reply, Session},
};

/// Interactive REPL for LightNet CLI
pub struct LightNetRepl {
    session: Session,
    output: OutputHandler,
    show_banner: bool,
}

impl LightNetRepl {
    pub fn new(config: Config, json: bool) -> Self {
        let output = OutputHandler::new(config.display.colors, json);
        let show_banner = config.display.show_banner && !json;

        Self {
            session: Session::new(config),
            output,
            show_banner,
        }
    }

    /// Run the interactive REPL
    pub fn run(&mut self) -> Result<()> {
        let mut editor: Editor<(), DefaultHistory> = Editor::new()?;

        if self.show_banner {
            self.output.print_banner();
        }

        loop {
            let prompt = self.build_prompt();

            match editor.readline(&prompt) {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = editor.add_history_entry(input);

                    if self.handle_line(input) {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!();
                    self.output.print_info("Use quit to exit.");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(e) => {
                    self.output.print_error(&format!("Input error: {}", e));
                    break;
                }
            }
        }

        Ok(())
    }

    /// Execute every line of a script file, echoing each command
    pub fn run_script(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        tracing::info!("Running script {}", path.display());

        for line in content.lines() {
            let input = line.trim();
            if input.is_empty() || input.starts_with('#') {
                continue;
            }

            self.output.print_echo(input);
            if self.handle_line(input) {
                break;
            }
        }

        Ok(())
    }

    /// Parse and execute one line. Returns true when the session should end.
    fn handle_line(&mut self, input: &str) -> bool {
        let command = match parse_line(input) {
            Ok(Some(command)) => command,
            Ok(None) => return false,
            Err(e) => {
                self.output.print_error(&e.to_string());
                return false;
            }
        };

        let reply = self.session.execute(command);
        if reply == Reply::Quit {
            return true;
        }
        self.output.print_reply(&reply);
        false
    }

    /// Build the prompt string
    fn build_prompt(&self) -> String {
        let network = self.session.network();
        format!(
            "\n{} [{} beacons, {} fibres] {} ",
            "lightnet".bright_green().bold(),
            network.beacon_count().to_string().bright_cyan(),
            network.all_fibres().len().to_string().bright_cyan(),
            ">".bright_green()
        )
    }
}
