//! The terminal easter-egg app.
//!
//! A project's custom commands map a name to a fixed output. Projects without
//! custom commands get a built-in set, some of which answer with a random pick
//! from several lines.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::records::TerminalCommand;

/// Commands handled by the terminal itself.
pub const RESERVED_COMMANDS: &[&str] = &["help", "clear"];

pub const WELCOME: &str = "Welcome to the Terminal of Love\n\
Type 'help' to see available commands.\n\n\
Ready to spread some love? Type a command below...";

const DEFAULT_COMMANDS: &[(&str, &[&str])] = &[
    (
        "pickup",
        &[
            "Are you a magician? Because whenever I look at you, everyone else disappears.",
            "Do you have a map? I keep getting lost in your eyes.",
            "Is your name Wi-Fi? Because I'm feeling a connection.",
        ],
    ),
    ("kiss", &["*sending virtual kisses*\nMwah! Mwah! Mwah!"]),
    ("hug", &["*wrapping you in the warmest virtual hug*"]),
    (
        "compliment",
        &[
            "You make every day brighter just by being in it.",
            "Your laugh is my favourite sound.",
            "You are even more beautiful on the inside.",
        ],
    ),
    ("heart", &["  <3 <3   <3 <3\n <3   <3 <3   <3\n  <3 I LOVE YOU <3\n    <3       <3\n      <3   <3\n        <3"]),
];

/// Normalize a command name for storage: lowercase, no whitespace.
pub fn normalize_command(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// What the terminal does with one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print this output under the echoed command.
    Output(String),
    /// Wipe the history.
    Clear,
    /// Blank input; nothing happens.
    Ignored,
}

/// Command table for one project.
#[derive(Debug, Clone)]
pub struct Terminal {
    /// Command names in display order.
    order: Vec<String>,
    responses: HashMap<String, Vec<String>>,
}

impl Default for Terminal {
    fn default() -> Self {
        let mut terminal = Self::empty();
        for (name, lines) in DEFAULT_COMMANDS {
            terminal.insert(name, lines.iter().map(|line| line.to_string()).collect());
        }
        terminal
    }
}

impl Terminal {
    fn empty() -> Self {
        Self {
            order: Vec::new(),
            responses: HashMap::new(),
        }
    }

    /// Build the table from a project's commands, falling back to the
    /// built-in set when there are none.
    pub fn from_commands(commands: &[TerminalCommand]) -> Self {
        if commands.is_empty() {
            return Self::default();
        }

        let mut sorted: Vec<&TerminalCommand> = commands.iter().collect();
        sorted.sort_by_key(|c| c.sort_order);

        let mut terminal = Self::empty();
        for command in sorted {
            let name = normalize_command(&command.command);
            if name.is_empty() || RESERVED_COMMANDS.contains(&name.as_str()) {
                continue;
            }
            terminal.insert(&name, vec![command.output.clone()]);
        }
        terminal
    }

    fn insert(&mut self, name: &str, lines: Vec<String>) {
        if self.responses.insert(name.to_string(), lines).is_none() {
            self.order.push(name.to_string());
        }
    }

    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn help_text(&self) -> String {
        let mut names = vec!["help"];
        names.extend(self.commands());
        names.push("clear");
        format!("Available commands: {}", names.join(", "))
    }

    /// Answer one line of input.
    pub fn respond(&self, input: &str) -> Reply {
        self.respond_with(input, &mut rand::thread_rng())
    }

    /// Answer one line of input, picking among multiple responses with `rng`.
    pub fn respond_with<R: Rng + ?Sized>(&self, input: &str, rng: &mut R) -> Reply {
        let cmd = input.trim().to_lowercase();
        match cmd.as_str() {
            "" => Reply::Ignored,
            "clear" => Reply::Clear,
            "help" => Reply::Output(self.help_text()),
            _ => match self.responses.get(&cmd).and_then(|lines| lines.choose(rng)) {
                Some(line) => Reply::Output(line.clone()),
                None => Reply::Output(format!(
                    "Command not found: {cmd}\nType 'help' to see available commands."
                )),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use uuid::Uuid;

    #[test]
    fn test_normalize_command() {
        assert_eq!(normalize_command(" Miss  You\t"), "missyou");
        assert_eq!(normalize_command("KISS"), "kiss");
    }

    #[test]
    fn test_default_commands() {
        let terminal = Terminal::default();
        assert_eq!(
            terminal.respond("hug"),
            Reply::Output("*wrapping you in the warmest virtual hug*".to_string())
        );
        let help = terminal.help_text();
        assert!(help.starts_with("Available commands: help, pickup"));
        assert!(help.ends_with(", clear"));
    }

    #[test]
    fn test_multi_response_picks_one() {
        let terminal = Terminal::default();
        let mut rng = StdRng::seed_from_u64(7);
        let pickup_lines = DEFAULT_COMMANDS[0].1;
        for _ in 0..10 {
            match terminal.respond_with("pickup", &mut rng) {
                Reply::Output(line) => assert!(pickup_lines.contains(&line.as_str())),
                other => panic!("unexpected reply {:?}", other),
            }
        }
    }

    #[test]
    fn test_custom_commands_replace_defaults() {
        let project = Uuid::now_v7();
        let terminal = Terminal::from_commands(&[
            TerminalCommand::new(project, "poem", "Roses are red", 2),
            TerminalCommand::new(project, "Miss You", "Always.", 1),
            TerminalCommand::new(project, "clear", "ignored", 3),
        ]);

        assert_eq!(terminal.commands().collect::<Vec<_>>(), vec!["missyou", "poem"]);
        assert_eq!(
            terminal.help_text(),
            "Available commands: help, missyou, poem, clear"
        );
        assert_eq!(
            terminal.respond("  POEM "),
            Reply::Output("Roses are red".to_string())
        );
        assert_eq!(terminal.respond("clear"), Reply::Clear);
        assert!(matches!(terminal.respond("hug"), Reply::Output(out) if out.starts_with("Command not found: hug")));
    }

    #[test]
    fn test_blank_input_ignored() {
        assert_eq!(Terminal::default().respond("   "), Reply::Ignored);
    }
}
