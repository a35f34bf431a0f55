use std::{fmt::Display, str::FromStr};

use anyhow::{anyhow, bail};

pub const HELP: &str = "Commands: start, pause, reset, select <project>, add <project>, chart, status, quit";

/// A single user action in an interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    Start,
    Pause,
    Reset,
    Select(String),
    Add(String),
    Chart,
    Status,
    Quit,
}

impl FromStr for UserCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (word, rest) = s.split_once(char::is_whitespace).unwrap_or((s, ""));
        let rest = rest.trim();

        let command = match word.to_lowercase().as_str() {
            "start" | "s" => UserCommand::Start,
            "pause" | "p" => UserCommand::Pause,
            "reset" | "r" => UserCommand::Reset,
            "chart" | "c" => UserCommand::Chart,
            "status" => UserCommand::Status,
            "quit" | "q" | "exit" => UserCommand::Quit,
            // Project names keep their case and inner spaces.
            "select" | "add" if rest.is_empty() => bail!("{word} needs a project name"),
            "select" => UserCommand::Select(rest.to_owned()),
            "add" => UserCommand::Add(rest.to_owned()),
            "" => return Err(anyhow!("Empty command. {HELP}")),
            other => return Err(anyhow!("Unknown command {other:?}. {HELP}")),
        };

        if !rest.is_empty() && !matches!(command, UserCommand::Select(_) | UserCommand::Add(_)) {
            bail!("{word} doesn't take arguments");
        }
        Ok(command)
    }
}

impl Display for UserCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserCommand::Start => write!(f, "start"),
            UserCommand::Pause => write!(f, "pause"),
            UserCommand::Reset => write!(f, "reset"),
            UserCommand::Select(name) => write!(f, "select {name}"),
            UserCommand::Add(name) => write!(f, "add {name}"),
            UserCommand::Chart => write!(f, "chart"),
            UserCommand::Status => write!(f, "status"),
            UserCommand::Quit => write!(f, "quit"),
        }
    }
}
