use roster::RecordId;
use std::{fmt, str::FromStr};

/// One line of user input.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Update(RecordId),
    Delete(RecordId),
    Reload,
    List,
    Help,
    Quit
}

pub const HELP: &str = "\
commands:
  u <id>   rename a user
  d <id>   delete a user
  r        reload the list
  l        show the list
  h        show this help
  q        quit";

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    MissingId(&'static str),
    Unknown(String)
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "type a command, or `h` for help"),
            ParseError::MissingId(command) => write!(f, "`{}` needs a user id", command),
            ParseError::Unknown(word) => write!(f, "unknown command `{}`, try `h`", word)
        }
    }
}

impl std::error::Error for ParseError {}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let word = words.next().ok_or(ParseError::Empty)?;
        let id = words.next().map(RecordId::new);

        match (word, id) {
            ("u" | "update", Some(id)) => Ok(Command::Update(id)),
            ("u" | "update", None) => Err(ParseError::MissingId("update")),
            ("d" | "delete", Some(id)) => Ok(Command::Delete(id)),
            ("d" | "delete", None) => Err(ParseError::MissingId("delete")),
            ("r" | "reload", _) => Ok(Command::Reload),
            ("l" | "list", _) => Ok(Command::List),
            ("h" | "help" | "?", _) => Ok(Command::Help),
            ("q" | "quit" | "exit", _) => Ok(Command::Quit),
            (other, _) => Err(ParseError::Unknown(other.to_string()))
        }
    }
}
