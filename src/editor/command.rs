use std::{io, num::ParseIntError, path::PathBuf};

use thiserror::Error;

use crate::{rope::RopeError, util::unescape};

/// One line of an edit script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insert { offset: usize, text: String },
    Append(String),
    Delete { offset: usize, count: usize },
    Print,
    Slice { start: usize, end: usize },
    CharAt(usize),
    Length,
    Edit(PathBuf),
    Write(Option<PathBuf>),
    Quit,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("missing argument <{argument}> for '{command}'")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("invalid number '{value}'")]
    InvalidNumber {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("no filename specified")]
    NoFilename,

    #[error(transparent)]
    Rope(#[from] RopeError),

    #[error("failed to access '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Command {
    /// Parses a script line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let line = line.trim_start();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (name, rest) = split_word(line);
        let command = match name {
            "i" | "insert" => {
                let (offset, text) = split_word(rest);
                Command::Insert {
                    offset: number("i", "offset", offset)?,
                    text: unescape(text),
                }
            }
            "a" | "append" => Command::Append(unescape(rest)),
            "d" | "delete" => {
                let (offset, rest) = split_word(rest);
                let (count, _) = split_word(rest);
                Command::Delete {
                    offset: number("d", "offset", offset)?,
                    count: number("d", "count", count)?,
                }
            }
            "p" | "print" => Command::Print,
            "s" | "slice" => {
                let (start, rest) = split_word(rest);
                let (end, _) = split_word(rest);
                Command::Slice {
                    start: number("s", "start", start)?,
                    end: number("s", "end", end)?,
                }
            }
            "c" | "char" => {
                let (offset, _) = split_word(rest);
                Command::CharAt(number("c", "offset", offset)?)
            }
            "l" | "len" => Command::Length,
            // Paths run to the end of the line and may contain spaces.
            "e" | "edit" => match rest.trim() {
                "" => {
                    return Err(CommandError::MissingArgument {
                        command: "e",
                        argument: "path",
                    })
                }
                path => Command::Edit(PathBuf::from(path)),
            },
            "w" | "write" => match rest.trim() {
                "" => Command::Write(None),
                path => Command::Write(Some(PathBuf::from(path))),
            },
            "q" | "quit" => Command::Quit,
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };

        Ok(Some(command))
    }
}

/// Splits off the first word, consuming exactly one separator after it.
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();

    match input.char_indices().find(|(_, c)| c.is_whitespace()) {
        Some((index, c)) => (&input[..index], &input[index + c.len_utf8()..]),
        None => (input, ""),
    }
}

fn number(
    command: &'static str,
    argument: &'static str,
    value: &str,
) -> Result<usize, CommandError> {
    if value.is_empty() {
        return Err(CommandError::MissingArgument { command, argument });
    }

    value.parse().map_err(|source| CommandError::InvalidNumber {
        value: value.to_string(),
        source,
    })
}
