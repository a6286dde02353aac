use std::{error::Error, fmt, num::ParseIntError};

use wayfarer_core::{Direction, InputIntent};

/// Delimiter between a verb and its argument, as in `use:0`.
const ARGUMENT_DELIMITER: char = ':';

/// Single step of a scripted or interactive session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    /// Forwards an input intent to the engine.
    Intent(InputIntent),
    /// Uses the inventory item in the provided slot.
    Use(usize),
    /// Prints the current frame without changing anything.
    Look,
    /// Ends an interactive session.
    Quit,
}

/// Errors that can occur while parsing action scripts.
#[derive(Debug)]
pub(crate) enum ScriptError {
    /// The token does not name a known action.
    UnknownAction(String),
    /// The `use` action was given without a slot.
    MissingSlot,
    /// The slot argument is not a non-negative integer.
    InvalidSlot(String, ParseIntError),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAction(token) => write!(f, "unknown action '{token}'"),
            Self::MissingSlot => write!(f, "'use' requires an inventory slot, as in 'use:0'"),
            Self::InvalidSlot(slot, error) => {
                write!(f, "could not parse inventory slot '{slot}': {error}")
            }
        }
    }
}

impl Error for ScriptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidSlot(_, error) => Some(error),
            _ => None,
        }
    }
}

/// Parses whitespace or comma separated actions.
pub(crate) fn parse(script: &str) -> Result<Vec<Action>, ScriptError> {
    script
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(parse_action)
        .collect()
}

fn parse_action(token: &str) -> Result<Action, ScriptError> {
    let lowered = token.to_ascii_lowercase();
    let (verb, argument) = match lowered.split_once(ARGUMENT_DELIMITER) {
        Some((verb, argument)) => (verb, Some(argument)),
        None => (lowered.as_str(), None),
    };

    let action = match verb {
        "n" | "north" | "up" => Action::Intent(InputIntent::Move(Direction::North)),
        "e" | "east" | "right" => Action::Intent(InputIntent::Move(Direction::East)),
        "s" | "south" | "down" => Action::Intent(InputIntent::Move(Direction::South)),
        "w" | "west" | "left" => Action::Intent(InputIntent::Move(Direction::West)),
        "i" | "interact" | "take" => Action::Intent(InputIntent::Interact),
        "look" | "l" => Action::Look,
        "quit" | "q" => Action::Quit,
        "use" | "u" => {
            let slot = argument.ok_or(ScriptError::MissingSlot)?;
            let slot = slot
                .parse::<usize>()
                .map_err(|error| ScriptError::InvalidSlot(slot.to_owned(), error))?;
            Action::Use(slot)
        }
        _ => return Err(ScriptError::UnknownAction(token.to_owned())),
    };
    Ok(action)
}
