//! Lines typed into the interactive driver.
//!
//! A plain line is the new value of the input box. Lines starting with `:`
//! are commands:
//!
//! | command                        | effect                                   |
//! |--------------------------------|------------------------------------------|
//! | `:more`                        | load the next page                       |
//! | `:scroll PX`                   | scroll the list to `PX`                  |
//! | `:select SN`                   | select the row with serial `SN`          |
//! | `:reset PATH[,PATH..]`         | reset state paths, failing on bad paths  |
//! | `:reset! PATH[,PATH..]`        | reset state paths, skipping bad paths    |
//! | `:click inside\|outside\|input` | pointer interaction                      |
//! | `:state`                       | print the store                          |
//! | `:quit`                        | exit                                     |

use the_typeahead_lib::{
  dismiss::PointerTarget,
  reset::{
    ResetPathError,
    StatePath,
  },
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
  Input(String),
  More,
  Scroll(u64),
  Select(u64),
  Reset(Vec<StatePath>),
  ResetLenient(String),
  Click(PointerTarget),
  State,
  Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
  #[error("unknown command `:{0}`")]
  Unknown(String),
  #[error("`:{command}` expects {expected}")]
  BadArgument {
    command:  &'static str,
    expected: &'static str,
  },
  #[error(transparent)]
  ResetPath(#[from] ResetPathError),
}

impl Command {
  pub fn parse(line: &str) -> Result<Self, CommandError> {
    let Some(command) = line.strip_prefix(':') else {
      return Ok(Self::Input(line.to_owned()));
    };
    let (name, arg) = match command.trim().split_once(char::is_whitespace) {
      Some((name, arg)) => (name, arg.trim()),
      None => (command.trim(), ""),
    };

    let bad = |command, expected| CommandError::BadArgument { command, expected };
    match name {
      "more" => Ok(Self::More),
      "scroll" => {
        arg
          .parse()
          .map(Self::Scroll)
          .map_err(|_| bad("scroll", "a pixel offset"))
      },
      "select" => {
        arg
          .parse()
          .map(Self::Select)
          .map_err(|_| bad("select", "a serial number"))
      },
      "reset" => Ok(Self::Reset(StatePath::parse_list(arg)?)),
      "reset!" => Ok(Self::ResetLenient(arg.to_owned())),
      "click" => {
        let target = match arg {
          "inside" => PointerTarget::inside(),
          "outside" => PointerTarget::outside(),
          "input" => PointerTarget::input(),
          _ => return Err(bad("click", "inside, outside or input")),
        };
        Ok(Self::Click(target))
      },
      "state" => Ok(Self::State),
      "quit" | "q" => Ok(Self::Quit),
      other => Err(CommandError::Unknown(other.to_owned())),
    }
  }
}
