//! Line-oriented command console.
//!
//! The terminal stand-in for the dashboard's widgets: each stdin line is
//! one interaction.

use crate::engine::Event;
use crate::render::CARD_DAYS;

pub const HELP: &str = "\
commands:
  search <text>            type into the search box (suggestions after a pause)
  go [text]                confirm the search (Enter)
  pick <n>                 choose suggestion n
  day <n>                  click forecast card n (1-5)
  province <name>          choose a province; switches to its first city
  city <province> <city>   choose a city
  refresh                  fetch now
  help                     show this text
  quit                     exit";

#[derive(Debug)]
pub enum Command {
    Dispatch(Event),
    /// Confirm the search; `None` reuses the current search box text.
    Submit(Option<String>),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("`{0}` is not a valid number")]
    BadNumber(String),
}

fn number(arg: &str) -> Result<usize, CommandError> {
    arg.parse().map_err(|_| CommandError::BadNumber(arg.to_string()))
}

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb {
        "search" | "s" => Command::Dispatch(Event::SearchInput(rest.to_string())),
        "go" | "enter" => Command::Submit((!rest.is_empty()).then(|| rest.to_string())),
        "pick" | "p" => match number(rest)? {
            0 => return Err(CommandError::BadNumber(rest.to_string())),
            n => Command::Dispatch(Event::PickSuggestion(n - 1)),
        },
        "day" | "d" if rest.is_empty() => return Err(CommandError::MissingArgument("day")),
        "day" | "d" => match number(rest)? {
            n if CARD_DAYS.contains(&n) => Command::Dispatch(Event::CardClicked(n)),
            _ => return Err(CommandError::BadNumber(rest.to_string())),
        },
        "province" if rest.is_empty() => return Err(CommandError::MissingArgument("province")),
        "province" => Command::Dispatch(Event::SelectProvince(rest.to_string())),
        "city" => {
            let Some((province, city)) = rest.split_once(char::is_whitespace) else {
                return Err(CommandError::MissingArgument("city"));
            };
            Command::Dispatch(Event::SelectCity {
                province: province.to_string(),
                city: city.trim().to_string(),
            })
        }
        "refresh" | "r" => Command::Dispatch(Event::Refresh),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(command)
}
