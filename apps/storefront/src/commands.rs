//! # Shell Commands
//!
//! One line of input becomes one [`Command`]. Parsing is pure; running a
//! command is `lib.rs`'s job.
//!
//! ```text
//! menu                     show the catalog
//! add <n|id>               add one unit by menu position or item id
//! remove <id>              drop a cart line
//! qty <id> <n>             set a quantity (0 or less removes)
//! clear                    empty the cart
//! cart                     show the cart and order form
//! name <text>              set customer name
//! email <text>             set customer email
//! submit                   place the order
//! history                  show past orders
//! view <catalog|cart|history>
//! help
//! quit
//! ```

use kabob_core::{ValidationError, View};
use thiserror::Error;

/// Help text printed by `help`.
pub const HELP: &str = "\
Commands:
  menu                          show the menu
  add <n|id>                    add one item by menu number or id
  remove <id>                   remove an item from the cart
  qty <id> <n>                  set quantity (0 removes)
  clear                         empty the cart
  cart                          show cart and order form
  name <text>                   set your name
  email <text>                  set your email
  submit                        place the order
  history                       show past orders
  view <catalog|cart|history>   switch screen
  help                          show this help
  quit                          exit";

/// How `add` names an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    /// 1-based position in the displayed menu.
    Position(usize),
    Id(String),
}

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Menu,
    Add(ItemRef),
    Remove(String),
    Quantity { item_id: String, quantity: i64 },
    Clear,
    Cart,
    Name(String),
    Email(String),
    Submit,
    History,
    View(View),
    Help,
    Quit,
}

impl Command {
    /// Whether running the command waits on the store API.
    ///
    /// `menu` only fetches while no catalog is loaded, but is counted here
    /// regardless.
    pub fn waits_on_network(&self) -> bool {
        matches!(
            self,
            Command::Menu
                | Command::Submit
                | Command::History
                | Command::View(View::Catalog | View::History)
        )
    }
}

/// Why a line is not a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Type a command, or 'help' for a list")]
    Empty,

    #[error("Unknown command '{0}'. Type 'help' for a list")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("'{0}' is not a whole number")]
    InvalidNumber(String),

    #[error(transparent)]
    InvalidView(#[from] ValidationError),
}

/// Parses one input line.
///
/// Keywords are case-insensitive. The text after `name` and `email` is
/// taken verbatim apart from surrounding whitespace.
pub fn parse(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };

    match keyword.to_lowercase().as_str() {
        "" => Err(ParseError::Empty),
        "menu" => Ok(Command::Menu),
        "cart" => Ok(Command::Cart),
        "clear" => Ok(Command::Clear),
        "submit" | "order" => Ok(Command::Submit),
        "history" => Ok(Command::History),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "add" => {
            let target = required(rest, "add", "a menu number or item id")?;
            Ok(Command::Add(match target.parse::<usize>() {
                Ok(position) => ItemRef::Position(position),
                Err(_) => ItemRef::Id(target.to_string()),
            }))
        }
        "remove" | "rm" => {
            let item_id = required(rest, "remove", "an item id")?;
            Ok(Command::Remove(item_id.to_string()))
        }
        "qty" => {
            let mut args = rest.split_whitespace();
            let item_id = args.next().ok_or(ParseError::MissingArgument {
                command: "qty",
                argument: "an item id and a quantity",
            })?;
            let raw = args.next().ok_or(ParseError::MissingArgument {
                command: "qty",
                argument: "a quantity",
            })?;
            let quantity = raw
                .parse::<i64>()
                .map_err(|_| ParseError::InvalidNumber(raw.to_string()))?;
            Ok(Command::Quantity {
                item_id: item_id.to_string(),
                quantity,
            })
        }
        "name" => Ok(Command::Name(required(rest, "name", "your name")?.to_string())),
        "email" => Ok(Command::Email(required(rest, "email", "your email")?.to_string())),
        "view" => {
            let view = required(rest, "view", "one of catalog, cart, history")?;
            Ok(Command::View(view.parse()?))
        }
        other => Err(ParseError::Unknown(other.to_string())),
    }
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, ParseError> {
    if rest.is_empty() {
        Err(ParseError::MissingArgument { command, argument })
    } else {
        Ok(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_keywords() {
        assert_eq!(parse("menu"), Ok(Command::Menu));
        assert_eq!(parse("  CART  "), Ok(Command::Cart));
        assert_eq!(parse("submit"), Ok(Command::Submit));
        assert_eq!(parse("quit"), Ok(Command::Quit));
        assert_eq!(parse("?"), Ok(Command::Help));
        assert_eq!(parse("clear"), Ok(Command::Clear));
    }

    #[test]
    fn test_waits_on_network() {
        assert!(parse("submit").unwrap().waits_on_network());
        assert!(parse("history").unwrap().waits_on_network());
        assert!(parse("view catalog").unwrap().waits_on_network());

        assert!(!parse("view cart").unwrap().waits_on_network());
        assert!(!parse("qty abc 2").unwrap().waits_on_network());
        assert!(!parse("clear").unwrap().waits_on_network());
    }

    #[test]
    fn test_add_by_position_or_id() {
        assert_eq!(parse("add 3"), Ok(Command::Add(ItemRef::Position(3))));
        assert_eq!(
            parse("add 550e8400-e29b-41d4-a716-446655440000"),
            Ok(Command::Add(ItemRef::Id(
                "550e8400-e29b-41d4-a716-446655440000".into()
            )))
        );
        assert!(matches!(parse("add"), Err(ParseError::MissingArgument { .. })));
    }

    #[test]
    fn test_quantity_accepts_negative() {
        assert_eq!(
            parse("qty abc -3"),
            Ok(Command::Quantity {
                item_id: "abc".into(),
                quantity: -3
            })
        );
        assert_eq!(parse("qty abc two"), Err(ParseError::InvalidNumber("two".into())));
        assert!(matches!(parse("qty abc"), Err(ParseError::MissingArgument { .. })));
    }

    #[test]
    fn test_name_keeps_inner_spaces() {
        assert_eq!(
            parse("name   Mary Jo O'Neil  "),
            Ok(Command::Name("Mary Jo O'Neil".into()))
        );
        assert_eq!(parse("email sam@example.com"), Ok(Command::Email("sam@example.com".into())));
    }

    #[test]
    fn test_view_parsing() {
        assert_eq!(parse("view history"), Ok(Command::View(View::History)));
        assert!(matches!(parse("view settings"), Err(ParseError::InvalidView(_))));
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse(""), Err(ParseError::Empty));
        assert_eq!(parse("dance"), Err(ParseError::Unknown("dance".into())));
    }
}
