//! Line-oriented user intents and how they drive the controller.

use std::time::Instant;

use dashboard_core::{DashboardController, ModalMode};
use shared::domain::UserId;
use thiserror::Error;

pub const HELP: &str = "\
commands:
  search <text>   filter by name        clear          drop the filter
  next | prev     change page           page <n>       jump to page n
  add             open the add form     edit <id>      edit a listed user
  name <text>     set form name         email <text>   set form email
  submit          save the form         cancel         close the form
  delete <id>     remove a user         refresh        refetch the list
  help            show this text        quit           exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Search(String),
    ClearSearch,
    NextPage,
    PrevPage,
    GoToPage(usize),
    Add,
    Edit(UserId),
    Name(String),
    Email(String),
    Submit,
    Cancel,
    Delete(UserId),
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntentError {
    #[error("unknown command '{0}'; type 'help' for a list")]
    Unknown(String),
    #[error("'{command}' needs a {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("'{value}' is not a valid {expected}")]
    Invalid {
        value: String,
        expected: &'static str,
    },
}

/// Parses one input line; blank lines yield `None`.
pub fn parse_intent(line: &str) -> Result<Option<Intent>, IntentError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let intent = match command.to_ascii_lowercase().as_str() {
        "search" | "/" if rest.is_empty() => Intent::ClearSearch,
        "search" | "/" => Intent::Search(rest.to_string()),
        "clear" => Intent::ClearSearch,
        "next" | "n" => Intent::NextPage,
        "prev" | "p" => Intent::PrevPage,
        "page" => Intent::GoToPage(number(rest, "page", "page number")?),
        "add" => Intent::Add,
        "edit" => Intent::Edit(user_id(rest, "edit")?),
        "name" => Intent::Name(rest.to_string()),
        "email" => Intent::Email(rest.to_string()),
        "submit" | "save" => Intent::Submit,
        "cancel" => Intent::Cancel,
        "delete" | "rm" => Intent::Delete(user_id(rest, "delete")?),
        "refresh" => Intent::Refresh,
        "help" | "?" => Intent::Help,
        "quit" | "exit" | "q" => Intent::Quit,
        other => return Err(IntentError::Unknown(other.to_string())),
    };
    Ok(Some(intent))
}

fn number(rest: &str, command: &'static str, expected: &'static str) -> Result<usize, IntentError> {
    if rest.is_empty() {
        return Err(IntentError::MissingArgument { command, expected });
    }
    rest.parse().map_err(|_| IntentError::Invalid {
        value: rest.to_string(),
        expected,
    })
}

fn user_id(rest: &str, command: &'static str) -> Result<UserId, IntentError> {
    if rest.is_empty() {
        return Err(IntentError::MissingArgument {
            command,
            expected: "user id",
        });
    }
    rest.parse().map(UserId).map_err(|_| IntentError::Invalid {
        value: rest.to_string(),
        expected: "user id",
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    ShowHelp,
    Notice(String),
    Quit,
}

pub fn apply_intent(controller: &mut DashboardController, intent: Intent, now: Instant) -> Outcome {
    match intent {
        Intent::Search(text) => controller.set_search(text),
        Intent::ClearSearch => controller.set_search(""),
        Intent::NextPage => controller.next_page(),
        Intent::PrevPage => controller.prev_page(),
        Intent::GoToPage(page) => controller.go_to_page(page),
        Intent::Add => controller.open_modal(ModalMode::Add, None),
        Intent::Edit(id) => {
            if !controller.open_edit_for(id) {
                return Outcome::Notice(format!("no listed user with id {id}"));
            }
        }
        Intent::Name(_) | Intent::Email(_) if !controller.state().modal.open => {
            return Outcome::Notice("open the form with 'add' or 'edit <id>' first".to_string());
        }
        Intent::Name(name) => controller.set_name(name),
        Intent::Email(email) => controller.set_email(email),
        Intent::Submit => {
            if !controller.state().modal.open {
                return Outcome::Notice("nothing to submit".to_string());
            }
            controller.submit(now);
        }
        Intent::Cancel => controller.close_modal(),
        Intent::Delete(id) => controller.remove(id, now),
        Intent::Refresh => controller.refresh(),
        Intent::Help => return Outcome::ShowHelp,
        Intent::Quit => return Outcome::Quit,
    }
    Outcome::Continue
}

#[cfg(test)]
#[path = "tests/intent_tests.rs"]
mod tests;
