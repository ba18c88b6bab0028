//! Line-oriented command shell over a [`Session`].
//!
//! Each input line is parsed into a [`Command`], executed against the
//! session, and rendered as output lines: tasks and stats as JSON, list
//! rows and acknowledgements as plain text. The shell only presents what
//! the core derives; it holds no task logic of its own.

use std::io::{self, BufRead, Write};

use serde::Serialize;
use taskdeck_model::{
    Choice, OwnerId, ParseError, SortKey, Task, TaskForm, TaskId, TaskPriority, TaskStatus,
    TaskUpdateForm,
};

use crate::session::{Session, SessionError};

const HELP: &[&str] = &[
    "login <user>                   sign in",
    "logout                         sign out and discard all tasks",
    "whoami                         show the signed-in user",
    "add <json>                     create a task from a JSON form",
    "edit <id> <json>               update fields of a task",
    "status <id> <status>           change the status of a task",
    "rm <id>                        delete a task",
    "show <id>                      print one task as JSON",
    "list                           list tasks with the current filter and sort",
    "filter status|priority <v>     filter by status or priority (`all` resets)",
    "filter search <text>           filter by title, description or tag",
    "clear-filter                   remove every filter",
    "sort date|priority|status      change the list order",
    "stats                          summary counts over all tasks",
    "quit                           leave the shell",
];

/// Errors produced while parsing a command line.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// The first word is not a known command.
    #[error("unknown command: {0} (try `help`)")]
    UnknownCommand(String),

    /// A required argument was not supplied.
    #[error("{command}: missing {argument}")]
    MissingArgument {
        /// Command being parsed.
        command: &'static str,
        /// Name of the missing argument.
        argument: &'static str,
    },

    /// The JSON payload could not be decoded.
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A status or priority token was not recognized.
    #[error(transparent)]
    InvalidValue(#[from] ParseError),

    /// `filter` was given something other than status, priority or search.
    #[error("unknown filter field: {0}")]
    UnknownFilter(String),
}

/// Which part of the filter a `filter` command changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    /// Status criterion.
    Status(Choice<TaskStatus>),
    /// Priority criterion.
    Priority(Choice<TaskPriority>),
    /// Search text; empty clears it.
    Search(String),
}

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login(OwnerId),
    Logout,
    Whoami,
    Add(TaskForm),
    Edit(TaskId, TaskUpdateForm),
    Status(TaskId, TaskStatus),
    Remove(TaskId),
    Show(TaskId),
    List,
    Filter(FilterChange),
    ClearFilter,
    Sort(SortKey),
    Stats,
    Help,
    Quit,
}

/// Result of executing one command.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Lines to print, in order.
    pub lines: Vec<String>,
    /// Whether the shell should stop.
    pub quit: bool,
}

impl Outcome {
    fn line(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
            quit: false,
        }
    }
}

/// Parses one input line. Blank lines and `#` comments yield `None`.
///
/// # Errors
///
/// Returns [`ShellError`] when the line is not a well-formed command.
pub fn parse_command(line: &str) -> Result<Option<Command>, ShellError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (word, rest) = split_word(line);

    let command = match word {
        "login" => Command::Login(OwnerId::new(require(rest, "login", "user")?)),
        "logout" => Command::Logout,
        "whoami" => Command::Whoami,
        "add" => Command::Add(serde_json::from_str(require(rest, "add", "json")?)?),
        "edit" => {
            let (id, json) = split_word(require(rest, "edit", "id")?);
            let form = serde_json::from_str(require(json, "edit", "json")?)?;
            Command::Edit(TaskId::from(id), form)
        }
        "status" => {
            let (id, status) = split_word(require(rest, "status", "id")?);
            let status = require(status, "status", "status")?.parse()?;
            Command::Status(TaskId::from(id), status)
        }
        "rm" => Command::Remove(TaskId::from(require(rest, "rm", "id")?)),
        "show" => Command::Show(TaskId::from(require(rest, "show", "id")?)),
        "list" | "ls" => Command::List,
        "filter" => Command::Filter(parse_filter(require(rest, "filter", "field")?)?),
        "clear-filter" => Command::ClearFilter,
        "sort" => Command::Sort(SortKey::from(require(rest, "sort", "key")?)),
        "stats" => Command::Stats,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ShellError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

fn parse_filter(args: &str) -> Result<FilterChange, ShellError> {
    let (field, value) = split_word(args);
    match field {
        "status" => Ok(FilterChange::Status(
            require(value, "filter", "status")?.parse()?,
        )),
        "priority" => Ok(FilterChange::Priority(
            require(value, "filter", "priority")?.parse()?,
        )),
        "search" => Ok(FilterChange::Search(value.to_string())),
        other => Err(ShellError::UnknownFilter(other.to_string())),
    }
}

fn split_word(s: &str) -> (&str, &str) {
    s.split_once(char::is_whitespace)
        .map_or((s, ""), |(head, tail)| (head, tail.trim()))
}

fn require<'a>(
    value: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, ShellError> {
    if value.is_empty() {
        Err(ShellError::MissingArgument { command, argument })
    } else {
        Ok(value)
    }
}

/// Executes `command` against `session`.
pub fn execute(session: &mut Session, command: Command) -> Outcome {
    match command {
        Command::Login(owner) => {
            let line = format!("signed in as {owner}");
            session.sign_in(owner);
            Outcome::line(line)
        }
        Command::Logout => {
            session.sign_out();
            Outcome::line("signed out")
        }
        Command::Whoami => Outcome::line(
            session
                .owner()
                .map_or_else(|| "not signed in".to_string(), ToString::to_string),
        ),
        Command::Add(form) => match session.create_task(&form) {
            Ok(task) => Outcome::line(json_line(&task)),
            Err(e) => session_error(&e),
        },
        Command::Edit(id, form) => match session.update_task(&id, &form) {
            Ok(Some(task)) => Outcome::line(json_line(&task)),
            Ok(None) => not_found(&id),
            Err(e) => session_error(&e),
        },
        Command::Status(id, status) => match session.set_status(&id, status) {
            Ok(Some(task)) => Outcome::line(json_line(&task)),
            Ok(None) => not_found(&id),
            Err(e) => session_error(&e),
        },
        Command::Remove(id) => match session.delete_task(&id) {
            Ok(true) => Outcome::line(format!("deleted {id}")),
            Ok(false) => not_found(&id),
            Err(e) => session_error(&e),
        },
        Command::Show(id) => session
            .find_task(&id)
            .map_or_else(|| not_found(&id), |task| Outcome::line(json_line(task))),
        Command::List => list(session),
        Command::Filter(change) => {
            session.update_filter(|filter| match change {
                FilterChange::Status(status) => filter.status = status,
                FilterChange::Priority(priority) => filter.priority = priority,
                FilterChange::Search(query) => filter.search_query = query,
            });
            Outcome::line(describe_filter(session))
        }
        Command::ClearFilter => {
            session.clear_filter();
            Outcome::line(describe_filter(session))
        }
        Command::Sort(key) => {
            session.set_sort(key);
            Outcome::line(format!("sort: {key}"))
        }
        Command::Stats => Outcome::line(json_line(&session.stats())),
        Command::Help => Outcome {
            lines: HELP.iter().map(ToString::to_string).collect(),
            quit: false,
        },
        Command::Quit => Outcome {
            lines: Vec::new(),
            quit: true,
        },
    }
}

fn list(session: &Session) -> Outcome {
    let visible = session.visible_tasks();
    let total = session.store().len();
    let mut lines: Vec<String> = visible.iter().map(|t| list_row(t)).collect();
    if visible.is_empty() {
        lines.push(if total == 0 {
            "no tasks yet".to_string()
        } else {
            "no tasks match the current filter".to_string()
        });
    }
    lines.push(format!("showing {} of {total} tasks", visible.len()));
    Outcome { lines, quit: false }
}

fn list_row(task: &Task) -> String {
    let mut row = format!(
        "{}  {:<11}  {:<8}  {}  {}",
        task.id, task.status, task.priority, task.due_date, task.title
    );
    if !task.tags.is_empty() {
        row.push_str("  #");
        row.push_str(&task.tags.join(" #"));
    }
    row
}

fn describe_filter(session: &Session) -> String {
    let filter = session.filter();
    format!(
        "filter: status={} priority={} search={:?}",
        filter.status, filter.priority, filter.search_query
    )
}

fn not_found(id: &TaskId) -> Outcome {
    Outcome::line(format!("task not found: {id}"))
}

fn session_error(err: &SessionError) -> Outcome {
    match err {
        SessionError::NotSignedIn => Outcome::line(format!("error: {err}")),
        SessionError::Invalid(errors) => Outcome {
            lines: errors.iter().map(|e| format!("error: {e}")).collect(),
            quit: false,
        },
    }
}

fn json_line<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("error: {e}"))
}

/// Reads commands from `input` until end of input or `quit`, writing
/// results to `output`.
///
/// # Errors
///
/// Returns any I/O error from reading or writing.
pub fn run<R: BufRead, W: Write>(session: &mut Session, input: R, mut output: W) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        let outcome = match parse_command(&line) {
            Ok(Some(command)) => {
                tracing::debug!(?command, "executing command");
                execute(session, command)
            }
            Ok(None) => continue,
            Err(e) => {
                tracing::debug!(error = %e, "rejected input line");
                Outcome::line(format!("error: {e}"))
            }
        };
        for line in &outcome.lines {
            writeln!(output, "{line}")?;
        }
        output.flush()?;
        if outcome.quit {
            break;
        }
    }
    Ok(())
}
