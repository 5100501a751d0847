use crate::error::{Result, TaskError};
use crate::model::task::Status;

pub const ADD_USAGE: &str = "task-tracker add 'task description'";
pub const UPDATE_USAGE: &str = "task-tracker update <id> 'new description'";
pub const DELETE_USAGE: &str = "task-tracker delete <id>";
pub const MARK_IN_PROGRESS_USAGE: &str = "task-tracker mark-in-progress <id>";
pub const MARK_DONE_USAGE: &str = "task-tracker mark-done <id>";
pub const LIST_USAGE: &str = "task-tracker list [todo|in-progress|done]";

/// Every command the tool understands, with its arguments already typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { description: String },
    Update { id: u32, description: String },
    Delete { id: u32 },
    Mark { id: u32, status: Status },
    List { filter: Option<Status> },
    Help,
    Version,
}

/// Usage lines shown by `help`, in display order.
pub const USAGES: [&str; 9] = [
    ADD_USAGE,
    UPDATE_USAGE,
    DELETE_USAGE,
    MARK_IN_PROGRESS_USAGE,
    MARK_DONE_USAGE,
    "task-tracker list",
    "task-tracker list todo",
    "task-tracker list in-progress",
    "task-tracker list done",
];

/// Routes a full argument vector. `argv[0]` is the program name.
pub fn route(argv: &[String]) -> Result<Command> {
    match argv.split_first() {
        Some((_, rest)) => Command::parse(rest),
        None => Ok(Command::Help),
    }
}

impl Command {
    /// Exact match on the first token; only `list` looks at a second one.
    /// Unknown or missing first tokens fall back to `Help`.
    pub fn parse(tokens: &[String]) -> Result<Command> {
        let Some((head, args)) = tokens.split_first() else {
            return Ok(Command::Help);
        };

        match head.as_str() {
            "add" => {
                let [description] = expect_args::<1>(args, ADD_USAGE)?;
                Ok(Command::Add {
                    description: non_empty(description, ADD_USAGE)?,
                })
            }
            "update" => {
                let [id, description] = expect_args::<2>(args, UPDATE_USAGE)?;
                Ok(Command::Update {
                    id: parse_id(id, UPDATE_USAGE)?,
                    description: non_empty(description, UPDATE_USAGE)?,
                })
            }
            "delete" => {
                let [id] = expect_args::<1>(args, DELETE_USAGE)?;
                Ok(Command::Delete {
                    id: parse_id(id, DELETE_USAGE)?,
                })
            }
            "mark-in-progress" => mark(args, Status::InProgress, MARK_IN_PROGRESS_USAGE),
            "mark-done" => mark(args, Status::Done, MARK_DONE_USAGE),
            "list" => match args {
                [] => Ok(Command::List { filter: None }),
                [filter] => {
                    let status = filter
                        .parse::<Status>()
                        .map_err(|e| TaskError::argument(e, LIST_USAGE))?;
                    Ok(Command::List {
                        filter: Some(status),
                    })
                }
                _ => Err(wrong_count(args.len(), "0 or 1", LIST_USAGE)),
            },
            "-V" | "--version" => Ok(Command::Version),
            _ => Ok(Command::Help),
        }
    }
}

fn mark(args: &[String], status: Status, usage: &'static str) -> Result<Command> {
    let [id] = expect_args::<1>(args, usage)?;
    Ok(Command::Mark {
        id: parse_id(id, usage)?,
        status,
    })
}

fn expect_args<'a, const N: usize>(args: &'a [String], usage: &'static str) -> Result<[&'a String; N]> {
    let refs: Vec<&String> = args.iter().collect();
    refs.try_into()
        .map_err(|_| wrong_count(args.len(), &N.to_string(), usage))
}

fn wrong_count(got: usize, expected: &str, usage: &'static str) -> TaskError {
    TaskError::argument(
        format!("Incorrect command: expected {} argument(s), got {}", expected, got),
        usage,
    )
}

fn parse_id(raw: &str, usage: &'static str) -> Result<u32> {
    match raw.parse::<u32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(TaskError::argument(
            format!("Invalid task ID '{}': must be a positive number", raw),
            usage,
        )),
    }
}

fn non_empty(raw: &str, usage: &'static str) -> Result<String> {
    if raw.trim().is_empty() {
        return Err(TaskError::argument("Task description cannot be empty", usage));
    }
    Ok(raw.to_string())
}
