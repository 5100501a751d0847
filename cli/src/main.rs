mod render;

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use task_tracker_core::config::DEFAULT_FILE_NAME;
use task_tracker_core::{
    Command, FileTaskRepository, IdPolicy, MissingTaskPolicy, Outcome, StoreConfig, TaskError,
    TaskService,
};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "task-tracker")]
#[command(about = "Track short tasks in a local JSON file", long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// Task file to read and write
    #[arg(long, value_name = "PATH", default_value = DEFAULT_FILE_NAME)]
    file: PathBuf,

    /// How new task ids are chosen (next-free or size-based)
    #[arg(long, value_name = "POLICY", default_value = "next-free")]
    id_policy: IdPolicy,

    /// Fail instead of silently succeeding when a task id does not exist
    #[arg(long)]
    strict: bool,

    /// Skip the advisory lock around each read-modify-write cycle
    #[arg(long)]
    no_lock: bool,

    /// More diagnostics on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Print the version and exit
    #[arg(short = 'V', long)]
    version: bool,

    /// Command and its arguments (e.g. add "Buy groceries")
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

impl Cli {
    fn store_config(&self) -> StoreConfig {
        StoreConfig {
            path: self.file.clone(),
            id_policy: self.id_policy,
            missing_task: if self.strict {
                MissingTaskPolicy::Reject
            } else {
                MissingTaskPolicy::Ignore
            },
            lock: !self.no_lock,
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let command = if cli.version {
        Command::Version
    } else {
        Command::parse(&cli.args)?
    };
    tracing::debug!(?command, "routed command");

    let config = cli.store_config();
    let repo = FileTaskRepository::from_config(&config);
    let service = TaskService::with_config(repo, &config);
    let outcome = service.execute(command)?;

    let mut stdout = io::stdout().lock();
    let color = stdout.is_terminal();
    let text = match outcome {
        Outcome::Created { id } => format!("Task added successfully (ID: {})", id),
        Outcome::Updated { id } => format!("Task {} updated successfully", id),
        Outcome::Marked { id, status } => {
            format!("Task with id of {} has been marked as {}", id, status)
        }
        Outcome::Deleted { id } => format!("Task {} deleted", id),
        Outcome::Listed { filter, tasks } => render::task_list(filter, &tasks, color),
        Outcome::Help => render::help(VERSION),
        Outcome::Version => VERSION.to_string(),
    };
    writeln!(stdout, "{}", text.trim_end()).context("failed to write to stdout")?;
    Ok(())
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<TaskError>() {
        // An empty listing is an answer, not a fault.
        Some(empty @ TaskError::EmptyResult(_)) => println!("{}", empty),
        Some(task_err) => {
            eprintln!("Error: {}", task_err);
            if let Some(usage) = task_err.usage() {
                eprintln!("Usage: {}", usage);
            }
        }
        None => eprintln!("Error: {:#}", err),
    }
}
