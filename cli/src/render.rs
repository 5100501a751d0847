use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use task_tracker_core::{format_timestamp, Status, Task, USAGES};

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Status")]
    status: Status,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            description: task.description.clone(),
            status: task.status,
            created: format_timestamp(&task.created_at),
            updated: format_timestamp(&task.updated_at),
        }
    }
}

pub fn task_list(filter: Option<Status>, tasks: &[Task], color: bool) -> String {
    let heading = match filter {
        None => "List of tasks".to_string(),
        Some(status) => format!("List of all {} tasks", status),
    };

    let mut table = Table::new(tasks.iter().map(TaskRow::from));
    table.with(Style::modern());
    if color {
        table.with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    }
    format!("{}\n{}", heading, table)
}

pub fn help(version: &str) -> String {
    let mut out = format!("List of Commands\n{}\n", version);
    for (i, usage) in USAGES.iter().enumerate() {
        out.push_str(&format!("{}: {}\n", i, usage));
    }
    out
}
