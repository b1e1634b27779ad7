use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::{Result, eyre};
use std::path::PathBuf;
use tasktrack::{FileSlot, FilterMode, Priority, Task, TaskStore};

#[derive(Parser)]
#[command(name = "tasktrack")]
#[command(about = "Task Tracker - organize your work and life")]
#[command(version)]
struct Cli {
    /// Path to the task state file (default: platform data directory)
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task text
        text: String,

        /// Task priority
        #[arg(short, long, default_value = "medium")]
        priority: Priority,

        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<NaiveDate>,
    },

    /// List tasks, sorted for display
    List {
        /// Which completion states to show
        #[arg(short, long, default_value = "all")]
        filter: FilterMode,

        /// Case-insensitive substring to search for
        #[arg(long, default_value = "")]
        search: String,
    },

    /// Toggle a task's completed flag
    Done {
        /// Task id
        id: i64,
    },

    /// Replace a task's text, priority, and due date
    Edit {
        /// Task id
        id: i64,

        /// Replacement text
        text: String,

        /// Replacement priority
        #[arg(short, long, default_value = "medium")]
        priority: Priority,

        /// Replacement due date (YYYY-MM-DD); omitted clears the due date
        #[arg(short, long)]
        due: Option<NaiveDate>,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: i64,
    },
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let state_path = match cli.store_path {
        Some(path) => path,
        None => default_state_path()?,
    };

    let mut store = TaskStore::open(Box::new(FileSlot::new(state_path)))?;

    match cli.command {
        Commands::Add { text, priority, due } => match store.add(&text, priority, due)? {
            Some(id) => println!("Added task {}", id),
            None => println!("{}", "Task text cannot be empty".yellow()),
        },
        Commands::List { filter, search } => {
            let mut tasks = store.query(filter, &search);
            TaskStore::sort_for_display(&mut tasks);

            if tasks.is_empty() {
                println!("No tasks found");
            } else {
                let today = Local::now().date_naive();
                for task in &tasks {
                    println!("{}", render_task(task, today));
                }
            }

            let stats = store.stats(filter, &search);
            if stats.total > 0 {
                println!(
                    "\n{} tasks remaining | Total tasks: {} | Completed: {}",
                    stats.remaining, stats.total, stats.completed
                );
            }
        }
        Commands::Done { id } => {
            if store.toggle_complete(id)? {
                println!("Toggled task {}", id);
            } else {
                println!("No task with id {}", id);
            }
        }
        Commands::Edit { id, text, priority, due } => {
            if store.edit(id, &text, priority, due)? {
                println!("Updated task {}", id);
            } else {
                println!("No task with id {}", id);
            }
        }
        Commands::Rm { id } => {
            if store.delete(id)? {
                println!("Deleted task {}", id);
            } else {
                println!("No task with id {}", id);
            }
        }
    }

    Ok(())
}

fn default_state_path() -> Result<PathBuf> {
    let base = dirs::data_local_dir().ok_or_else(|| eyre!("Could not determine local data directory"))?;
    Ok(base.join("tasktrack").join("tasks.json"))
}

fn render_task(task: &Task, today: NaiveDate) -> String {
    let checkbox = if task.completed { "[x]" } else { "[ ]" };

    let text = if task.completed {
        task.text.strikethrough().dimmed().to_string()
    } else {
        task.text.normal().to_string()
    };

    let priority = match task.priority {
        Priority::High => "high".red(),
        Priority::Medium => "medium".yellow(),
        Priority::Low => "low".green(),
    };

    let due = match task.due_date {
        Some(date) => {
            let formatted = date.format("%b %-d, %Y").to_string();
            if task.is_overdue(today) {
                format!("  due {} {}", formatted, "(overdue)".red())
            } else {
                format!("  due {}", formatted)
            }
        }
        None => String::new(),
    };

    format!("{} {:>13}  {} [{}]{}", checkbox, task.id, text, priority, due)
}
