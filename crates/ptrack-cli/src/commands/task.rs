//! Task commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use ptrack_core::task::{self, model::TaskChanges};
use ptrack_core::{project, user};

use super::Context;
use crate::output;

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Create a task in a project owned by --user
    New(NewTaskArgs),

    /// List tasks visible to --user
    List(ListTaskArgs),

    /// Set a task's progress and completion flag
    Progress(ProgressArgs),

    /// Rename, describe or reassign a task
    Update(UpdateTaskArgs),

    /// Delete a task
    Delete(TaskRef),
}

#[derive(Args)]
pub struct NewTaskArgs {
    /// Project ID
    pub project_id: String,

    /// Task name
    pub name: String,

    /// Username of the assignee
    #[arg(short, long)]
    pub assignee: String,

    /// Task description
    #[arg(short, long, default_value = "")]
    pub description: String,
}

#[derive(Args)]
pub struct ListTaskArgs {
    /// Only tasks of this project
    #[arg(short, long)]
    pub project: Option<String>,
}

#[derive(Args)]
pub struct ProgressArgs {
    /// Task ID
    pub task_id: String,

    /// Progress percentage (0-100)
    #[arg(allow_negative_numbers = true)]
    pub progress: i64,

    /// Mark the task completed
    #[arg(long, conflicts_with = "not_done")]
    pub done: bool,

    /// Mark the task not completed
    #[arg(long)]
    pub not_done: bool,
}

impl ProgressArgs {
    /// `None` when neither flag is given, keeping the stored flag.
    fn completed(&self) -> Option<bool> {
        match (self.done, self.not_done) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Args)]
pub struct UpdateTaskArgs {
    /// Task ID
    pub task_id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(short, long)]
    pub description: Option<String>,

    /// Username of the new assignee
    #[arg(short, long)]
    pub assignee: Option<String>,
}

#[derive(Args)]
pub struct TaskRef {
    /// Task ID
    pub task_id: String,
}

pub fn execute(cmd: TaskCommands, ctx: &Context) -> Result<()> {
    let actor = ctx.actor()?;

    match cmd {
        TaskCommands::New(args) => {
            let assignee = user::find_user(&ctx.pool, &args.assignee)?;
            let created = task::create_task(
                &ctx.pool,
                &actor,
                &args.project_id,
                &args.name,
                &args.description,
                &assignee.id,
            )?;
            tracing::info!(user = %actor.username, task = %created.name, "created task");

            println!(
                "{} Created task: {} ({}) assigned to {}",
                "✓".green().bold(),
                created.name.cyan(),
                created.id.dimmed(),
                assignee.username
            );
        }

        TaskCommands::List(args) => {
            let tasks = task::list_tasks(&ctx.pool, &actor, args.project.as_deref())?;
            let users = user::list_users(&ctx.pool)?;
            output::print_tasks_table(&tasks, &users);
        }

        TaskCommands::Progress(args) => {
            let updated = task::update_task_progress(
                &ctx.pool,
                &actor,
                &args.task_id,
                args.progress,
                args.completed(),
            )?;
            tracing::info!(user = %actor.username, task = %updated.name, progress = updated.progress, "updated task progress");

            println!(
                "{} {} is at {}%{}",
                "✓".green().bold(),
                updated.name.cyan(),
                updated.progress,
                if updated.completed { " (completed)" } else { "" }
            );
            // The assignee may not be able to view the project.
            if let Ok(parent) = project::get_project(&ctx.pool, &actor, &updated.project_id) {
                println!(
                    "  Project {} {}",
                    parent.name.bold(),
                    output::progress_bar(parent.progress)
                );
            }
        }

        TaskCommands::Update(args) => {
            let assigned_to = match args.assignee {
                Some(name) => Some(user::find_user(&ctx.pool, &name)?.id),
                None => None,
            };
            let updated = task::update_task(
                &ctx.pool,
                &actor,
                &args.task_id,
                &TaskChanges {
                    name: args.name,
                    description: args.description,
                    assigned_to,
                    ..Default::default()
                },
            )?;
            tracing::info!(user = %actor.username, task = %updated.name, "updated task");
            println!("{} Updated task {}", "✓".green().bold(), updated.name.cyan());
        }

        TaskCommands::Delete(args) => {
            let deleted = task::delete_task(&ctx.pool, &actor, &args.task_id)?;
            tracing::info!(user = %actor.username, task = %deleted.name, "deleted task");
            println!("{} Deleted task {}", "✓".green().bold(), deleted.name.cyan());
        }
    }

    Ok(())
}
