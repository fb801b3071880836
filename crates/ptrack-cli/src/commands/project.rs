//! Project commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use ptrack_core::project::{self, model::ProjectChanges};
use ptrack_core::{task, user};

use super::Context;
use crate::output;

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// Create a new project owned by --user
    New(NewProjectArgs),

    /// List projects visible to --user
    List,

    /// Show a project with its tasks
    Show(ProjectRef),

    /// Rename a project or change its description
    Edit(EditProjectArgs),

    /// Add a member by username
    AddMember(MemberArgs),

    /// Remove a member by username
    RemoveMember(MemberArgs),

    /// Delete a project and its tasks
    Delete(ProjectRef),
}

#[derive(Args)]
pub struct NewProjectArgs {
    /// Project name
    pub name: String,

    /// Project description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Member usernames
    #[arg(short, long = "member")]
    pub members: Vec<String>,
}

#[derive(Args)]
pub struct ProjectRef {
    /// Project ID
    pub project_id: String,
}

#[derive(Args)]
pub struct EditProjectArgs {
    /// Project ID
    pub project_id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(short, long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct MemberArgs {
    /// Project ID
    pub project_id: String,

    /// Username of the member
    pub username: String,
}

pub fn execute(cmd: ProjectCommands, ctx: &Context) -> Result<()> {
    let actor = ctx.actor()?;

    match cmd {
        ProjectCommands::New(args) => {
            let members = args
                .members
                .iter()
                .map(|name| user::find_user(&ctx.pool, name).map(|u| u.id))
                .collect::<Result<Vec<_>, _>>()?;
            let created =
                project::create_project(&ctx.pool, &actor, &args.name, &args.description, &members)?;
            tracing::info!(user = %actor.username, project = %created.name, "created project");

            println!(
                "{} Created project: {} ({})",
                "✓".green().bold(),
                created.name.cyan(),
                created.id.dimmed()
            );
        }

        ProjectCommands::List => {
            let projects = project::list_projects(&ctx.pool, &actor)?;
            output::print_projects_table(&projects);
        }

        ProjectCommands::Show(args) => {
            let found = project::get_project(&ctx.pool, &actor, &args.project_id)?;
            let tasks = task::list_tasks(&ctx.pool, &actor, Some(&found.id))?;
            let users = user::list_users(&ctx.pool)?;
            output::print_project(&found, &tasks, &users);
        }

        ProjectCommands::Edit(args) => {
            let updated = project::update_project(
                &ctx.pool,
                &actor,
                &args.project_id,
                &ProjectChanges {
                    name: args.name,
                    description: args.description,
                },
            )?;
            tracing::info!(user = %actor.username, project = %updated.name, "updated project");
            println!("{} Updated project {}", "✓".green().bold(), updated.name.cyan());
        }

        ProjectCommands::AddMember(args) => {
            let member = user::find_user(&ctx.pool, &args.username)?;
            let updated = project::add_member(&ctx.pool, &actor, &args.project_id, &member.id)?;
            tracing::info!(user = %actor.username, project = %updated.name, member = %member.username, "added member");
            println!(
                "{} {} is a member of {}",
                "✓".green().bold(),
                member.username.cyan(),
                updated.name.cyan()
            );
        }

        ProjectCommands::RemoveMember(args) => {
            let member = user::find_user(&ctx.pool, &args.username)?;
            let updated = project::remove_member(&ctx.pool, &actor, &args.project_id, &member.id)?;
            tracing::info!(user = %actor.username, project = %updated.name, member = %member.username, "removed member");
            println!(
                "{} {} is no longer a member of {}",
                "✓".green().bold(),
                member.username.cyan(),
                updated.name.cyan()
            );
        }

        ProjectCommands::Delete(args) => {
            let deleted = project::delete_project(&ctx.pool, &actor, &args.project_id)?;
            tracing::info!(user = %actor.username, project = %deleted.name, "deleted project");
            println!("{} Deleted project {}", "✓".green().bold(), deleted.name.cyan());
        }
    }

    Ok(())
}
