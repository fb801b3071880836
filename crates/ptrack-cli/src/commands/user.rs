//! User account commands.
//!
//! These act as the local operator and need no sign-in, so the first
//! administrator can be bootstrapped from the command line.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use ptrack_core::user::{self, model::NewUser};

use super::Context;
use crate::output;

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a user account
    Create(CreateUserArgs),

    /// List user accounts
    List,
}

#[derive(Args)]
pub struct CreateUserArgs {
    /// Login name
    pub username: String,

    /// Password for the new account
    #[arg(long = "new-password", env = "PTRACK_NEW_PASSWORD", hide_env_values = true)]
    pub new_password: String,

    #[arg(long, default_value = "")]
    pub email: String,

    #[arg(long, default_value = "")]
    pub first_name: String,

    #[arg(long, default_value = "")]
    pub last_name: String,

    /// Grant administrator rights
    #[arg(long)]
    pub admin: bool,
}

pub fn execute(cmd: UserCommands, ctx: &Context) -> Result<()> {
    match cmd {
        UserCommands::Create(args) => {
            let created = user::create_user(
                &ctx.pool,
                &NewUser {
                    username: args.username,
                    password: args.new_password,
                    email: args.email,
                    first_name: args.first_name,
                    last_name: args.last_name,
                    is_administrator: args.admin,
                },
            )?;
            tracing::info!(created = %created.username, admin = created.is_administrator, "created user");

            println!(
                "{} Created {}user: {} ({})",
                "✓".green().bold(),
                if created.is_administrator { "administrator " } else { "" },
                created.username.cyan(),
                created.id.dimmed()
            );
        }

        UserCommands::List => {
            let users = user::list_users(&ctx.pool)?;
            output::print_users_table(&users);
        }
    }

    Ok(())
}
