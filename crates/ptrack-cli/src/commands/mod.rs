//! CLI command definitions and handlers.

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use ptrack_core::user::model::Credentials;
use ptrack_core::user::{DbUserDirectory, UserDirectory};
use ptrack_core::Identity;
use ptrack_db::DbPool;
use std::path::PathBuf;
use std::sync::Arc;

pub mod project;
pub mod serve;
pub mod task;
pub mod user;

/// PTrack - multi-user project and task tracker
#[derive(Parser)]
#[command(name = "ptrack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the SQLite database
    #[arg(long, global = true, env = "PTRACK_DB", default_value = "ptrack.db")]
    pub db: PathBuf,

    /// Username to act as
    #[arg(short, long, global = true, env = "PTRACK_USER")]
    pub user: Option<String>,

    /// Password for --user
    #[arg(long, global = true, env = "PTRACK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server
    Serve(serve::ServeArgs),

    /// Manage user accounts
    #[command(subcommand)]
    User(user::UserCommands),

    /// Manage projects and their members
    #[command(subcommand)]
    Project(project::ProjectCommands),

    /// Manage tasks and their progress
    #[command(subcommand)]
    Task(task::TaskCommands),
}

/// Shared handles for command handlers.
pub struct Context {
    pub pool: Arc<DbPool>,
    credentials: Option<Credentials>,
}

impl Context {
    /// Authenticate `--user`/`--password` against the directory.
    pub fn actor(&self) -> Result<Identity> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            anyhow::anyhow!("This command needs --user and --password (or PTRACK_USER/PTRACK_PASSWORD).")
        })?;
        let identity = DbUserDirectory::new(self.pool.clone())
            .authenticate(credentials)
            .with_context(|| format!("Cannot sign in as '{}'", credentials.username))?;
        tracing::debug!(user = %identity.username, "authenticated");
        Ok(identity)
    }
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let pool = Arc::new(
            ptrack_db::init_pool(&self.db)
                .with_context(|| format!("Cannot open database {}", self.db.display()))?,
        );
        let credentials = match (self.user, self.password) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            _ => None,
        };
        let ctx = Context { pool, credentials };

        match self.command {
            Commands::Serve(args) => serve::execute(args, &ctx).await,
            Commands::User(cmd) => user::execute(cmd, &ctx),
            Commands::Project(cmd) => project::execute(cmd, &ctx),
            Commands::Task(cmd) => task::execute(cmd, &ctx),
        }
    }
}
