//! Web server command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::Context;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, env = "PTRACK_PORT", default_value = "3030")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "PTRACK_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path (defaults to ./ptrack-serve.log)
    #[arg(long, requires = "log")]
    pub log_file: Option<PathBuf>,
}

pub async fn execute(args: ServeArgs, ctx: &Context) -> Result<()> {
    println!();
    println!("  {} {}", "PTrack".cyan().bold(), "API Server".bold());
    println!();
    println!("  {}     http://{}:{}/api", "API".green(), args.host, args.port);
    println!("  {}  http://{}:{}/health", "Health".green(), args.host, args.port);
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    ptrack_web::run_server(ctx.pool.clone(), &args.host, args.port).await?;

    Ok(())
}
