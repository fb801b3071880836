//! PTrack CLI - multi-user project and task tracker.

use anyhow::{Context, Result};
use clap::Parser;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::{Cli, Commands};

/// Split a log path into its directory and file name, creating the directory.
fn prepare_log_file(path: &Path) -> Result<(PathBuf, OsString)> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Cannot create log directory {}", dir.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "ptrack.log".into());
    Ok((dir.to_path_buf(), file_name))
}

/// Initialize tracing, optionally mirroring events into a log file.
///
/// The returned guard flushes the file writer and must live until exit.
fn init_tracing(log_file: Option<&Path>, verbose: bool) -> Result<Option<WorkerGuard>> {
    let default_filter = if verbose {
        "ptrack=debug,ptrack_web=debug,ptrack_db=debug,tower_http=debug"
    } else {
        "ptrack=info,ptrack_web=debug"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_file {
        Some(path) => {
            let (dir, file_name) = prepare_log_file(path)?;

            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));

            // Log to both stdout and file when --log is used
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
            Ok(None)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = match &cli.command {
        Commands::Serve(args) if args.log => Some(
            args.log_file
                .clone()
                .unwrap_or_else(|| "ptrack-serve.log".into()),
        ),
        _ => None,
    };

    let _guard = init_tracing(log_file.as_deref(), cli.verbose)?;

    cli.execute().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_log_file_creates_directory() {
        let root = std::env::temp_dir().join(format!("ptrack-log-{}", std::process::id()));
        let (dir, name) = prepare_log_file(&root.join("logs/serve.log")).unwrap();
        assert!(dir.is_dir());
        assert_eq!(name, "serve.log");

        let (dir, _) = prepare_log_file(Path::new("serve.log")).unwrap();
        assert_eq!(dir, Path::new("."));
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_prepare_log_file_reports_unusable_directory() {
        let blocker = std::env::temp_dir().join(format!("ptrack-blocker-{}", std::process::id()));
        std::fs::write(&blocker, b"not a directory").unwrap();

        let err = prepare_log_file(&blocker.join("serve.log")).unwrap_err();
        assert!(err.to_string().contains("Cannot create log directory"));
        std::fs::remove_file(&blocker).unwrap();
    }
}
