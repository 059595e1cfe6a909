//! sqldemo - reads the bundled email database and reports readiness
//!
//! On startup the seed database is installed (first run only) and read in
//! the background while the readiness message is shown. The read is awaited
//! and its outcome reported; Ctrl-C cancels it. A damaged working copy is
//! replaced from the seed with `--reseed`.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Seed: $XDG_DATA_HOME/sqldemo/assets/database/Email.db
//! - Database: $XDG_DATA_HOME/sqldemo/databases/app_database
//! - Logs: $XDG_STATE_HOME/sqldemo/sqldemo.log
//! - Config: $XDG_CONFIG_HOME/sqldemo/config.toml

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use sqldemo_core::{Config, Email, LoadOutcome, LoadTask};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

const READY_MESSAGE: &str = "The database is ready!";

/// How long exit waits on a blocking read that ignored cancellation
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

#[derive(Parser)]
#[command(name = "sqldemo")]
#[command(about = "Open the bundled email database and read it once")]
#[command(version)]
struct Args {
    /// Seed database copied into place on first run
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Working database path
    #[arg(long)]
    database: Option<PathBuf>,

    /// Replace the working database with a fresh copy of the seed
    #[arg(long)]
    reseed: bool,

    /// Print the loaded emails as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let code = runtime.block_on(run(args));
    // A cancelled read may still hold a blocking thread; do not wait on it
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    code
}

async fn run(args: Args) -> Result<ExitCode> {
    let mut config = Config::load().context("failed to load configuration")?;
    if let Some(seed) = &args.seed {
        config.store.seed_path = Some(seed.clone());
    }
    if let Some(database) = &args.database {
        config.store.database_path = Some(database.clone());
    }
    match args.verbose {
        0 => {}
        1 => config.logging.level = "debug".to_string(),
        _ => config.logging.level = "trace".to_string(),
    }

    let _log_guard =
        sqldemo_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("sqldemo starting");

    let mut ctx = config.store_context();
    if args.reseed {
        ctx = ctx.reinstalling();
    }
    tracing::info!(
        seed = %ctx.seed_path().display(),
        database = %ctx.database_path().display(),
        reseed = ctx.reinstall(),
        "Resolved store paths"
    );

    let load = LoadTask::spawn(ctx);
    println!("{READY_MESSAGE}");

    let outcome = tokio::select! {
        outcome = load.join() => outcome,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, cancelling startup load");
            LoadOutcome::Cancelled
        }
    };

    let code = match outcome {
        LoadOutcome::Loaded(emails) => {
            tracing::info!(count = emails.len(), "Startup load complete");
            report(&emails, args.json)?;
            ExitCode::SUCCESS
        }
        LoadOutcome::Failed(e) => {
            tracing::error!(error = %e, kind = ?e.kind(), "Startup load failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
        LoadOutcome::Cancelled => {
            eprintln!("startup load cancelled");
            ExitCode::from(130)
        }
    };

    tracing::info!("sqldemo shutting down");
    Ok(code)
}

fn report(emails: &[Email], json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(emails).context("failed to encode emails")?;
        println!("{out}");
    } else {
        println!("Loaded {} email(s)", emails.len());
    }
    Ok(())
}
