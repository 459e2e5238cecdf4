//! GoBarber - command-line front end for the barber booking app.
//!
//! Restores the stored session in the background at startup, then runs one
//! screen (sign-in, sign-up, dashboard, sign-out, status) against it.

mod cli;
mod screens;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use gobarber_core::{ApiClient, AuthProvider, Config, SessionManager};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Command};
use screens::{Dashboard, SignIn, SignUp};

/// Log file name prefix inside the data directory
const LOG_FILE_PREFIX: &str = "gobarber.log";

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr and to a daily rolling file under `log_dir` when one is
/// available. The returned guard must live until exit to flush the file.
fn init_tracing(log_dir: Option<PathBuf>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(ref url) = cli.api_url {
        config.api_url = url.clone();
    }
    if let Some(store) = cli.store {
        config.store = store;
    }

    let _log_guard = init_tracing(config.data_dir().ok().map(|d| d.join("logs")));
    let api = ApiClient::new(config.api_url.clone())?;
    info!(api_url = %api.base_url(), store = ?config.store, "GoBarber starting");

    let store = config.open_store()?;
    let provider = AuthProvider::start(SessionManager::new(store, Arc::new(api.clone())));
    let auth = provider.context();

    // Nothing below may act on session state before the restore resolves
    let state = auth.wait_until_loaded().await;
    debug!(authenticated = state.is_authenticated(), "Session restore finished");

    let result = match cli.command {
        Command::SignIn { email } => SignIn::new(auth, &mut config).run(email).await,
        Command::SignUp { name, email } => SignUp::new(&api).run(name, email).await,
        Command::Dashboard { refresh } => Dashboard::new(auth, &api).run(refresh).await,
        Command::SignOut => screens::sign_out(auth).await,
        Command::Status => {
            screens::status(&auth);
            Ok(())
        }
    };

    provider.shutdown().await?;
    info!("GoBarber shutting down");
    result
}
