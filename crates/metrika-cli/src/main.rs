//! Metrika - personal weight, hydration and activity tracking
//!
//! A CLI that records health metrics by hand or by reading a photographed
//! scale display, and renders summary cards on the terminal.

mod cli;
mod commands;
mod output;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Ctrl-C fires the token; in-flight store and recognizer calls abort
    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupt received, cancelling in-flight calls");
            signal_token.cancel();
        }
    });

    if let Err(e) = commands::execute(cli, token).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
