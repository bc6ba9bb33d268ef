use std::process::ExitCode;

use args::Cli;
use clap::Parser;
use commands::process_args;
use tracing_subscriber::EnvFilter;

pub mod args;
pub mod commands;
pub mod progress;
pub mod prompts;

const VERBOSE_FILTER: &str = "info,kami_core=debug,kami_chan_server_installer=debug";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Cli::parse();

    let default_filter = if args.verbose || args.debug {
        VERBOSE_FILTER
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match process_args(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
