use camvault_core::logging;
use clap::Parser;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    // Parse first so --debug can set the log level.
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.debug) {
        logging::init_logging_stderr(cli.debug);
        tracing::warn!("file logging unavailable, logging to stderr: {:#}", e);
    }

    if let Err(err) = cli.run().await {
        eprintln!("camvault error: {:#}", err);
        std::process::exit(1);
    }
}
