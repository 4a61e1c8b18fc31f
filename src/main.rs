//! burnham - End-to-end test application for the telemetry pipeline
//!
//! Travels through space on the requested missions and records what happens
//! along the way as telemetry pings.

use burnham::cli;
use burnham::commands::BurnhamArgs;
use burnham::common::logging;
use clap::Parser;

#[tokio::main]
async fn main() {
    let args = BurnhamArgs::parse();
    logging::init_cli(args.verbose);

    if let Err(e) = cli::run(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
