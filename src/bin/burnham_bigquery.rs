//! burnham-bigquery - Verifies that burnham pings arrived in BigQuery

use burnham::cli;
use burnham::commands::BigQueryArgs;
use burnham::common::logging;
use clap::Parser;

#[tokio::main]
async fn main() {
    let args = BigQueryArgs::parse();
    logging::init_cli(args.verbose);

    match cli::run_bigquery(args).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
