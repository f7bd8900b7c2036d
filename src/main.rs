//! uaexport - Main entry point

use clap::Parser;
use log::{debug, info};
use std::process::ExitCode;

use uaexport::{run_export_command, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; values may come from the real environment
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    info!("Starting uaexport v{}", env!("CARGO_PKG_VERSION"));
    debug!(
        "CLI args: ids={}, start={}, end={}, export_dir={}, name={}",
        cli.ids,
        cli.start_date,
        cli.end_date,
        cli.export_dir.display(),
        cli.name
    );

    match run_export_command(&cli).await {
        Ok(Some(summary)) => {
            println!(
                "Report exported: {} rows, {} columns. {}",
                summary.rows,
                summary.headers.len(),
                summary.outcome.summary()
            );
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("Nothing exported: invalid query (see log file for details)");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to process data: {}", e);
            ExitCode::FAILURE
        }
    }
}
