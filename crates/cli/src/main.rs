//! delegators entry point.
//!
//! Runs one pass end to end: fetch recent delegation activity, resolve
//! participant names, write the CSV export and the HTML dashboard. Any fatal
//! error is logged and turns into a non-zero exit status.

use anyhow::Result;
use clap::Parser;

mod args;
mod logging;
mod report;
mod run;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args = args::Args::parse();
    let config = args.load_config()?;
    let log_file = logging::init(&config.log_dir)?;

    tracing::info!(log_file = %log_file.display(), "starting delegators run v{}", env!("CARGO_PKG_VERSION"));

    match run::run(&config).await {
        Ok(summary) => {
            tracing::info!(
                events = summary.events,
                rows = summary.rows,
                named = summary.named,
                csv = %summary.csv_path.display(),
                html = %summary.html_path.display(),
                "run completed"
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("run failed: {:#}", e);
            Err(e)
        }
    }
}
