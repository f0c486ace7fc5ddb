//! Single-run deck list harvester.
//!
//! Launches a browser session against the public precon listing, clicks the
//! load-more control a bounded number of times, and writes the harvested
//! deck list as a sorted CSV.

use anyhow::Context;
use precon_engine::{launch, run_harvest, HarvestSettings, SessionSettings};
use precon_logging::LogDestination;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    precon_logging::initialize(LogDestination::Terminal);

    if let Err(err) = run().await {
        log::error!("harvest failed: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let settings = HarvestSettings::default();
    let session_settings = SessionSettings::default();

    let summary = run_harvest(|| launch(&session_settings), &settings)
        .await
        .context("harvest run did not complete")?;

    log::info!(
        "harvest complete: {} deck(s), {} pagination click(s), output {}",
        summary.decks,
        summary.clicks_performed,
        summary.output_path.display()
    );
    Ok(())
}
