//! Run command: fetch the selected feeds and rewrite their blocklists.

use anyhow::Result;
use phishblock_core::config::FeedConfig;
use phishblock_core::fetch::CurlFetcher;
use phishblock_core::pipeline::{self, SourceOutcome};

fn outcome_line(outcome: &SourceOutcome) -> String {
    match &outcome.result {
        Ok(report) => {
            let mut line = format!(
                "{}: {} domains from {} records -> {} (sha256 {})",
                report.name,
                report.domains,
                report.records,
                report.output.display(),
                report.sha256
            );
            if report.rejected.total() > 0 {
                line.push_str(&format!("; rejected {}", report.rejected));
            }
            line
        }
        Err(e) => format!("{}: FAILED: {}", outcome.name, e),
    }
}

/// Runs the pipeline. Per-source failures are printed, not returned.
pub fn run_feeds(cfg: &FeedConfig, names: &[String]) -> Result<()> {
    let sources = cfg.select_sources(names)?;
    let fetcher = CurlFetcher::from_config(cfg);
    let summary = pipeline::run(cfg, &sources, &fetcher);

    for outcome in &summary.outcomes {
        println!("{}", outcome_line(outcome));
    }
    tracing::info!(
        "run finished: {} ok, {} failed",
        summary.succeeded().count(),
        summary.failed().count()
    );
    Ok(())
}
