mod cli;
mod logging;
mod prompt;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use blogharvest_core::{label_feed_url, ExportMode};
use blogharvest_engine::{fetch_labels, FetchSettings, Harvester, ResolvedFeed, RunSummary};
use clap::{CommandFactory, Parser};
use console::style;
use engine_logging::{ErrorLogFile, FailureSink};
use log::info;

use crate::cli::{Cli, MODE_HINT};
use crate::logging::LogDestination;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(url) = cli.rss_url.clone() else {
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    };
    let Some(mode) = cli.mode else {
        println!("{MODE_HINT}");
        return ExitCode::SUCCESS;
    };

    let destination = if cli.log_file {
        LogDestination::Both
    } else {
        LogDestination::Terminal
    };
    logging::initialize(destination, cli.debug || cli.verbose);

    match run(&cli, &url, mode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", style("error:").red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, url: &str, mode: ExportMode) -> anyhow::Result<()> {
    let failures: Arc<dyn FailureSink> = Arc::new(ErrorLogFile::new(&cli.error_log));
    let harvester = Harvester::from_settings(
        cli.run_options(mode),
        FetchSettings::default(),
        failures,
        cli.wkhtmltopdf.as_deref(),
    )
    .context("failed to set up the run")?;

    let by_label = prompt::wants_label_search().context("failed to read answer")?;

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let summary = runtime.block_on(async {
        if by_label {
            harvest_label(&harvester, url).await
        } else {
            harvester.run(url).await.map(Some).map_err(anyhow::Error::from)
        }
    })?;

    if let Some(summary) = summary {
        report(&summary);
    }
    Ok(())
}

/// Offer the site's labels and export only the chosen one. `None` when the
/// site advertises no labels.
async fn harvest_label(harvester: &Harvester, url: &str) -> anyhow::Result<Option<RunSummary>> {
    let feed = harvester.resolve(url).await;

    let mut labels = fetch_labels(harvester.context(), url).await;
    if labels.is_empty() && feed.url != url {
        labels = fetch_labels(harvester.context(), &feed.url).await;
    }
    if labels.is_empty() {
        println!("No labels or tags found on the website.");
        return Ok(None);
    }

    let label = prompt::choose_label(&labels).context("failed to read label choice")?;
    info!("Scraping posts with label: {}", label);

    let label_feed = ResolvedFeed {
        url: label_feed_url(&feed.url, &label),
        platform: feed.platform,
    };
    info!("Fetching RSS feed: {}", label_feed.url);
    Ok(Some(harvester.run_feed(label_feed).await?))
}

fn report(summary: &RunSummary) {
    println!(
        "{} {} posts from {} ({})",
        style("Exported").green().bold(),
        summary.records.len(),
        summary.feed.url,
        summary.feed.platform
    );
    if let Some(path) = &summary.metadata_path {
        println!("Metadata: {}", path.display());
    }
}
