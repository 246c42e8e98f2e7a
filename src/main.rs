use anyhow::{bail, Context};
use clap::Parser;
use console::style;
use std::sync::Arc;
use treesync::config::Cli;
use treesync::executor::ProgressCallback;
use treesync::ui::{format_summary, ProgressReporter};
use treesync::{Config, FileOutcome, SyncLog};

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{} {:#}", style("error:").red().bold(), err);
        std::process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Convert CLI args to Config - this validates immediately
    let config = Config::try_from(cli).context("invalid configuration")?;
    let log = SyncLog::for_flags(config.verbose, config.dry_run);

    println!("treesync v{}", treesync::VERSION);
    println!("  Source: {}", config.source.display());
    println!("  Destination: {}", config.destination.display());
    println!("  Workers: {}", config.worker_count());
    println!("  Dry run: {}", config.dry_run);
    println!("  Delete extra files: {}", config.delete);

    // Event output already narrates verbose and dry runs
    let reporter =
        (!config.verbose && !config.dry_run).then(|| Arc::new(ProgressReporter::new()));
    let on_progress = reporter.as_ref().map(|reporter| {
        let reporter = Arc::clone(reporter);
        let callback: Arc<ProgressCallback> =
            Arc::new(move |outcome: &FileOutcome| reporter.record(outcome));
        callback
    });

    let result = treesync::commands::run_with_progress(&config, &log, on_progress);
    if let Some(reporter) = &reporter {
        reporter.finish();
    }
    let report = result.context("synchronization failed")?;

    println!("{}", format_summary(&report));

    if config.strict && report.has_failures() {
        bail!("some entries failed to sync (see log output above)");
    }
    Ok(())
}
