use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, error, info};

use builder_bumper::cli::Cli;
use builder_bumper::config::BumperConfig;
use builder_bumper::planner::{BumpReport, Planner};
use builder_bumper::registry::GoDevReleaseSource;

mod observability;

// Every await runs in sequence on this one thread
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Handle no-color flag
    if cli.no_color {
        colored::control::set_override(false);
    }

    observability::init_logging(
        observability::env_filter(cli.quiet, cli.verbose, "info"),
        !cli.no_color,
    );

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format!("{:#}", err), "update run failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let root = cli.root();
    let config = load_config(cli, &root)?;

    let source = GoDevReleaseSource::with_endpoints(
        config.release_url.clone(),
        config.download_url.clone(),
    )
    .with_archive_suffix(config.archive_suffix.clone());

    let report = Planner::new(&root, &source, &config)
        .dry_run(cli.dry_run)
        .run()
        .await
        .with_context(|| format!("failed to bump Go versions in {}", root.display()))?;

    print_report(&report, cli.dry_run);
    Ok(())
}

fn load_config(cli: &Cli, root: &Path) -> Result<BumperConfig> {
    if let Some(path) = &cli.config {
        let config = BumperConfig::load(path)?;
        debug!(path = %path.display(), "loaded config");
        return Ok(config);
    }

    match BumperConfig::discover(root) {
        Some((config, path)) => {
            debug!(path = %path.display(), "discovered config");
            Ok(config)
        }
        None => Ok(BumperConfig::default()),
    }
}

fn print_report(report: &BumpReport, dry_run: bool) {
    let (Some(branch), Some(message)) = (report.branch_name(), report.commit_message()) else {
        println!("{} Go versions are up to date", "✓".green());
        return;
    };

    info!(branch = %branch, message = %message, dry_run, "bumped Go versions");

    if dry_run {
        println!(
            "{} {}",
            "Dry run, nothing written. Would commit:".yellow(),
            message
        );
        return;
    }

    println!("Run the following command to commit the changes:");
    println!("  {}", format!("git checkout -b {}", branch).cyan());
    println!(
        "  {}",
        format!("git commit . --no-edit --message \"{}\"", message).cyan()
    );
}
