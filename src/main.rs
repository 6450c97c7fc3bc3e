mod cli;
mod config;
mod git;
mod locate;
mod paths;
mod render;
mod report;
mod testutil;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "GIT_STATUS_REPORT_LOG";

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    // Captured once so the file name tag and the report trailer agree.
    let run_at = Local::now().naive_local();

    let config = config::load(cli.config.as_deref())?;

    let root = paths::resolve_scan_root(cli.dir.as_deref())?;
    let output_file = cli.output.as_deref().or(config.report.output.as_deref());
    let tag = (cli.timestamp || config.report.timestamp).then_some(run_at);
    let out_path = paths::resolve_output_path(output_file, tag)?;

    eprintln!("Searching '{}'.", root.display());
    let discovery = locate::locate_repos(&root);

    // git is only required once there is something to query.
    let state = match &discovery {
        locate::Discovery::NoneFound => report::empty_report(&root, run_at),
        locate::Discovery::Found(_) => {
            let git = git::Git::locate()?;
            let aggregator = report::Aggregator::new(&git, &config.markers);
            report::build_report(&aggregator, &root, &discovery, run_at)
        }
    };

    let written = state.repos_found.then_some(out_path.as_path());

    if cli.json {
        let json = render::JsonReport {
            output_file: written,
            state: &state,
        };
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        let summary = render::format_summary_human(&state);
        if !summary.is_empty() {
            println!("{}", summary);
        }
    }

    match written {
        Some(path) => {
            if !cli.json {
                println!("\nWriting '{}'.", path.display());
            }
            std::fs::write(path, render::file_contents(&state))
                .with_context(|| format!("failed to write report to {}", path.display()))?;
        }
        None => {
            if !cli.json {
                println!("\n{}\n", state.report_text());
            }
        }
    }

    Ok(())
}
