use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use colored::{control, Colorize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use fedcheck::cli::{Cli, Command};
use fedcheck::config::Config;
use fedcheck::http::HttpClient;
use fedcheck::name::NameResolver;
use fedcheck::output::{self, REPORTERS};
use fedcheck::runner::Runner;
use fedcheck::source::HttpPublishedMetadata;
use fedcheck::suites;
use fedcheck::validation::ValidationContext;

fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        control::set_override(false);
    }

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(2);
        }
    }
}

fn run(cli: &Cli) -> Result<i32> {
    let names = suites::registry().context("Failed to register suites")?;

    match &cli.command {
        Command::ListSuites => {
            list_suites(&names)?;
            Ok(0)
        }
        Command::RunSuites { reporter } => run_suites(cli, &names, reporter),
    }
}

fn run_suites(cli: &Cli, names: &NameResolver, reporter_name: &str) -> Result<i32> {
    let mut reporter = output::reporter_for(reporter_name).with_context(|| {
        format!(
            "Unknown reporter '{}' (available: {})",
            reporter_name,
            REPORTERS.join(", ")
        )
    })?;

    let (path, config) = Config::load(cli.config.as_deref())?;
    tracing::info!(config = %path.display(), "loaded configuration");

    let configured = config.configured_metadata()?;
    let blacklist = config.blacklist()?;
    let client = HttpClient::new(&config.http);
    let published = HttpPublishedMetadata::new(&client, configured.metadata_urls());
    let validation = ValidationContext::new(Box::new(client.clone()));
    let suites = names.instantiate_suites()?;

    let summary = Runner::new(&configured, &published, &suites, &blacklist, &validation)
        .run(reporter.as_mut())?;

    Ok(if summary.has_failures() { 1 } else { 0 })
}

fn list_suites(names: &NameResolver) -> Result<()> {
    for suite in names.instantiate_suites()? {
        println!("{}", suite.name.bold());
        for test in &suite.tests {
            println!("  {}", test.name);
        }
    }
    Ok(())
}
