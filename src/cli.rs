use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::output::DEFAULT_REPORTER;

/// SAML federation entity checker
#[derive(Parser, Debug)]
#[command(
    name = "fedcheck",
    version,
    about = "Verify SAML federation entities against policy",
    long_about = "Runs verification suites against every entity in the configuration file, \
                  comparing the metadata configured by the federation operator with the \
                  metadata each entity publishes, and reports failed tests with a reason, \
                  an explanation and a severity.",
    after_help = "\
EXAMPLES:
  fedcheck run-suites                         Check every configured entity
  fedcheck --config fed.toml run-suites       Use a specific configuration file
  fedcheck run-suites --reporter json         Output failures as JSON
  fedcheck list-suites                        Show suite and test names for blacklists
  fedcheck --log-level debug run-suites       Show skipped and passed tests on stderr

EXIT CODES:
  0  No test failed
  1  One or more tests failed
  2  Tool failure (e.g., unreadable configuration, unknown reporter)

CONFIGURATION:
  --config PATH, else ./fedcheck.toml, else ~/.fedcheck.toml"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `warn`, `debug` or `fedcheck=trace`
    #[arg(long, global = true, default_value = "warn", value_name = "LEVEL")]
    pub log_level: String,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every suite against every configured entity
    #[command(name = "run-suites")]
    RunSuites {
        /// Reporter for failures (console, json)
        #[arg(long, default_value = DEFAULT_REPORTER, value_name = "NAME")]
        reporter: String,
    },

    /// List suite and test names
    #[command(name = "list-suites")]
    ListSuites,
}
