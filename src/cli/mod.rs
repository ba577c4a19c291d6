//! Command-line interface for tsbun
//!
//! A single command: `tsbun [ENTRY]` builds the project in the working
//! directory. `--version` and `--help` are handled here rather than by clap
//! so they share the same short-circuit path and output format.

mod build;

use std::ffi::OsString;

use clap::{CommandFactory, Parser};

use crate::error::ArgumentError;
use crate::report::ReportPolicy;

pub use build::{Outcome, Toolchain};

/// tsbun - build TypeScript libraries with Bun and emit type declarations
#[derive(Parser, Debug, Clone)]
#[command(name = "tsbun")]
#[command(about, long_about = None)]
#[command(disable_version_flag = true, disable_help_flag = true)]
pub struct Cli {
    /// Entry point (defaults to index.ts, src/index.ts, or `entry` from tsbun.config.ts)
    #[arg(value_name = "ENTRY")]
    pub entries: Vec<String>,

    /// Print version
    #[arg(short = 'v', long)]
    pub version: bool,

    /// Print help
    #[arg(short = 'h', long)]
    pub help: bool,

    /// Watch for changes (accepted, currently has no effect)
    #[arg(long)]
    pub watch: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Bun executable used for bundling and config evaluation
    #[arg(long, env = "TSBUN_BUN", default_value = "bun", hide_env_values = true)]
    pub bun: String,

    /// TypeScript compiler used for declaration output
    #[arg(long, env = "TSBUN_TSC", default_value = "tsc", hide_env_values = true)]
    pub tsc: String,
}

impl Cli {
    /// Parse process-style arguments (the first item is the program name)
    pub fn parse_args<I, T>(args: I) -> Result<Self, ArgumentError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args).map_err(ArgumentError::from)
    }

    /// First positional argument, the entry point override
    pub fn entry_argument(&self) -> Option<&str> {
        self.entries.first().map(String::as_str)
    }

    pub fn policy(&self) -> ReportPolicy {
        if self.verbose {
            ReportPolicy::Verbose
        } else {
            ReportPolicy::Minimal
        }
    }

    /// Rendered help text
    pub fn help_text() -> String {
        Self::command().render_help().to_string()
    }
}

/// `<name>@<version>`
pub fn version_string() -> String {
    format!("{}@{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_and_positionals() {
        let cli = Cli::parse_args(["tsbun", "--watch", "lib/main.ts", "extra.ts"]).unwrap();

        assert!(cli.watch);
        assert!(!cli.version);
        assert!(!cli.help);
        assert_eq!(cli.entry_argument(), Some("lib/main.ts"));
        assert_eq!(cli.entries.len(), 2);
        assert_eq!(cli.policy(), ReportPolicy::Minimal);
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::parse_args(["tsbun", "-v"]).unwrap();
        assert!(cli.version);

        let cli = Cli::parse_args(["tsbun", "-h"]).unwrap();
        assert!(cli.help);
    }

    #[test]
    fn test_no_entry_argument() {
        let cli = Cli::parse_args(["tsbun", "--verbose"]).unwrap();
        assert_eq!(cli.entry_argument(), None);
        assert_eq!(cli.policy(), ReportPolicy::Verbose);
    }

    #[test]
    fn test_unknown_flag_is_normalized() {
        let err = Cli::parse_args(["tsbun", "--frobnicate"]).unwrap_err();
        assert!(err.message.starts_with("Failed to parse arguments:"));
        assert!(err.message.contains("--frobnicate"));
        assert!(!err.message.contains('\n'));
    }

    #[test]
    fn test_version_string() {
        assert_eq!(
            version_string(),
            format!("tsbun@{}", env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn test_help_text_mentions_flags() {
        let help = Cli::help_text();
        assert!(help.contains("--watch"));
        assert!(help.contains("--version"));
        assert!(help.contains("[ENTRY]"));
    }
}
