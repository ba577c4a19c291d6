//! tsbun - build TypeScript libraries with Bun and emit type declarations
//!
//! Resolves an entry point, bundles it with `bun build`, and generates
//! `.d.ts` files with `tsc`.
//!
//! # Entry resolution
//! 1. The first positional argument
//! 2. `index.ts`, then `src/index.ts`, if present
//! 3. `entry` exported from `tsbun.config.ts`

use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tsbun::cli::{Cli, Outcome};
use tsbun::error::BuildError;
use tsbun::report::Reporter;

/// Initialize the logging/tracing system
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tsbun=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tsbun=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

async fn run(cli: &Cli) -> Result<Outcome> {
    let root = std::env::current_dir().context("Failed to determine working directory")?;
    Ok(cli.execute(&root).await?)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{}", Cli::help_text());
            eprintln!("{} {}", "✗".red().bold(), err);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(cli.verbose);
    let reporter = Reporter::new(cli.policy());

    match run(&cli).await {
        Ok(Outcome::Version(text)) | Ok(Outcome::Help(text)) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Ok(Outcome::Built(_)) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<BuildError>() {
            Some(build_err) => {
                reporter.failure(build_err);
                if let BuildError::EntryNotFound { .. } = build_err {
                    eprintln!(
                        "  {} Pass an entry point ({}) or set {} in tsbun.config.ts",
                        "•".dimmed(),
                        "tsbun <entry>".cyan(),
                        "entry".cyan()
                    );
                }
                ExitCode::from(build_err.exit_code())
            }
            None => {
                eprintln!("{}", Cli::help_text());
                reporter.failure(format!("{:#}", err));
                ExitCode::FAILURE
            }
        },
    }
}
