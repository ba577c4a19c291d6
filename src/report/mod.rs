//! Console reporting
//!
//! All user-facing output goes through [`Reporter`] so one build procedure
//! can run with either a terse or a verbose policy.

use std::path::Path;
use std::time::Duration;

use colored::Colorize;

use crate::bundler::BuildArtifact;
use crate::utils::{display_relative, format_duration, format_size};

/// How much the reporter prints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportPolicy {
    #[default]
    Minimal,
    Verbose,
}

/// Prints build progress to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    policy: ReportPolicy,
}

impl Reporter {
    pub fn new(policy: ReportPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ReportPolicy {
        self.policy
    }

    pub fn is_verbose(&self) -> bool {
        self.policy == ReportPolicy::Verbose
    }

    /// Print a labelled detail line, verbose policy only
    pub fn detail(&self, label: &str, value: impl std::fmt::Display) {
        if self.is_verbose() {
            eprintln!("  {} {} {}", "•".dimmed(), format!("{}:", label).dimmed(), value);
        }
    }

    pub fn warning(&self, message: impl std::fmt::Display) {
        eprintln!("{} {}", "⚠".yellow().bold(), message.to_string().yellow());
    }

    pub fn build_start(&self, entry: &Path) {
        eprintln!(
            "{} Building {}...",
            "→".blue(),
            entry.display().to_string().cyan()
        );
    }

    /// Echo bundler diagnostics verbatim
    pub fn bundle_logs(&self, logs: &[String]) {
        for log in logs {
            eprintln!("{}", log);
        }
    }

    pub fn artifacts(&self, artifacts: &[BuildArtifact], cwd: &Path) {
        eprintln!("\n{} Bundled {} file(s)\n", "✓".green().bold(), artifacts.len());
        for artifact in artifacts {
            eprintln!(
                "  {} {} {}",
                "•".dimmed(),
                display_relative(&artifact.path, cwd).cyan(),
                format_size(artifact.size).dimmed()
            );
        }
        eprintln!();
    }

    pub fn generating_types(&self, program: &str, args: &[String]) {
        eprintln!("{} Generating type declarations...", "→".blue());
        self.detail("command", format!("{} {}", program, args.join(" ")));
    }

    pub fn success(&self, elapsed: Duration) {
        if self.is_verbose() {
            eprintln!(
                "\n{} Build completed in {}\n",
                "✓".green().bold(),
                format_duration(elapsed)
            );
        } else {
            eprintln!("\n{} Build completed\n", "✓".green().bold());
        }
    }

    pub fn failure(&self, message: impl std::fmt::Display) {
        eprintln!("{} {}", "✗".red().bold(), message.to_string().red());
    }
}
