//! Error types for tsbun
//!
//! Every failure of a run is represented here as a typed value. The binary
//! maps these to an exit status exactly once, in `main`.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for build operations
pub type Result<T> = std::result::Result<T, BuildError>;

/// Malformed command-line input
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ArgumentError {
    /// Normalized, single-line message
    pub message: String,
}

impl From<clap::Error> for ArgumentError {
    fn from(err: clap::Error) -> Self {
        // clap renders "error: <reason>" followed by usage; keep the reason.
        let rendered = err.to_string();
        let reason = rendered
            .lines()
            .next()
            .map(|line| line.trim_start_matches("error:").trim())
            .filter(|line| !line.is_empty())
            .or_else(|| err.kind().as_str())
            .unwrap_or("invalid arguments");

        Self {
            message: format!("Failed to parse arguments: {}", reason),
        }
    }
}

/// Failure to load `tsbun.config.ts`
///
/// Never fatal: the loader downgrades these to a warning.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to run config evaluator `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("evaluating {} failed: {message}", .path.display())]
    Evaluation { path: PathBuf, message: String },

    #[error("{} did not produce a valid config: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A fatal build failure
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Could not find entry point (tried {tried})")]
    EntryNotFound { tried: String },

    #[error("Bundling failed with {} message(s)", .logs.len())]
    BundleFailed { logs: Vec<String> },

    #[error("Type declaration generation failed ({})", exit_description(.code))]
    TypeGenerationFailed { code: Option<i32> },

    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    /// Process exit status this failure maps to
    pub fn exit_code(&self) -> u8 {
        1
    }

    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}
