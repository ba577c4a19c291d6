//! Type declaration generation
//!
//! `.d.ts` files are emitted by `tsc` in declaration-only mode.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{BuildError, Result};

/// Project config file that switches `tsc` to `--project` mode
pub const TSCONFIG_FILE: &str = "tsconfig.json";

/// Something that can emit type declarations
#[async_trait]
pub trait TypeGenerator: Send + Sync {
    /// Program name, for reporting
    fn program(&self) -> &str;

    /// Run with `args`; returns the exit code, `None` if killed by a signal
    async fn generate(&self, args: &[String]) -> Result<Option<i32>>;
}

/// Arguments for a declaration-only `tsc` run
///
/// With a `tsconfig.json` the project file drives compilation; without one a
/// fixed set of bundler-friendly flags is passed along with the entry.
pub fn declaration_args(outdir: &Path, entry: &Path, has_tsconfig: bool) -> Vec<String> {
    let mut args: Vec<String> = ["--declaration", "--emitDeclarationOnly", "--noEmit", "false"]
        .into_iter()
        .map(String::from)
        .collect();
    args.push("--outDir".to_string());
    args.push(outdir.display().to_string());

    if has_tsconfig {
        args.push("--project".to_string());
        args.push(TSCONFIG_FILE.to_string());
    } else {
        args.extend(
            [
                "--esModuleInterop",
                "--skipLibCheck",
                "--moduleResolution",
                "bundler",
                "--target",
                "esnext",
            ]
            .into_iter()
            .map(String::from),
        );
        args.push(entry.display().to_string());
    }

    args
}

/// Runs `tsc` with inherited stdio
pub struct TscGenerator {
    program: String,
    root: PathBuf,
}

impl TscGenerator {
    pub fn new(program: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            root: root.into(),
        }
    }
}

#[async_trait]
impl TypeGenerator for TscGenerator {
    fn program(&self) -> &str {
        &self.program
    }

    async fn generate(&self, args: &[String]) -> Result<Option<i32>> {
        debug!("Running {} {}", self.program, args.join(" "));

        let status = Command::new(&self.program)
            .args(args)
            .current_dir(&self.root)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| BuildError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        Ok(status.code())
    }
}
