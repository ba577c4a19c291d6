//! Bundler invocation
//!
//! Bundling itself is done by `bun build`. This module describes a bundle
//! request, runs it, and collects what ended up in the output directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::Target;

/// What to bundle and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRequest {
    pub entrypoint: PathBuf,
    pub outdir: PathBuf,
    pub target: Target,
    pub minify: bool,
}

/// A file produced by the bundler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifact {
    /// Output file path
    pub path: PathBuf,

    /// Size in bytes
    pub size: u64,
}

/// Result of a bundler run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleOutcome {
    pub success: bool,

    /// Diagnostics, populated on failure
    pub logs: Vec<String>,

    /// Produced files, populated on success
    pub outputs: Vec<BuildArtifact>,
}

impl BundleOutcome {
    pub fn succeeded(outputs: Vec<BuildArtifact>) -> Self {
        Self {
            success: true,
            logs: Vec::new(),
            outputs,
        }
    }

    pub fn failed(logs: Vec<String>) -> Self {
        Self {
            success: false,
            logs,
            outputs: Vec::new(),
        }
    }
}

/// Something that can turn an entry point into bundled output
#[async_trait]
pub trait Bundler: Send + Sync {
    async fn bundle(&self, request: &BundleRequest) -> BundleOutcome;
}

/// Runs `bun build`
pub struct BunBundler {
    program: String,
    root: PathBuf,
}

impl BunBundler {
    pub fn new(program: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            root: root.into(),
        }
    }
}

/// Command-line arguments for `bun build`
pub fn bundle_args(request: &BundleRequest) -> Vec<String> {
    let mut args = vec![
        "build".to_string(),
        request.entrypoint.display().to_string(),
        "--outdir".to_string(),
        request.outdir.display().to_string(),
        "--target".to_string(),
        request.target.to_string(),
    ];
    if request.minify {
        args.push("--minify".to_string());
    }
    args
}

#[async_trait]
impl Bundler for BunBundler {
    async fn bundle(&self, request: &BundleRequest) -> BundleOutcome {
        let args = bundle_args(request);
        debug!("Running {} {}", self.program, args.join(" "));

        let output = match Command::new(&self.program)
            .args(&args)
            .current_dir(&self.root)
            .output()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                return BundleOutcome::failed(vec![format!(
                    "failed to run `{}`: {}",
                    self.program, err
                )])
            }
        };

        if !output.status.success() {
            let mut logs = diagnostic_lines(&output.stderr);
            if logs.is_empty() {
                logs = diagnostic_lines(&output.stdout);
            }
            if logs.is_empty() {
                logs.push(format!("`{}` exited with {}", self.program, output.status));
            }
            return BundleOutcome::failed(logs);
        }

        match collect_artifacts(&self.root.join(&request.outdir)) {
            Ok(outputs) => BundleOutcome::succeeded(outputs),
            Err(err) => BundleOutcome::failed(vec![format!(
                "failed to read bundle output in {}: {}",
                request.outdir.display(),
                err
            )]),
        }
    }
}

fn diagnostic_lines(stream: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(stream)
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// All regular files under `dir`, sorted by path
pub fn collect_artifacts(dir: &Path) -> walkdir::Result<Vec<BuildArtifact>> {
    let mut artifacts = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        artifacts.push(BuildArtifact {
            size: entry.metadata()?.len(),
            path: entry.into_path(),
        });
    }

    Ok(artifacts)
}
