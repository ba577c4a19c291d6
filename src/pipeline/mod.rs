//! Build orchestration
//!
//! Runs one build: clean the output directory, bundle, report artifacts,
//! then emit type declarations. The first failing step ends the build.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::bundler::{BuildArtifact, BundleRequest, Bundler};
use crate::config::{BuildConfig, Target};
use crate::error::{BuildError, Result};
use crate::report::Reporter;
use crate::typegen::{declaration_args, TypeGenerator, TSCONFIG_FILE};

/// Output directory used when the config does not name one
pub const DEFAULT_OUTDIR: &str = "dist";

/// Effective build options, after defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    pub outdir: PathBuf,
    pub minify: bool,
    pub target: Target,
}

impl BuildOptions {
    pub fn from_config(config: Option<&BuildConfig>) -> Self {
        Self {
            outdir: PathBuf::from(
                config
                    .and_then(|c| c.outdir.as_deref())
                    .unwrap_or(DEFAULT_OUTDIR),
            ),
            minify: config.and_then(|c| c.minify).unwrap_or(true),
            target: config.and_then(|c| c.target).unwrap_or_default(),
        }
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::from_config(None)
    }
}

/// A finished build
#[derive(Debug)]
pub struct BuildSummary {
    pub entry: PathBuf,
    pub artifacts: Vec<BuildArtifact>,
    pub elapsed: Duration,
}

/// Sequences the external build tools for one project
pub struct BuildPipeline<'a> {
    root: PathBuf,
    bundler: &'a dyn Bundler,
    types: &'a dyn TypeGenerator,
    reporter: Reporter,
}

impl<'a> BuildPipeline<'a> {
    pub fn new(
        root: impl Into<PathBuf>,
        bundler: &'a dyn Bundler,
        types: &'a dyn TypeGenerator,
        reporter: Reporter,
    ) -> Self {
        Self {
            root: root.into(),
            bundler,
            types,
            reporter,
        }
    }

    /// Build `entry` with options derived from `config`
    pub async fn run(&self, entry: &Path, config: Option<&BuildConfig>) -> Result<BuildSummary> {
        let start = Instant::now();
        let options = BuildOptions::from_config(config);

        self.reporter.build_start(entry);
        self.reporter.detail("outdir", options.outdir.display());
        self.reporter.detail("target", options.target);
        self.reporter.detail("minify", options.minify);

        // 1. Clean the output directory
        self.clean(&options.outdir).await?;

        // 2. Bundle
        info!("Bundling {}", entry.display());
        let outcome = self
            .bundler
            .bundle(&BundleRequest {
                entrypoint: entry.to_path_buf(),
                outdir: options.outdir.clone(),
                target: options.target,
                minify: options.minify,
            })
            .await;

        if !outcome.success {
            self.reporter.bundle_logs(&outcome.logs);
            return Err(BuildError::BundleFailed { logs: outcome.logs });
        }

        self.reporter.artifacts(&outcome.outputs, &self.root);

        // 3. Type declarations
        let has_tsconfig = self.root.join(TSCONFIG_FILE).is_file();
        debug!("{} present: {}", TSCONFIG_FILE, has_tsconfig);
        let args = declaration_args(&options.outdir, entry, has_tsconfig);

        self.reporter.generating_types(self.types.program(), &args);
        let code = self.types.generate(&args).await?;
        if code != Some(0) {
            return Err(BuildError::TypeGenerationFailed { code });
        }

        let elapsed = start.elapsed();
        self.reporter.success(elapsed);

        Ok(BuildSummary {
            entry: entry.to_path_buf(),
            artifacts: outcome.outputs,
            elapsed,
        })
    }

    /// Remove the output directory; a missing directory is fine
    async fn clean(&self, outdir: &Path) -> Result<()> {
        let path = self.root.join(outdir);
        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => {
                self.reporter.detail("cleaned", outdir.display());
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(BuildError::io(
                format!("Failed to clean output directory {}", path.display()),
                err,
            )),
        }
    }
}
