//! Build command implementation

use std::path::Path;

use tracing::debug;

use super::{version_string, Cli};
use crate::bundler::{BunBundler, Bundler};
use crate::config::{BunEvaluator, ConfigEvaluator, ConfigLoader};
use crate::error::Result;
use crate::pipeline::{BuildPipeline, BuildSummary};
use crate::report::Reporter;
use crate::resolver::EntryResolver;
use crate::typegen::{TscGenerator, TypeGenerator};

/// What a successful invocation did
#[derive(Debug)]
pub enum Outcome {
    /// `--version`: text to print
    Version(String),
    /// `--help`: text to print
    Help(String),
    /// A completed build
    Built(BuildSummary),
}

/// The external programs a build talks to
pub struct Toolchain {
    pub evaluator: Box<dyn ConfigEvaluator>,
    pub bundler: Box<dyn Bundler>,
    pub types: Box<dyn TypeGenerator>,
}

impl Toolchain {
    /// `bun` for config evaluation and bundling, `tsc` for declarations
    pub fn from_cli(cli: &Cli, root: &Path) -> Self {
        Self {
            evaluator: Box::new(BunEvaluator::new(&cli.bun, root)),
            bundler: Box::new(BunBundler::new(&cli.bun, root)),
            types: Box::new(TscGenerator::new(&cli.tsc, root)),
        }
    }
}

impl Cli {
    /// Run against the project in `root` with the real toolchain
    pub async fn execute(&self, root: &Path) -> Result<Outcome> {
        let toolchain = Toolchain::from_cli(self, root);
        self.execute_with(root, &toolchain).await
    }

    /// Run against the project in `root` with the given toolchain
    pub async fn execute_with(&self, root: &Path, toolchain: &Toolchain) -> Result<Outcome> {
        if self.version {
            return Ok(Outcome::Version(version_string()));
        }
        if self.help {
            return Ok(Outcome::Help(Self::help_text()));
        }
        if self.watch {
            debug!("--watch has no effect yet; running a single build");
        }

        let reporter = Reporter::new(self.policy());

        let loaded = ConfigLoader::new(root, toolchain.evaluator.as_ref())
            .load(&reporter)
            .await;
        match &loaded.path {
            Some(path) => reporter.detail("config", path.display()),
            None => reporter.detail("config", "none"),
        }

        let (entry, source) =
            EntryResolver::new(root).resolve(self.entry_argument(), loaded.config.as_ref())?;
        reporter.detail("entry", format!("{} ({:?})", entry.display(), source));

        let summary = BuildPipeline::new(
            root,
            toolchain.bundler.as_ref(),
            toolchain.types.as_ref(),
            reporter,
        )
        .run(&entry, loaded.config.as_ref())
        .await?;

        Ok(Outcome::Built(summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{BundleOutcome, BundleRequest};
    use crate::config::CONFIG_FILE;
    use crate::error::{BuildError, ConfigError};
    use async_trait::async_trait;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Counts every collaborator call and remembers the bundled entry
    #[derive(Clone, Default)]
    struct Calls {
        count: Arc<AtomicUsize>,
        bundled: Arc<Mutex<Option<PathBuf>>>,
    }

    impl Calls {
        fn bump(&self) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }

        fn get(&self) -> usize {
            self.count.load(Ordering::SeqCst)
        }

        fn bundled_entry(&self) -> Option<PathBuf> {
            self.bundled.lock().unwrap().clone()
        }
    }

    struct Evaluator(Calls, Option<String>);

    #[async_trait]
    impl ConfigEvaluator for Evaluator {
        async fn evaluate(&self, path: &Path) -> std::result::Result<String, ConfigError> {
            self.0.bump();
            self.1.clone().ok_or_else(|| ConfigError::Evaluation {
                path: path.to_path_buf(),
                message: "SyntaxError: Unexpected token".into(),
            })
        }
    }

    struct RecordingBundler(Calls);

    #[async_trait]
    impl Bundler for RecordingBundler {
        async fn bundle(&self, request: &BundleRequest) -> BundleOutcome {
            self.0.bump();
            *self.0.bundled.lock().unwrap() = Some(request.entrypoint.clone());
            BundleOutcome::succeeded(vec![])
        }
    }

    struct Types(Calls);

    #[async_trait]
    impl TypeGenerator for Types {
        fn program(&self) -> &str {
            "tsc"
        }

        async fn generate(&self, _args: &[String]) -> Result<Option<i32>> {
            self.0.bump();
            Ok(Some(0))
        }
    }

    fn toolchain(calls: &Calls, config_json: Option<&str>) -> Toolchain {
        Toolchain {
            evaluator: Box::new(Evaluator(calls.clone(), config_json.map(String::from))),
            bundler: Box::new(RecordingBundler(calls.clone())),
            types: Box::new(Types(calls.clone())),
        }
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_args(std::iter::once("tsbun").chain(args.iter().copied())).unwrap()
    }

    #[tokio::test]
    async fn test_version_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "throw new Error()").unwrap();
        let calls = Calls::default();

        let outcome = cli(&["--version"])
            .execute_with(dir.path(), &toolchain(&calls, None))
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::Version(v) if v == version_string()));
        assert_eq!(calls.get(), 0);
    }

    #[tokio::test]
    async fn test_help_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "export default {}").unwrap();
        let calls = Calls::default();

        let outcome = cli(&["-h"])
            .execute_with(dir.path(), &toolchain(&calls, Some("{}")))
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::Help(text) if text.contains("Usage")));
        assert_eq!(calls.get(), 0);
    }

    #[tokio::test]
    async fn test_missing_entry_fails_before_bundling() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Calls::default();

        let err = cli(&[])
            .execute_with(dir.path(), &toolchain(&calls, None))
            .await
            .unwrap_err();

        assert!(matches!(err, BuildError::EntryNotFound { .. }));
        assert_eq!(calls.get(), 0);
    }

    #[tokio::test]
    async fn test_config_entry_is_used() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "export default {}").unwrap();
        let calls = Calls::default();
        let toolchain = toolchain(&calls, Some(r#"{"entry":["a.ts","b.ts"]}"#));

        let outcome = cli(&["--watch"])
            .execute_with(dir.path(), &toolchain)
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::Built(ref s) if s.entry == PathBuf::from("a.ts")));
        assert_eq!(calls.bundled_entry(), Some(PathBuf::from("a.ts")));
        // evaluator, bundler, type generator
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_broken_config_does_not_abort() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "export default {").unwrap();
        fs::write(dir.path().join("index.ts"), "export const x = 1;\n").unwrap();
        let calls = Calls::default();

        let outcome = cli(&[])
            .execute_with(dir.path(), &toolchain(&calls, None))
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::Built(ref s) if s.entry == PathBuf::from("index.ts")));
        assert_eq!(calls.get(), 3);
    }
}
