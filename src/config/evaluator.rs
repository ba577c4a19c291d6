//! Evaluation of executable config modules
//!
//! `tsbun.config.ts` is a TypeScript module, so reading it means running it.
//! Evaluation happens in a separate `bun` process which prints the exported
//! config as JSON after a marker line; nothing the module does can take this
//! process down, and anything it logs while loading is ignored.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;
use url::Url;

use crate::error::ConfigError;

/// Turns a config module into JSON text
#[async_trait]
pub trait ConfigEvaluator: Send + Sync {
    /// Evaluate the module at `path`, returning the JSON encoding of its
    /// default export (or of the module object when there is none)
    async fn evaluate(&self, path: &Path) -> Result<String, ConfigError>;
}

/// Evaluates config modules with `bun --eval`
pub struct BunEvaluator {
    program: String,
    root: PathBuf,
}

impl BunEvaluator {
    pub fn new(program: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            root: root.into(),
        }
    }
}

/// Printed on its own line right before the config JSON
pub(crate) const RESULT_MARKER: &str = "__TSBUN_CONFIG_RESULT__";

/// Script run by the evaluator; prints the marker, then the config as JSON
pub(crate) fn evaluation_script(path: &Path) -> Result<String, ConfigError> {
    let url = Url::from_file_path(path).map_err(|()| ConfigError::Evaluation {
        path: path.to_path_buf(),
        message: "config path must be absolute".to_string(),
    })?;
    // A JSON string literal is also a valid JS string literal.
    let specifier = serde_json::Value::String(url.into());
    let marker = serde_json::Value::String(format!("\n{}\n", RESULT_MARKER));
    Ok(format!(
        "const mod = await import({specifier});\n\
         const config = mod.default ?? mod;\n\
         process.stdout.write({marker} + JSON.stringify(config ?? null));\n"
    ))
}

/// The config JSON: everything after the last marker line
pub(crate) fn extract_result(stdout: &str) -> Option<&str> {
    stdout
        .rsplit_once(RESULT_MARKER)
        .map(|(_, json)| json.trim())
}

#[async_trait]
impl ConfigEvaluator for BunEvaluator {
    async fn evaluate(&self, path: &Path) -> Result<String, ConfigError> {
        debug!("Evaluating {} with {}", path.display(), self.program);

        let output = Command::new(&self.program)
            .arg("--eval")
            .arg(evaluation_script(path)?)
            .current_dir(&self.root)
            .output()
            .await
            .map_err(|source| ConfigError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConfigError::Evaluation {
                path: path.to_path_buf(),
                message: format!("{} ({})", stderr.trim(), output.status),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|e| ConfigError::Evaluation {
            path: path.to_path_buf(),
            message: format!("output is not valid UTF-8: {}", e),
        })?;

        extract_result(&stdout)
            .map(str::to_string)
            .ok_or_else(|| ConfigError::Evaluation {
                path: path.to_path_buf(),
                message: "evaluator exited without printing a config".to_string(),
            })
    }
}
