//! Configuration schema definitions

use std::fmt;

use serde::{Deserialize, Serialize};

/// Build configuration exported by `tsbun.config.ts`
///
/// Every field is optional; the orchestrator fills in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Entry point, or ordered candidates for one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<EntrySpec>,

    /// Output directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outdir: Option<String>,

    /// Minify bundled output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minify: Option<bool>,

    /// Bundler target environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,
}

/// `entry` accepts a single path or a list of candidates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntrySpec {
    Single(String),
    List(Vec<String>),
}

impl EntrySpec {
    /// The entry this designates, if any
    pub fn first(&self) -> Option<&str> {
        match self {
            EntrySpec::Single(path) => Some(path),
            EntrySpec::List(paths) => paths.first().map(String::as_str),
        }
    }
}

/// Target environment passed to the bundler
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    Bun,
    Browser,
    Node,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Bun => "bun",
            Target::Browser => "browser",
            Target::Node => "node",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
