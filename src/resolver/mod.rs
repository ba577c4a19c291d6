//! Entry point resolution
//!
//! Picks the module the build starts from: the CLI argument, then a default
//! file on disk, then the config's `entry`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::BuildConfig;
use crate::error::{BuildError, Result};

/// Default entry candidates, checked in order
pub const DEFAULT_ENTRIES: [&str; 2] = ["index.ts", "src/index.ts"];

/// Where a resolved entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySource {
    Argument,
    Default,
    Config,
}

/// Resolves the build entry point relative to a project root
pub struct EntryResolver<'a> {
    root: &'a Path,
}

impl<'a> EntryResolver<'a> {
    pub fn new(root: &'a Path) -> Self {
        Self { root }
    }

    /// Resolve the entry point
    ///
    /// The CLI argument is used verbatim and is not checked for existence.
    pub fn resolve(
        &self,
        argument: Option<&str>,
        config: Option<&BuildConfig>,
    ) -> Result<(PathBuf, EntrySource)> {
        if let Some(arg) = argument {
            debug!("Using entry from command line: {}", arg);
            return Ok((PathBuf::from(arg), EntrySource::Argument));
        }

        if let Some(default) = DEFAULT_ENTRIES
            .iter()
            .find(|candidate| self.root.join(candidate).is_file())
        {
            debug!("Using default entry: {}", default);
            return Ok((PathBuf::from(default), EntrySource::Default));
        }

        if let Some(entry) = config
            .and_then(|c| c.entry.as_ref())
            .and_then(|e| e.first())
        {
            debug!("Using entry from config: {}", entry);
            return Ok((PathBuf::from(entry), EntrySource::Config));
        }

        Err(BuildError::EntryNotFound {
            tried: DEFAULT_ENTRIES.join(", "),
        })
    }
}
