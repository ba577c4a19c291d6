//! tsbun library
//!
//! Config loading, entry resolution and build orchestration for the
//! `tsbun` command.

pub mod bundler;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod resolver;
pub mod typegen;
pub mod utils;

pub use cli::Cli;
pub use config::BuildConfig;
pub use error::BuildError;
pub use pipeline::BuildPipeline;
