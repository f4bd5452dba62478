//! Command implementations

mod build;
mod cache;
mod refs;

use std::path::{Path, PathBuf};

use autoissues_core::IssueTrackerConfig;
use miette::{IntoDiagnostic, Result};
use tracing::info;

use crate::cli::Cli;

pub use build::run_build;
pub use cache::run_cache_clean;
pub use refs::run_refs;

/// Directory of the persisted issue cache, relative to the working directory.
pub const CACHE_DIR: &str = ".autoissues";

/// Returns the path of the persisted issue cache.
pub fn cache_path() -> PathBuf {
    Path::new(CACHE_DIR).join("issues.json")
}

/// Loads `--config`, or the config file found in `dir`.
pub fn load_config(cli: &Cli, dir: &Path) -> Result<IssueTrackerConfig> {
    if let Some(ref path) = cli.config {
        info!("Using config: {}", path.display());
        return IssueTrackerConfig::from_file(path).into_diagnostic();
    }
    IssueTrackerConfig::discover(dir).into_diagnostic()
}
