//! Cache command implementation

use std::fs;
use std::io::ErrorKind;

use miette::{IntoDiagnostic, Result};
use tracing::info;

use super::CACHE_DIR;

pub fn run_cache_clean() -> Result<()> {
    match fs::remove_dir_all(CACHE_DIR) {
        Ok(()) => info!("Issue cache cleaned"),
        Err(e) if e.kind() == ErrorKind::NotFound => info!("Issue cache is already empty"),
        Err(e) => return Err(e).into_diagnostic(),
    }
    Ok(())
}
