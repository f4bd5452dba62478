//! The stylesheet for rendered issue links.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::CoreError;

/// File name of the stylesheet.
pub const STYLESHEET_NAME: &str = "issuetracker.css";

/// Directory below the output directory that holds static files.
pub const STATIC_DIR: &str = "_static";

/// The stylesheet content.
pub const STYLESHEET: &str = include_str!("../assets/issuetracker.css");

/// Writes the stylesheet to `<outdir>/_static/issuetracker.css` and returns
/// its path.
pub fn copy_stylesheet(outdir: impl AsRef<Path>) -> Result<PathBuf, CoreError> {
    let static_dir = outdir.as_ref().join(STATIC_DIR);
    fs::create_dir_all(&static_dir)?;

    let path = static_dir.join(STYLESHEET_NAME);
    info!("Copying issuetracker stylesheet");
    fs::write(&path, STYLESHEET)?;
    Ok(path)
}
