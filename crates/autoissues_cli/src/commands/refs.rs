//! Refs command implementation

use std::fs;
use std::path::{Path, PathBuf};

use autoissues_ast::{AstArena, LineIndex};
use autoissues_core::{IssueTrackerConfig, IssueTrackerExtension, collect_references};
use autoissues_parser::parser_for_extension;
use autoissues_tracker::TrackerRegistry;
use miette::{IntoDiagnostic, Result, miette};
use serde::Serialize;

use super::load_config;
use crate::cli::{Cli, OutputFormat};

/// An issue reference found in a file.
#[derive(Debug, Serialize)]
struct FoundReference {
    path: String,
    line: u32,
    column: u32,
    issue: String,
    text: String,
    project: String,
}

pub fn run_refs(cli: &Cli, files: &[PathBuf], format: OutputFormat) -> Result<bool> {
    let config = load_config(cli, Path::new("."))?;
    // Only scanning happens here, so the tracker name is not checked.
    let config = IssueTrackerConfig {
        issuetracker: None,
        ..config
    };
    let extension =
        IssueTrackerExtension::new(config, &TrackerRegistry::new()).into_diagnostic()?;

    let mut found = Vec::new();
    for path in files {
        found.extend(scan_file(&extension, path)?);
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&found).into_diagnostic()?);
        }
        OutputFormat::Text => {
            for reference in &found {
                println!(
                    "{}:{}:{}: {} -> issue {}",
                    reference.path,
                    reference.line,
                    reference.column + 1,
                    reference.text,
                    reference.issue
                );
            }
            println!();
            println!(
                "Found {} issue references in {} files",
                found.len(),
                files.len()
            );
        }
    }

    Ok(false)
}

fn scan_file(extension: &IssueTrackerExtension, path: &Path) -> Result<Vec<FoundReference>> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let parser = parser_for_extension(ext)
        .ok_or_else(|| miette!("Unsupported file type: {}", path.display()))?;
    let source = fs::read_to_string(path).into_diagnostic()?;

    let arena = AstArena::new();
    let tree = parser.parse(&arena, &source).into_diagnostic()?;
    let tree = extension.scan(&arena, &tree);

    let index = LineIndex::new(&source);
    Ok(collect_references(&tree)
        .into_iter()
        .map(|reference| {
            let position = index.position(reference.span.start);
            FoundReference {
                path: path.display().to_string(),
                line: position.line,
                column: position.column,
                issue: reference.target,
                text: reference.display,
                project: reference.tracker.project().to_string(),
            }
        })
        .collect())
}
