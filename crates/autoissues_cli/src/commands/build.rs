//! Build command implementation

use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use autoissues_ast::visitor::walk_node;
use autoissues_ast::{AstArena, TxtNode, VisitResult, Visitor};
use autoissues_core::{BuildEnvironment, CoreError, IssueTrackerExtension, collect_references};
use autoissues_parser::{ParseError, parser_for_extension};
use autoissues_tracker::TrackerRegistry;
use miette::{IntoDiagnostic, Result};
use rayon::prelude::*;
use tracing::{debug, error, info, warn};
use walkdir::{DirEntry, WalkDir};

use super::{cache_path, load_config};
use crate::cli::{Builder, Cli};
use crate::output::render;

/// Issue reference counts of one document.
#[derive(Debug, Default, Clone, Copy)]
struct DocumentStats {
    references: usize,
    linked: usize,
}

/// Counts resolved issue links.
struct LinkCounter(usize);

impl<'a> Visitor<'a> for LinkCounter {
    fn visit_issue_link(&mut self, _node: &TxtNode<'a>) -> VisitResult {
        self.0 += 1;
        ControlFlow::Continue(())
    }
}

pub fn run_build(cli: &Cli, srcdir: &Path, outdir: &Path, builder: Builder) -> Result<bool> {
    let config = load_config(cli, srcdir)?;
    let extension =
        IssueTrackerExtension::new(config, &TrackerRegistry::builtin()).into_diagnostic()?;

    let env = if cli.no_cache {
        BuildEnvironment::new()
    } else {
        BuildEnvironment::load(cache_path()).unwrap_or_else(|e| {
            warn!("Ignoring unreadable issue cache: {}", e);
            BuildEnvironment::new()
        })
    };

    let sources = find_sources(srcdir, outdir);
    info!("Building {} documents", sources.len());

    let results: Vec<(&PathBuf, std::result::Result<DocumentStats, CoreError>)> = sources
        .par_iter()
        .map(|path| {
            let result = build_document(&extension, &env, srcdir, outdir, path, builder);
            (path, result)
        })
        .collect();

    let mut stats = DocumentStats::default();
    let mut failures = 0;
    for (path, result) in results {
        match result {
            Ok(doc) => {
                stats.references += doc.references;
                stats.linked += doc.linked;
            }
            Err(e) if e.is_config() => return Err(e).into_diagnostic(),
            Err(e) => {
                error!("{}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    extension
        .build_finished(outdir, builder.name(), failures > 0)
        .into_diagnostic()?;

    if !cli.no_cache {
        env.save(cache_path()).into_diagnostic()?;
    }

    println!(
        "Built {} documents ({} failed), linked {} of {} issue references",
        sources.len() - failures,
        failures,
        stats.linked,
        stats.references
    );

    Ok(failures > 0)
}

/// Returns the parseable files below `srcdir`, sorted.
///
/// Hidden entries and `outdir` are skipped.
fn find_sources(srcdir: &Path, outdir: &Path) -> Vec<PathBuf> {
    let outdir = outdir.canonicalize().ok();
    let is_outdir = |entry: &DirEntry| {
        entry.file_type().is_dir()
            && outdir.is_some()
            && entry.path().canonicalize().ok() == outdir
    };
    let is_hidden = |entry: &DirEntry| {
        entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
    };

    let mut sources: Vec<PathBuf> = WalkDir::new(srcdir)
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry) && !is_outdir(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(DirEntry::into_path)
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .and_then(parser_for_extension)
                .is_some()
        })
        .collect();
    sources.sort();
    sources
}

/// Reads, transforms and writes one document.
fn build_document(
    extension: &IssueTrackerExtension,
    env: &BuildEnvironment,
    srcdir: &Path,
    outdir: &Path,
    path: &Path,
    builder: Builder,
) -> std::result::Result<DocumentStats, CoreError> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let parser = parser_for_extension(ext)
        .ok_or_else(|| ParseError::invalid_source(format!("unsupported file type: {ext}")))?;
    let source = fs::read_to_string(path)?;

    debug!("Reading {}", path.display());
    let arena = AstArena::new();
    let tree = parser.parse(&arena, &source)?;
    let tree = extension.doctree_read(&arena, env, &tree)?;
    let references = collect_references(&tree).len();

    let tree = extension.missing_reference(&arena, env, &tree)?;
    let mut counter = LinkCounter(0);
    let _ = walk_node(&mut counter, &tree);

    let relative = path.strip_prefix(srcdir).unwrap_or(path);
    let target = outdir.join(relative).with_extension(builder.extension());
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let depth = relative.components().count().saturating_sub(1);
    fs::write(&target, render(&tree, builder, depth))?;
    debug!("Wrote {}", target.display());

    Ok(DocumentStats {
        references,
        linked: counter.0,
    })
}
