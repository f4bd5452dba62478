//! Build hooks tying the transforms together.
//!
//! A host drives an [`IssueTrackerExtension`] through the phases of a build:
//!
//! 1. [`IssueTrackerExtension::new`] once, when the build starts
//! 2. [`IssueTrackerExtension::doctree_read`] for each parsed document
//! 3. [`IssueTrackerExtension::missing_reference`] for each document before
//!    it is written
//! 4. [`IssueTrackerExtension::build_finished`] once, at the end

use std::path::{Path, PathBuf};
use std::sync::Arc;

use autoissues_ast::visitor::rewrite_root;
use autoissues_ast::{AstArena, TxtNode};
use autoissues_tracker::{IssueTracker, TrackerConfig, TrackerRegistry};
use tracing::{debug, info};

use crate::resolver::{lookup_issues, resolve_references};
use crate::stylesheet::copy_stylesheet;
use crate::{
    BuildEnvironment, CoreError, IssuePattern, IssueTrackerConfig, ReferenceScanner,
    RoleTransform, ScanTransform,
};

/// The builder whose output gets the stylesheet.
const HTML_BUILDER: &str = "html";

/// Issue reference processing for one build.
pub struct IssueTrackerExtension {
    config: IssueTrackerConfig,
    tracker_config: TrackerConfig,
    tracker: Option<Arc<dyn IssueTracker>>,
    scanner: ReferenceScanner,
}

impl IssueTrackerExtension {
    /// Sets up the extension for a build.
    ///
    /// Fails if the issue pattern is invalid or the configured tracker is not
    /// registered.
    pub fn new(config: IssueTrackerConfig, registry: &TrackerRegistry) -> Result<Self, CoreError> {
        let pattern = IssuePattern::new(&config.issuetracker_issue_pattern)?;
        let scanner = ReferenceScanner::new(pattern, config.issuetracker_title_template.clone());

        let tracker = match config.issuetracker.as_deref() {
            Some(name) => Some(registry.get(name)?),
            None => {
                debug!("No issue tracker configured, references stay unresolved");
                None
            }
        };
        let tracker_config = config.tracker_config();

        Ok(Self {
            config,
            tracker_config,
            tracker,
            scanner,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &IssueTrackerConfig {
        &self.config
    }

    /// Returns the tracker configuration applied to found references.
    pub fn tracker_config(&self) -> &TrackerConfig {
        &self.tracker_config
    }

    /// Returns the tracker backend, if one is configured.
    pub fn tracker(&self) -> Option<&dyn IssueTracker> {
        self.tracker.as_deref()
    }

    /// Marks issue references in `tree` without looking them up.
    pub fn scan<'a>(&self, arena: &'a AstArena, tree: &TxtNode<'a>) -> TxtNode<'a> {
        let mut role = RoleTransform::new(arena, &self.tracker_config);
        let mut tree = rewrite_root(&mut role, tree);
        let explicit = role.found();

        let mut implicit = 0;
        if self.config.issuetracker_plaintext_issues {
            let mut scan = ScanTransform::new(arena, &self.scanner, &self.tracker_config);
            tree = rewrite_root(&mut scan, &tree);
            implicit = scan.found();
        }

        debug!("Found {explicit} explicit and {implicit} plain text issue references");
        tree
    }

    /// Marks issue references in a freshly parsed document and looks them up.
    pub fn doctree_read<'a>(
        &self,
        arena: &'a AstArena,
        env: &BuildEnvironment,
        tree: &TxtNode<'a>,
    ) -> Result<TxtNode<'a>, CoreError> {
        let tree = self.scan(arena, tree);
        lookup_issues(env, self.tracker(), &tree)?;
        Ok(tree)
    }

    /// Replaces the pending references of `tree` with links or plain text.
    pub fn missing_reference<'a>(
        &self,
        arena: &'a AstArena,
        env: &BuildEnvironment,
        tree: &TxtNode<'a>,
    ) -> Result<TxtNode<'a>, CoreError> {
        resolve_references(arena, env, self.tracker(), tree)
    }

    /// Finishes the build.
    ///
    /// Copies the stylesheet for successful `html` builds and returns its
    /// path.
    pub fn build_finished(
        &self,
        outdir: impl AsRef<Path>,
        builder: &str,
        failed: bool,
    ) -> Result<Option<PathBuf>, CoreError> {
        if builder != HTML_BUILDER || failed {
            return Ok(None);
        }
        let path = copy_stylesheet(outdir)?;
        info!("Wrote {}", path.display());
        Ok(Some(path))
    }
}

impl std::fmt::Debug for IssueTrackerExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssueTrackerExtension")
            .field("config", &self.config)
            .field("tracker", &self.tracker.as_ref().map(|t| t.name().to_string()))
            .finish()
    }
}
