//! # autoissues_core
//!
//! Issue reference processing for documentation builds.
//!
//! References to issues are found in document trees, either written
//! explicitly with the `:issue:` role or as plain text matching a pattern
//! (`#10` by default). Each reference is looked up in the configured issue
//! tracker through a build-wide cache and turned into a link to the issue.
//!
//! ## Example
//!
//! ```rust,no_run
//! use autoissues_ast::AstArena;
//! use autoissues_core::{BuildEnvironment, IssueTrackerConfig, IssueTrackerExtension};
//! use autoissues_parser::{MarkdownParser, Parser};
//! use autoissues_tracker::TrackerRegistry;
//!
//! let config = IssueTrackerConfig::from_json(
//!     r#"{"issuetracker": "github", "issuetracker_project": "tmux-python/tmuxp"}"#,
//! )?;
//! let extension = IssueTrackerExtension::new(config, &TrackerRegistry::builtin())?;
//! let env = BuildEnvironment::new();
//!
//! let arena = AstArena::new();
//! let doc = MarkdownParser::new().parse(&arena, "Fixed in #10.")?;
//! let doc = extension.doctree_read(&arena, &env, &doc)?;
//! let doc = extension.missing_reference(&arena, &env, &doc)?;
//! # Ok::<(), autoissues_core::CoreError>(())
//! ```

mod config;
mod env;
mod error;
mod extension;
pub mod resolver;
mod role;
mod scanner;
pub mod stylesheet;
mod template;

pub use config::{CONFIG_FILE_NAME, DEFAULT_ISSUE_PATTERN, IssueTrackerConfig};
pub use env::{BuildEnvironment, CacheKey};
pub use error::CoreError;
pub use extension::IssueTrackerExtension;
pub use resolver::{PendingReference, collect_references};
pub use role::{RoleTransform, parse_role_content};
pub use scanner::{IssuePattern, ReferenceScanner, ScanTransform, Segment};
pub use template::format_issue;
