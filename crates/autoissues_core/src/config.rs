//! Issue tracker configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use autoissues_tracker::TrackerConfig;
use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::CoreError;

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// Name of the configuration file looked up in the source directory.
pub const CONFIG_FILE_NAME: &str = "autoissues.json";

/// Default pattern for plain text issue references.
pub const DEFAULT_ISSUE_PATTERN: &str = r"#(\d+)";

/// Configuration of the issue transforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueTrackerConfig {
    /// Name of the documented project.
    #[serde(default)]
    pub project: Option<String>,

    /// Name of the tracker backend. Lookups are disabled when unset.
    #[serde(default)]
    pub issuetracker: Option<String>,

    /// Project in the tracker. Falls back to `project`.
    #[serde(default)]
    pub issuetracker_project: Option<String>,

    /// Base URL of the tracker.
    #[serde(default)]
    pub issuetracker_url: Option<String>,

    /// Whether plain text references are scanned.
    #[serde(default = "default_plaintext_issues")]
    pub issuetracker_plaintext_issues: bool,

    /// Pattern for plain text references. Exactly one capture group.
    #[serde(default = "default_issue_pattern")]
    pub issuetracker_issue_pattern: String,

    /// Display template for plain text references.
    #[serde(default)]
    pub issuetracker_title_template: Option<String>,
}

fn default_plaintext_issues() -> bool {
    true
}

fn default_issue_pattern() -> String {
    DEFAULT_ISSUE_PATTERN.to_string()
}

impl IssueTrackerConfig {
    /// Creates a configuration with all defaults and no tracker.
    pub fn new() -> Self {
        Self {
            project: None,
            issuetracker: None,
            issuetracker_project: None,
            issuetracker_url: None,
            issuetracker_plaintext_issues: default_plaintext_issues(),
            issuetracker_issue_pattern: default_issue_pattern(),
            issuetracker_title_template: None,
        }
    }

    /// Loads configuration from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CoreError::config(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        Self::from_json(&content)
    }

    /// Parses configuration from JSON string with schema validation.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| CoreError::config(format!("Invalid JSON: {}", e)))?;

        let schema = CONFIG_SCHEMA.get_or_init(|| {
            let schema_json: serde_json::Value =
                serde_json::from_str(SCHEMA_JSON).expect("Invalid embedded config schema");
            Validator::new(&schema_json).expect("Invalid config schema compilation")
        });

        if let Err(e) = schema.validate(&value) {
            let error_msg = format!("{} at {}", e, e.instance_path());
            return Err(CoreError::config(format!(
                "Config validation failed: {}",
                error_msg
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| CoreError::config(format!("Invalid config: {}", e)))
    }

    /// Returns the config file in `dir`, if present.
    pub fn find_in(dir: impl AsRef<Path>) -> Option<PathBuf> {
        let candidate = dir.as_ref().join(CONFIG_FILE_NAME);
        candidate.is_file().then_some(candidate)
    }

    /// Loads the config file in `dir`, or returns the defaults.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self, CoreError> {
        match Self::find_in(&dir) {
            Some(path) => {
                debug!("Using config file {}", path.display());
                Self::from_file(path)
            }
            None => {
                debug!(
                    "No {} in {}, using defaults",
                    CONFIG_FILE_NAME,
                    dir.as_ref().display()
                );
                Ok(Self::new())
            }
        }
    }

    /// Returns the tracker configuration for this build.
    ///
    /// The project is `issuetracker_project`, falling back to `project`.
    pub fn tracker_config(&self) -> TrackerConfig {
        let project = self
            .issuetracker_project
            .as_deref()
            .or(self.project.as_deref())
            .unwrap_or_default();
        TrackerConfig::with_optional_url(project, self.issuetracker_url.clone())
    }
}

impl Default for IssueTrackerConfig {
    fn default() -> Self {
        Self::new()
    }
}
