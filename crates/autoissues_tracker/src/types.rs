//! Issue and tracker configuration value types.

use serde::{Deserialize, Serialize};

/// A resolved issue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Issue {
    /// Issue id as written in the document.
    pub id: String,
    /// Issue title. May be empty.
    pub title: String,
    /// URL of the issue page.
    pub url: String,
    /// Whether the issue is closed.
    pub closed: bool,
}

impl Issue {
    /// Creates a new issue.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        closed: bool,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            closed,
        }
    }
}

/// Outcome of one backend lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The issue exists.
    Found(Issue),
    /// The tracker reported that the issue does not exist.
    NotFound,
    /// The issue could not be looked up right now.
    Unavailable,
}

impl Lookup {
    /// Returns the issue, if found.
    pub fn issue(&self) -> Option<&Issue> {
        match self {
            Self::Found(issue) => Some(issue),
            _ => None,
        }
    }

    /// Converts into the issue, if found.
    pub fn into_issue(self) -> Option<Issue> {
        match self {
            Self::Found(issue) => Some(issue),
            _ => None,
        }
    }

    /// Returns true if a later lookup may have a different outcome.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

impl From<Option<Issue>> for Lookup {
    fn from(issue: Option<Issue>) -> Self {
        issue.map_or(Self::NotFound, Self::Found)
    }
}

/// Identifies the remote project issues are looked up in.
///
/// Trailing slashes are stripped from `url` on construction, so configs that
/// differ only in trailing slashes compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawTrackerConfig")]
pub struct TrackerConfig {
    project: String,
    url: Option<String>,
}

#[derive(Deserialize)]
struct RawTrackerConfig {
    project: String,
    #[serde(default)]
    url: Option<String>,
}

impl From<RawTrackerConfig> for TrackerConfig {
    fn from(raw: RawTrackerConfig) -> Self {
        Self::with_optional_url(raw.project, raw.url)
    }
}

impl TrackerConfig {
    /// Creates a config for `project` without a base URL.
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            url: None,
        }
    }

    /// Creates a config with an optional base URL.
    pub fn with_optional_url(project: impl Into<String>, url: Option<String>) -> Self {
        Self {
            project: project.into(),
            url: url.map(|u| u.trim_end_matches('/').to_string()),
        }
    }

    /// Sets the base URL.
    pub fn with_url(self, url: impl Into<String>) -> Self {
        Self::with_optional_url(self.project, Some(url.into()))
    }

    /// Returns the project name.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Returns the base URL, without trailing slashes.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}
