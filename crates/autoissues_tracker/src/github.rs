//! GitHub issue tracker backend.

use std::sync::OnceLock;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::http_client::HttpClient;
use crate::{
    Issue, IssueTracker, Lookup, RateLimit, TrackerConfig, TrackerError, TrackerState,
};

/// Name the backend is registered under.
pub const GITHUB: &str = "github";

/// Base URL of the public GitHub REST API.
pub const GITHUB_API_URL: &str = "https://api.github.com";

const RATE_LIMIT_REMAINING: &str = "X-RateLimit-Remaining";

/// Looks up issues through the GitHub REST API.
///
/// The project must be given as `owner/repo`. Requests always go to the
/// API base URL; the tracker URL of the configuration is not used.
pub struct GitHubTracker {
    api_base: String,
    client: OnceLock<HttpClient>,
}

/// The fields of the issue payload we use.
#[derive(Debug, Deserialize)]
struct GitHubIssue {
    state: String,
    title: String,
    html_url: String,
}

impl Default for GitHubTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl GitHubTracker {
    /// Creates a backend for the public GitHub API.
    pub fn new() -> Self {
        Self {
            api_base: GITHUB_API_URL.to_string(),
            client: OnceLock::new(),
        }
    }

    /// Set the API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into().trim_end_matches('/').to_string();
        self
    }

    fn client(&self) -> Result<&HttpClient, TrackerError> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = HttpClient::builder().build()?;
        Ok(self.client.get_or_init(|| client))
    }

    fn issue_url(&self, config: &TrackerConfig, issue_id: &str) -> String {
        format!(
            "{}/repos/{}/issues/{issue_id}",
            self.api_base,
            config.project()
        )
    }
}

fn check_project_with_owner(config: &TrackerConfig) -> Result<(), TrackerError> {
    if !config.project().contains('/') {
        return Err(TrackerError::config(format!(
            "username missing in project name: {}",
            config.project()
        )));
    }
    Ok(())
}

impl IssueTracker for GitHubTracker {
    fn name(&self) -> &str {
        GITHUB
    }

    fn lookup(
        &self,
        state: &dyn TrackerState,
        config: &TrackerConfig,
        issue_id: &str,
    ) -> Result<Lookup, TrackerError> {
        check_project_with_owner(config)?;

        if state.is_rate_limited(GITHUB) {
            warn!("GitHub rate limit exceeded, not resolving issue {issue_id}");
            return Ok(Lookup::Unavailable);
        }

        let url = self.issue_url(config, issue_id);
        debug!("GET {url}");
        let response = match self.client()?.get(&url) {
            Ok(response) => response,
            Err(e) => {
                warn!("GET {url} failed: {e}");
                return Ok(Lookup::Unavailable);
            }
        };

        let remaining = response
            .headers()
            .get(RATE_LIMIT_REMAINING)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        if remaining == Some(0) {
            warn!("GitHub rate limit hit");
            state.set_rate_limit(GITHUB, Some(RateLimit::hit(state.now())));
        }

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => {
                debug!("Issue {issue_id} not found in {}", config.project());
                return Ok(Lookup::NotFound);
            }
            status => {
                warn!("GET {url} failed with code {}", status.as_u16());
                return Ok(Lookup::Unavailable);
            }
        }

        let payload: GitHubIssue = match response.json() {
            Ok(payload) => payload,
            Err(e) => {
                warn!("GET {url} returned an invalid issue: {e}");
                return Ok(Lookup::Unavailable);
            }
        };

        Ok(Lookup::Found(Issue {
            id: issue_id.to_string(),
            title: payload.title,
            url: payload.html_url,
            closed: payload.state == "closed",
        }))
    }
}
