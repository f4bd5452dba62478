//! The tracker backend trait.

use crate::{Lookup, TrackerConfig, TrackerError, TrackerState};

/// A named backend that looks up issues in one issue tracking service.
///
/// # Example
///
/// ```rust
/// use autoissues_tracker::{
///     Issue, IssueTracker, Lookup, TrackerConfig, TrackerError, TrackerState,
/// };
///
/// struct StaticTracker;
///
/// impl IssueTracker for StaticTracker {
///     fn name(&self) -> &str {
///         "static"
///     }
///
///     fn lookup(
///         &self,
///         _state: &dyn TrackerState,
///         config: &TrackerConfig,
///         issue_id: &str,
///     ) -> Result<Lookup, TrackerError> {
///         Ok(Lookup::Found(Issue::new(
///             issue_id,
///             "Static issue",
///             format!("https://example.com/{}/{issue_id}", config.project()),
///             false,
///         )))
///     }
/// }
/// ```
pub trait IssueTracker: Send + Sync {
    /// Returns the name the backend is registered under.
    fn name(&self) -> &str;

    /// Looks up `issue_id` in the project described by `config`.
    ///
    /// Returns [`Lookup::NotFound`] when the tracker says the issue does not
    /// exist and [`Lookup::Unavailable`] when the lookup failed for a
    /// transient reason. Returns `Err` only for configuration errors.
    fn lookup(
        &self,
        state: &dyn TrackerState,
        config: &TrackerConfig,
        issue_id: &str,
    ) -> Result<Lookup, TrackerError>;
}
