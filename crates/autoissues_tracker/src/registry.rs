//! Registry of tracker backends by name.

use std::collections::HashMap;
use std::sync::Arc;

use crate::{GitHubTracker, IssueTracker, TrackerError};

/// Maps tracker names to backends.
///
/// Names are case-insensitive.
#[derive(Clone, Default)]
pub struct TrackerRegistry {
    trackers: HashMap<String, Arc<dyn IssueTracker>>,
}

impl TrackerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in backends.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(GitHubTracker::new()));
        registry
    }

    /// Registers `tracker` under its name, replacing any previous backend.
    pub fn register(&mut self, tracker: Arc<dyn IssueTracker>) {
        self.trackers
            .insert(tracker.name().to_lowercase(), tracker);
    }

    /// Returns the backend registered under `name`.
    pub fn get(&self, name: &str) -> Result<Arc<dyn IssueTracker>, TrackerError> {
        self.trackers
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| TrackerError::UnknownTracker(name.to_string()))
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.trackers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for TrackerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerRegistry")
            .field("trackers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lookup, TrackerConfig, TrackerState};
    use rstest::rstest;

    struct Named(&'static str);

    impl IssueTracker for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn lookup(
            &self,
            _state: &dyn TrackerState,
            _config: &TrackerConfig,
            _issue_id: &str,
        ) -> Result<Lookup, TrackerError> {
            Ok(Lookup::NotFound)
        }
    }

    #[rstest]
    #[case("github")]
    #[case("GitHub")]
    #[case("GITHUB")]
    fn test_builtin_github_case_insensitive(#[case] name: &str) {
        let registry = TrackerRegistry::builtin();
        assert_eq!(registry.get(name).unwrap().name(), "github");
    }

    #[test]
    fn test_unknown_tracker() {
        let registry = TrackerRegistry::builtin();
        let err = registry.get("bitbucket").err().unwrap();

        assert!(matches!(err, TrackerError::UnknownTracker(ref n) if n == "bitbucket"));
        assert!(err.is_config());
    }

    #[test]
    fn test_register_custom_tracker() {
        let mut registry = TrackerRegistry::builtin();
        registry.register(Arc::new(Named("Jira")));

        assert_eq!(registry.names(), vec!["github", "jira"]);
        assert_eq!(registry.get("jira").unwrap().name(), "Jira");
    }
}
