//! Build-scoped state: the issue cache and tracker rate-limit markers.
//!
//! A [`BuildEnvironment`] is created at the start of a build, shared by all
//! documents of the build (also across threads) and dropped, or saved with
//! [`BuildEnvironment::save`], at the end.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use autoissues_tracker::{
    Issue, IssueTracker, Lookup, RateLimit, TrackerConfig, TrackerState, unix_now,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::CoreError;

/// Cache key: the tracker configuration and the issue id.
///
/// Keying by configuration keeps references to the same id in different
/// projects apart.
pub type CacheKey = (TrackerConfig, String);

/// A cache slot. `None` until the lookup finished, then the lookup outcome.
type Slot = Arc<Mutex<Option<Lookup>>>;

type Clock = Box<dyn Fn() -> f64 + Send + Sync>;

/// Version of the persisted cache format.
const CACHE_FORMAT_VERSION: u32 = 1;

/// The issue cache and rate-limit markers of one build.
pub struct BuildEnvironment {
    cache: Mutex<HashMap<CacheKey, Slot>>,
    rate_limits: Mutex<HashMap<String, RateLimit>>,
    clock: Clock,
}

/// On-disk form of the environment.
#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    #[serde(default)]
    issues: Vec<CacheRecord>,
    #[serde(default)]
    rate_limits: HashMap<String, RateLimit>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheRecord {
    tracker: TrackerConfig,
    id: String,
    issue: Option<Issue>,
}

impl BuildEnvironment {
    /// Creates an empty environment using the system clock.
    pub fn new() -> Self {
        Self::with_clock(unix_now)
    }

    /// Creates an empty environment with a custom clock (seconds since the
    /// Unix epoch).
    pub fn with_clock(clock: impl Fn() -> f64 + Send + Sync + 'static) -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
            rate_limits: Mutex::new(HashMap::new()),
            clock: Box::new(clock),
        }
    }

    /// Looks up an issue through the cache.
    ///
    /// On a cache hit the cached result is returned, including a cached
    /// "not found". On a miss `tracker` is asked and its outcome cached.
    /// Concurrent callers for the same key wait for the first lookup, so
    /// the tracker is asked at most once per key.
    ///
    /// An unavailable issue is cached as "not found" for this build but is
    /// not saved. Tracker errors are returned and not cached.
    pub fn lookup(
        &self,
        tracker: &dyn IssueTracker,
        config: &TrackerConfig,
        issue_id: &str,
    ) -> Result<Option<Issue>, CoreError> {
        let slot = {
            let mut cache = self.cache.lock();
            Arc::clone(
                cache
                    .entry((config.clone(), issue_id.to_string()))
                    .or_default(),
            )
        };

        let mut entry = slot.lock();
        if let Some(cached) = entry.as_ref() {
            return Ok(cached.issue().cloned());
        }

        debug!("Looking up issue {issue_id} in {} ({})", config.project(), tracker.name());
        let outcome = tracker.lookup(self, config, issue_id)?;
        let issue = outcome.issue().cloned();
        *entry = Some(outcome);
        Ok(issue)
    }

    /// Returns the cached result for a key, if the key was looked up.
    pub fn cached(&self, config: &TrackerConfig, issue_id: &str) -> Option<Option<Issue>> {
        let slot = {
            let cache = self.cache.lock();
            cache.get(&(config.clone(), issue_id.to_string())).cloned()
        }?;
        let entry = slot.lock();
        entry.as_ref().map(|outcome| outcome.issue().cloned())
    }

    /// Returns all finished lookups, sorted by project and id.
    pub fn entries(&self) -> Vec<(CacheKey, Option<Issue>)> {
        self.outcomes()
            .into_iter()
            .map(|(key, outcome)| (key, outcome.into_issue()))
            .collect()
    }

    fn outcomes(&self) -> Vec<(CacheKey, Lookup)> {
        let slots: Vec<(CacheKey, Slot)> = self
            .cache
            .lock()
            .iter()
            .map(|(key, slot)| (key.clone(), Arc::clone(slot)))
            .collect();

        let mut entries: Vec<_> = slots
            .into_iter()
            .filter_map(|(key, slot)| {
                let entry = slot.lock();
                entry.clone().map(|outcome| (key, outcome))
            })
            .collect();
        entries.sort_by(|(a, _), (b, _)| {
            (a.0.project(), a.0.url(), &a.1).cmp(&(b.0.project(), b.0.url(), &b.1))
        });
        entries
    }

    /// Returns the number of finished lookups.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Returns true if nothing was looked up yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Loads a persisted environment, or returns an empty one if `path`
    /// does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let env = Self::new();

        if !path.exists() {
            debug!("No cache file found at {}", path.display());
            return Ok(env);
        }

        let content = fs::read_to_string(path)?;
        let file: CacheFile = serde_json::from_str(&content)
            .map_err(|e| CoreError::cache(format!("{}: {}", path.display(), e)))?;
        if file.version != CACHE_FORMAT_VERSION {
            return Err(CoreError::cache(format!(
                "{}: unsupported cache version {}",
                path.display(),
                file.version
            )));
        }

        info!("Loaded {} cached issues", file.issues.len());
        {
            let mut cache = env.cache.lock();
            for record in file.issues {
                cache.insert(
                    (record.tracker, record.id),
                    Arc::new(Mutex::new(Some(Lookup::from(record.issue)))),
                );
            }
        }
        *env.rate_limits.lock() = file.rate_limits;

        Ok(env)
    }

    /// Saves the finished lookups and rate-limit markers to `path`.
    ///
    /// Lookups that failed for a transient reason are left out.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let issues: Vec<CacheRecord> = self
            .outcomes()
            .into_iter()
            .filter(|(_, outcome)| !outcome.is_transient())
            .map(|((tracker, id), outcome)| CacheRecord {
                tracker,
                id,
                issue: outcome.into_issue(),
            })
            .collect();
        let file = CacheFile {
            version: CACHE_FORMAT_VERSION,
            issues,
            rate_limits: self.rate_limits.lock().clone(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| CoreError::cache(e.to_string()))?;
        fs::write(path, json)?;

        info!(
            "Saved {} cached issues to {}",
            file.issues.len(),
            path.display()
        );
        Ok(())
    }
}

impl Default for BuildEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BuildEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildEnvironment")
            .field("cache", &self.cache.lock().len())
            .field("rate_limits", &*self.rate_limits.lock())
            .finish()
    }
}

impl TrackerState for BuildEnvironment {
    fn now(&self) -> f64 {
        (self.clock)()
    }

    fn rate_limit(&self, tracker: &str) -> Option<RateLimit> {
        self.rate_limits.lock().get(tracker).copied()
    }

    fn set_rate_limit(&self, tracker: &str, limit: Option<RateLimit>) {
        let mut limits = self.rate_limits.lock();
        match limit {
            Some(limit) => {
                limits.insert(tracker.to_string(), limit);
            }
            None => {
                limits.remove(tracker);
            }
        }
    }
}
