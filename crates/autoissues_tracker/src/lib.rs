//! # autoissues_tracker
//!
//! Issue tracker backends.
//!
//! A backend implements [`IssueTracker`]: given a [`TrackerConfig`] and an
//! issue id it returns a [`Lookup`]: the [`Issue`], a "not found", or an
//! "unavailable" for transient failures. Backends are registered by name in a
//! [`TrackerRegistry`].
//!
//! Build-scoped state a backend needs between lookups (the rate-limit
//! marker) is reached through the [`TrackerState`] trait, implemented by the
//! build environment.

mod error;
pub mod github;
pub mod http_client;
mod registry;
mod state;
mod tracker;
mod types;

pub use error::TrackerError;
pub use github::GitHubTracker;
pub use registry::TrackerRegistry;
pub use state::{InMemoryState, RATE_LIMIT_WINDOW_SECS, RateLimit, TrackerState, unix_now};
pub use tracker::IssueTracker;
pub use types::{Issue, Lookup, TrackerConfig};
