//! tracker::factory
//!
//! Tracker construction.
//!
//! Commands and the provider use [`create_tracker`] instead of naming
//! concrete client types, keeping the service boundary at the trait.

use std::sync::Arc;

use tracing::debug;

use super::jira::JiraTracker;
use super::traits::Tracker;
use crate::core::config::TrackerConfig;

/// Build a shared tracker handle from resolved configuration.
///
/// Logs the connection details at debug level (never the password).
pub fn create_tracker(config: &TrackerConfig) -> Arc<dyn Tracker> {
    debug!(url = %config.url, project = %config.project, username = ?config.username,
        "tracker connection");
    Arc::new(JiraTracker::from_config(config))
}
