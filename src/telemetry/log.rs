//! Session statistics for the presswatch agent.
//!
//! The classify loop reports trace points here (windows finalized, holds,
//! dispatch outcomes); the counters can be persisted across sessions and
//! surfaced by `presswatch status`. The core never writes here directly;
//! it only returns classified events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Trace counters for the current session.
#[derive(Debug)]
pub struct SessionLog {
    /// Press windows finalized into a short-press event
    windows_finalized: AtomicU64,
    /// Hold escalations
    holds_detected: AtomicU64,
    /// Actions invoked successfully
    actions_dispatched: AtomicU64,
    /// Actions that failed or were unbound
    dispatch_failures: AtomicU64,
    /// Session identifier
    session_id: Uuid,
    /// Session start time
    session_start: DateTime<Utc>,
    /// Path for persisting stats
    persist_path: Option<PathBuf>,
}

impl SessionLog {
    /// Create a new session log.
    pub fn new() -> Self {
        Self {
            windows_finalized: AtomicU64::new(0),
            holds_detected: AtomicU64::new(0),
            actions_dispatched: AtomicU64::new(0),
            dispatch_failures: AtomicU64::new(0),
            session_id: Uuid::new_v4(),
            session_start: Utc::now(),
            persist_path: None,
        }
    }

    /// Create a session log with persistence.
    pub fn with_persistence(path: PathBuf) -> Self {
        let mut log = Self::new();
        log.persist_path = Some(path);

        // Try to load existing stats
        if let Err(e) = log.load() {
            eprintln!("Note: Could not load previous telemetry stats: {e}");
        }

        log
    }

    /// Record a finalized short-press window.
    pub fn record_window_finalized(&self) {
        self.windows_finalized.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a hold escalation.
    pub fn record_hold(&self) {
        self.holds_detected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful dispatch.
    pub fn record_dispatch(&self) {
        self.actions_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed or unbound dispatch.
    pub fn record_dispatch_failure(&self) {
        self.dispatch_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current statistics.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            windows_finalized: self.windows_finalized.load(Ordering::Relaxed),
            holds_detected: self.holds_detected.load(Ordering::Relaxed),
            actions_dispatched: self.actions_dispatched.load(Ordering::Relaxed),
            dispatch_failures: self.dispatch_failures.load(Ordering::Relaxed),
            session_id: self.session_id,
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds() as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "Session Statistics:\n\
             - Press windows finalized: {}\n\
             - Holds detected: {}\n\
             - Actions dispatched: {}\n\
             - Dispatch failures: {}\n\
             - Session duration: {} seconds",
            stats.windows_finalized,
            stats.holds_detected,
            stats.actions_dispatched,
            stats.dispatch_failures,
            stats.session_duration_secs
        )
    }

    /// Save stats to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            // Ensure parent directory exists
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let stats = self.stats();
            let persisted = PersistedStats {
                windows_finalized: stats.windows_finalized,
                holds_detected: stats.holds_detected,
                actions_dispatched: stats.actions_dispatched,
                dispatch_failures: stats.dispatch_failures,
                last_updated: Utc::now(),
            };

            let json = serde_json::to_string_pretty(&persisted)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

            std::fs::write(path, json)?;
        }
        Ok(())
    }

    /// Load stats from disk.
    fn load(&mut self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let persisted: PersistedStats = serde_json::from_str(&content)
                    .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

                self.windows_finalized
                    .store(persisted.windows_finalized, Ordering::Relaxed);
                self.holds_detected
                    .store(persisted.holds_detected, Ordering::Relaxed);
                self.actions_dispatched
                    .store(persisted.actions_dispatched, Ordering::Relaxed);
                self.dispatch_failures
                    .store(persisted.dispatch_failures, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.windows_finalized.store(0, Ordering::Relaxed);
        self.holds_detected.store(0, Ordering::Relaxed);
        self.actions_dispatched.store(0, Ordering::Relaxed);
        self.dispatch_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of session statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    pub windows_finalized: u64,
    pub holds_detected: u64,
    pub actions_dispatched: u64,
    pub dispatch_failures: u64,
    pub session_id: Uuid,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

/// Stats format for persistence.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedStats {
    windows_finalized: u64,
    holds_detected: u64,
    actions_dispatched: u64,
    dispatch_failures: u64,
    last_updated: DateTime<Utc>,
}

/// Thread-safe shared session log.
pub type SharedSessionLog = Arc<SessionLog>;

/// Create a new shared session log.
pub fn create_shared_log() -> SharedSessionLog {
    Arc::new(SessionLog::new())
}

/// Create a new shared session log with persistence.
pub fn create_shared_log_with_persistence(path: PathBuf) -> SharedSessionLog {
    Arc::new(SessionLog::with_persistence(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_log_counting() {
        let log = SessionLog::new();

        log.record_window_finalized();
        log.record_window_finalized();
        log.record_hold();
        log.record_dispatch();
        log.record_dispatch_failure();

        let stats = log.stats();
        assert_eq!(stats.windows_finalized, 2);
        assert_eq!(stats.holds_detected, 1);
        assert_eq!(stats.actions_dispatched, 1);
        assert_eq!(stats.dispatch_failures, 1);
    }

    #[test]
    fn test_session_log_reset() {
        let log = SessionLog::new();

        log.record_window_finalized();
        log.record_dispatch();
        log.reset();

        let stats = log.stats();
        assert_eq!(stats.windows_finalized, 0);
        assert_eq!(stats.actions_dispatched, 0);
    }

    #[test]
    fn test_persistence_roundtrip() {
        let path = std::env::temp_dir().join(format!("presswatch-telemetry-{}.json", Uuid::new_v4()));

        let log = SessionLog::with_persistence(path.clone());
        log.record_window_finalized();
        log.record_hold();
        log.record_dispatch();
        log.save().expect("save");

        let reloaded = SessionLog::with_persistence(path.clone());
        let stats = reloaded.stats();
        assert_eq!(stats.windows_finalized, 1);
        assert_eq!(stats.holds_detected, 1);
        assert_eq!(stats.actions_dispatched, 1);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_summary_format() {
        let log = SessionLog::new();
        let summary = log.summary();

        assert!(summary.contains("Press windows finalized"));
        assert!(summary.contains("Holds detected"));
        assert!(summary.contains("Dispatch failures"));
    }
}
