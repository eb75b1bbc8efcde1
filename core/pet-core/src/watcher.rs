//! Polling watcher for the current-event file.
//!
//! The hook script overwrites `current-event.json` on every signal. There is no
//! push channel, so the watcher compares the file's modification time every
//! [`POLL_INTERVAL`] and decodes the file when it moved strictly forward.
//!
//! Writes landing within one poll interval coalesce: only the latest content is
//! seen. That is fine because the pet reacts to the latest event, not to a log.
//! Unreadable or undecodable content (e.g. observed mid-write) is dropped and
//! polling continues.

use fs_err as fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::event::ActivityEvent;
use crate::state::POLL_INTERVAL;

/// Synchronous half of the watcher: one file plus the last modification time seen.
#[derive(Debug)]
pub struct EventSource {
    path: PathBuf,
    last_modified: Option<SystemTime>,
}

impl EventSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        EventSource {
            path: path.into(),
            last_modified: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn last_modified(&self) -> Option<SystemTime> {
        self.last_modified
    }

    /// Remembers the current modification time so an event already on disk is never delivered.
    pub fn record_baseline(&mut self) {
        self.last_modified = modified_time(&self.path);
    }

    /// Returns the event behind a strictly newer modification time, if it decodes.
    pub fn check(&mut self) -> Option<ActivityEvent> {
        let current = modified_time(&self.path)?;

        if let Some(last) = self.last_modified {
            if current <= last {
                return None;
            }
        }

        self.last_modified = Some(current);
        read_event(&self.path)
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

fn read_event(path: &Path) -> Option<ActivityEvent> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(err) => {
            debug!(error = %err, "Could not read event file");
            return None;
        }
    };

    match serde_json::from_slice::<ActivityEvent>(&data) {
        Ok(event) => {
            debug!(
                event = %event.kind,
                tool = event.tool.as_deref().unwrap_or("-"),
                session = event.session_id.as_deref().unwrap_or("-"),
                "Decoded event"
            );
            Some(event)
        }
        Err(err) => {
            debug!(error = %err, "Dropping undecodable event");
            None
        }
    }
}

/// Runs an [`EventSource`] on a tokio interval and hands each new event to a handler.
///
/// Must be started from within a tokio runtime.
#[derive(Debug)]
pub struct EventWatcher {
    path: PathBuf,
    task: Option<JoinHandle<()>>,
}

impl EventWatcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        EventWatcher {
            path: path.into(),
            task: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Starts polling. Does nothing if this watcher is already running.
    pub fn start<F>(&mut self, mut handler: F)
    where
        F: FnMut(ActivityEvent) + Send + 'static,
    {
        if self.task.is_some() {
            debug!(path = %self.path.display(), "Event watcher already running");
            return;
        }

        ensure_parent_dir(&self.path);

        // Baseline before the first tick so a stale event is never replayed.
        let mut source = EventSource::new(self.path.clone());
        source.record_baseline();
        info!(
            path = %self.path.display(),
            exists = self.path.exists(),
            baseline = ?source.last_modified(),
            "Starting event watcher"
        );

        self.task = Some(tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + POLL_INTERVAL, POLL_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Some(event) = source.check() {
                    handler(event);
                }
            }
        }));
    }

    /// Cancels the poll schedule. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!(path = %self.path.display(), "Stopped event watcher");
        }
    }
}

impl Drop for EventWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

fn ensure_parent_dir(path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            debug!(error = %err, "Could not create event directory");
        }
    }
}
