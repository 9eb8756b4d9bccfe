//! Handle for the background crawl task

use crate::collector::{CollectorService, RunSummary};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Observable lifecycle of the background crawl
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum CrawlStatus {
    Idle,
    Running { started_at: DateTime<Utc> },
    Completed {
        summary: RunSummary,
        finished_at: DateTime<Utc>,
    },
}

/// Status and cancellation for at most one crawl at a time
///
/// The trigger endpoint starts a run through this handle instead of
/// detaching an unobservable task; callers can poll progress and request a
/// cooperative stop.
pub struct CrawlTask {
    status: Mutex<CrawlStatus>,
    cancel: Arc<AtomicBool>,
}

impl CrawlTask {
    pub fn new() -> Self {
        Self {
            status: Mutex::new(CrawlStatus::Idle),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Spawns a collection run unless one is already in flight.
    /// Returns false when a run is active.
    pub fn start(self: &Arc<Self>, service: Arc<CollectorService>) -> bool {
        {
            let mut status = self.status.lock().unwrap();
            if matches!(*status, CrawlStatus::Running { .. }) {
                return false;
            }
            *status = CrawlStatus::Running {
                started_at: Utc::now(),
            };
        }
        self.cancel.store(false, Ordering::Relaxed);

        let task = Arc::clone(self);
        tokio::spawn(async move {
            let summary = service.collect_all(&task.cancel).await;
            let mut status = task.status.lock().unwrap();
            *status = CrawlStatus::Completed {
                summary,
                finished_at: Utc::now(),
            };
        });
        true
    }

    /// Raises the cancellation flag; the running crawl stops at its next
    /// loop boundary
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn status(&self) -> CrawlStatus {
        self.status.lock().unwrap().clone()
    }
}

impl Default for CrawlTask {
    fn default() -> Self {
        Self::new()
    }
}
