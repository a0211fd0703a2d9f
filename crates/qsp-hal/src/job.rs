//! Job identifiers and lifecycle.
//!
//! ```text
//!   Queued ──→ Running ──→ Completed | Failed(reason)
//!     │           │
//!     └───────────┴──────→ Cancelled
//! ```
//!
//! A job only moves forward along these arrows and never leaves a
//! terminal state. Results exist only for `Completed` jobs.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend-assigned job handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed(String),
    Cancelled,
}

impl JobStatus {
    /// Position along the lifecycle; every terminal state shares the last.
    fn stage(&self) -> u8 {
        match self {
            Self::Queued => 0,
            Self::Running => 1,
            Self::Completed | Self::Failed(_) | Self::Cancelled => 2,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.stage() == 2
    }

    pub fn is_pending(&self) -> bool {
        !self.is_terminal()
    }

    pub fn is_success(&self) -> bool {
        *self == Self::Completed
    }

    pub fn can_transition_to(&self, next: &JobStatus) -> bool {
        self.is_pending() && next.stage() > self.stage()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(reason) => write!(f, "Failed: {reason}"),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

/// Bookkeeping a backend keeps per submitted job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub shots: u32,
    pub backend: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    /// A freshly queued job.
    pub fn new(id: impl Into<JobId>, shots: u32) -> Self {
        Self {
            id: id.into(),
            status: JobStatus::Queued,
            shots,
            backend: None,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }

    #[must_use]
    pub fn with_backend(self, backend: impl Into<String>) -> Self {
        Self {
            backend: Some(backend.into()),
            ..self
        }
    }

    /// Advance to `status`, stamping start and finish times.
    ///
    /// Moves that go backward or leave a terminal state are dropped.
    #[must_use]
    pub fn with_status(mut self, status: JobStatus) -> Self {
        if self.status.can_transition_to(&status) {
            let now = Utc::now();
            if status == JobStatus::Running {
                self.started_at = self.started_at.or(Some(now));
            }
            if status.is_terminal() {
                self.finished_at = self.finished_at.or(Some(now));
            }
            self.status = status;
        }
        self
    }
}
