//! Job domain types

use serde::{Deserialize, Serialize};

/// Status label the platform reports once a job's runs are being scheduled
pub const EXECUTING: &str = "EXECUTING";

/// Job record as returned by `jobs/` and `jobs/{id}/`
///
/// Only the identifier is interpreted; everything else the platform returns
/// is kept verbatim for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One entry of a job's status history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusEntry {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub status_date: Option<String>,
    #[serde(default)]
    pub status_reason: Option<String>,
}

/// Status history page, most recent entry first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobStatusPage {
    #[serde(default)]
    pub results: Vec<JobStatusEntry>,
}

impl JobStatusEntry {
    /// Case-insensitive comparison against a platform status label
    pub fn is(&self, label: &str) -> bool {
        self.status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case(label))
    }
}

impl JobStatusPage {
    /// Returns the most recent status entry, if any
    pub fn latest(&self) -> Option<&JobStatusEntry> {
        self.results.first()
    }

    /// Returns the most recent status label, if any
    pub fn latest_status(&self) -> Option<&str> {
        self.latest().and_then(|entry| entry.status.as_deref())
    }

    /// Whether the job has reached the executing state
    pub fn is_executing(&self) -> bool {
        self.latest().is_some_and(|entry| entry.is(EXECUTING))
    }
}
