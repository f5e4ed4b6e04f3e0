//! Run domain types and run accounting
//!
//! A DOE job fans out into many runs. The platform lists them as run records
//! carrying optional start/completion timestamps; everything the workflow
//! knows about progress is derived from those two fields.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One execution unit of a parametric job, as listed by `jobs/{id}/runs/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    /// Platform identifier, opaque to this crate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,

    #[serde(
        rename = "dateStarted",
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(
        rename = "dateCompleted",
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Lifecycle state of a run, derived from its timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunState {
    Pending,
    Running,
    Completed,
}

impl RunRecord {
    /// Creates a record from its two timestamps
    pub fn new(started_at: Option<DateTime<Utc>>, completed_at: Option<DateTime<Utc>>) -> Self {
        Self {
            id: None,
            started_at,
            completed_at,
        }
    }

    /// Classifies the record
    ///
    /// A completion without a start is not a valid lifecycle, so such a
    /// record is treated as not started.
    pub fn state(&self) -> RunState {
        match (self.started_at, self.completed_at) {
            (Some(_), Some(_)) => RunState::Completed,
            (Some(_), None) => RunState::Running,
            (None, _) => RunState::Pending,
        }
    }
}

/// Point-in-time listing of a job's runs
///
/// `expected_count` is the platform's total (`count` on the wire) and may be
/// larger than `results` when not every run has been listed yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    #[serde(rename = "count", default)]
    pub expected_count: u64,

    #[serde(default)]
    pub results: Vec<RunRecord>,
}

impl RunSnapshot {
    pub fn new(expected_count: u64, results: Vec<RunRecord>) -> Self {
        Self {
            expected_count,
            results,
        }
    }
}

/// Aggregate run counters for one snapshot
///
/// `pending_runs` is `expected_runs - completed_runs`, so runs that are
/// currently executing are also counted as pending. It goes negative when
/// the platform reports fewer expected runs than it lists as completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub expected_runs: u64,
    pub completed_runs: u64,
    pub executing_runs: u64,
    pub pending_runs: i64,
}

/// Classifies every record of `snapshot` and aggregates the counts
pub fn summarize(snapshot: &RunSnapshot) -> RunSummary {
    let mut completed_runs = 0u64;
    let mut executing_runs = 0u64;

    for run in &snapshot.results {
        match run.state() {
            RunState::Completed => completed_runs += 1,
            RunState::Running => executing_runs += 1,
            RunState::Pending => {}
        }
    }

    let expected_runs = snapshot.expected_count;

    RunSummary {
        expected_runs,
        completed_runs,
        executing_runs,
        pending_runs: expected_runs as i64 - completed_runs as i64,
    }
}

/// Accepts RFC 3339 or zone-less ISO timestamps; anything else reads as absent
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    let Some(serde_json::Value::String(raw)) = value else {
        return Ok(None);
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    Ok(NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed() -> RunRecord {
        RunRecord::new(Some(Utc::now()), Some(Utc::now()))
    }

    fn running() -> RunRecord {
        RunRecord::new(Some(Utc::now()), None)
    }

    fn pending() -> RunRecord {
        RunRecord::new(None, None)
    }

    fn snapshot_of(expected: u64, n_completed: usize, n_running: usize, n_pending: usize) -> RunSnapshot {
        let mut results = Vec::new();
        results.extend(std::iter::repeat_with(completed).take(n_completed));
        results.extend(std::iter::repeat_with(running).take(n_running));
        results.extend(std::iter::repeat_with(pending).take(n_pending));
        RunSnapshot::new(expected, results)
    }

    #[test]
    fn test_record_classification() {
        assert_eq!(pending().state(), RunState::Pending);
        assert_eq!(running().state(), RunState::Running);
        assert_eq!(completed().state(), RunState::Completed);
    }

    #[test]
    fn test_completion_without_start_is_pending() {
        let record = RunRecord::new(None, Some(Utc::now()));
        assert_eq!(record.state(), RunState::Pending);

        let summary = summarize(&RunSnapshot::new(1, vec![record]));
        assert_eq!(summary.completed_runs, 0);
        assert_eq!(summary.executing_runs, 0);
    }

    #[test]
    fn test_summarize_mixed_snapshot() {
        let summary = summarize(&snapshot_of(44, 10, 5, 29));

        assert_eq!(
            summary,
            RunSummary {
                expected_runs: 44,
                completed_runs: 10,
                executing_runs: 5,
                pending_runs: 34,
            }
        );
    }

    #[test]
    fn test_pending_counts_executing_runs() {
        let summary = summarize(&snapshot_of(10, 2, 3, 0));
        assert_eq!(summary.pending_runs, 8);
        assert_eq!(
            summary.pending_runs,
            summary.expected_runs as i64 - summary.completed_runs as i64
        );
    }

    #[test]
    fn test_expected_count_is_authoritative() {
        // Fewer listed than expected
        let summary = summarize(&snapshot_of(100, 3, 0, 0));
        assert_eq!(summary.expected_runs, 100);
        assert_eq!(summary.pending_runs, 97);

        // More completed than expected: not corrected
        let summary = summarize(&snapshot_of(2, 5, 0, 0));
        assert_eq!(summary.expected_runs, 2);
        assert_eq!(summary.completed_runs, 5);
        assert_eq!(summary.pending_runs, -3);
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let snapshot = snapshot_of(20, 4, 6, 10);
        assert_eq!(summarize(&snapshot), summarize(&snapshot));
    }

    #[test]
    fn test_empty_snapshot() {
        let summary = summarize(&RunSnapshot::default());
        assert_eq!(summary, RunSummary::default());
    }

    #[test]
    fn test_deserialize_runs_page() {
        let json = r#"{
            "count": 4,
            "next": null,
            "results": [
                {"id": 1, "dateStarted": "2024-05-01T10:00:00Z", "dateCompleted": "2024-05-01T10:30:00.123456Z"},
                {"id": 2, "dateStarted": "2024-05-01T10:05:00+00:00", "dateCompleted": null},
                {"id": 3, "dateStarted": null, "dateCompleted": null},
                {"id": 4}
            ]
        }"#;

        let snapshot: RunSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.expected_count, 4);
        assert_eq!(snapshot.results.len(), 4);

        let states: Vec<RunState> = snapshot.results.iter().map(RunRecord::state).collect();
        assert_eq!(
            states,
            vec![
                RunState::Completed,
                RunState::Running,
                RunState::Pending,
                RunState::Pending
            ]
        );
    }

    #[test]
    fn test_malformed_timestamps_degrade_to_absent() {
        let json = r#"{
            "count": 3,
            "results": [
                {"dateStarted": "yesterday", "dateCompleted": "today"},
                {"dateStarted": 12345},
                {"dateStarted": "2024-05-01T10:00:00", "dateCompleted": "not a date"}
            ]
        }"#;

        let snapshot: RunSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.results[0].state(), RunState::Pending);
        assert_eq!(snapshot.results[1].state(), RunState::Pending);
        assert_eq!(snapshot.results[2].state(), RunState::Running);
    }

    #[test]
    fn test_missing_fields_default() {
        let snapshot: RunSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot.expected_count, 0);
        assert!(snapshot.results.is_empty());
    }

    #[test]
    fn test_summary_serializes_with_named_counters() {
        let summary = summarize(&snapshot_of(3, 1, 1, 1));
        let value = serde_json::to_value(summary).unwrap();

        assert_eq!(value["expected_runs"], 3);
        assert_eq!(value["completed_runs"], 1);
        assert_eq!(value["executing_runs"], 1);
        assert_eq!(value["pending_runs"], 2);
    }
}
