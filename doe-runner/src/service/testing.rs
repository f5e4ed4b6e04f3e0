//! Scripted repository for service tests

use anyhow::Result;
use async_trait::async_trait;
use doe_core::domain::run::{RunRecord, RunSnapshot};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::repository::JobRepository;

/// Replays scripted responses; the last response of each script repeats
#[derive(Default)]
pub(crate) struct ScriptedRepository {
    statuses: Mutex<VecDeque<Option<String>>>,
    runs: Mutex<VecDeque<std::result::Result<RunSnapshot, String>>>,
    status_calls: AtomicU32,
    runs_calls: AtomicU32,
    stops: AtomicU32,
    stop_error: Option<String>,
}

impl ScriptedRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_statuses(self, statuses: &[&str]) -> Self {
        *self.statuses.lock().unwrap() = statuses.iter().map(|s| Some(s.to_string())).collect();
        self
    }

    pub(crate) fn with_runs(self, runs: Vec<std::result::Result<RunSnapshot, String>>) -> Self {
        *self.runs.lock().unwrap() = runs.into();
        self
    }

    pub(crate) fn with_stop_error(mut self, message: &str) -> Self {
        self.stop_error = Some(message.to_string());
        self
    }

    pub(crate) fn status_calls(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn runs_calls(&self) -> u32 {
        self.runs_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn stops(&self) -> u32 {
        self.stops.load(Ordering::SeqCst)
    }
}

fn next<T: Clone>(queue: &Mutex<VecDeque<T>>) -> Option<T> {
    let mut queue = queue.lock().unwrap();
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

/// Snapshot with `completed` finished runs out of `expected`
pub(crate) fn snapshot(expected: u64, completed: usize) -> RunSnapshot {
    let now = chrono::Utc::now();
    let results = (0..completed)
        .map(|_| RunRecord::new(Some(now), Some(now)))
        .collect();
    RunSnapshot::new(expected, results)
}

#[async_trait]
impl JobRepository for ScriptedRepository {
    async fn fetch_status(&self, _job_id: &str) -> Result<Option<String>> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        Ok(next(&self.statuses).flatten())
    }

    async fn fetch_runs(&self, _job_id: &str) -> Result<RunSnapshot> {
        self.runs_calls.fetch_add(1, Ordering::SeqCst);
        match next(&self.runs) {
            Some(Ok(snapshot)) => Ok(snapshot),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => Ok(RunSnapshot::default()),
        }
    }

    async fn stop_job(&self, _job_id: &str) -> Result<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        match &self.stop_error {
            Some(message) => Err(anyhow::anyhow!(message.clone())),
            None => Ok(()),
        }
    }
}
