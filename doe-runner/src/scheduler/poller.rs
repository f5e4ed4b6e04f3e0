//! Poll sessions
//!
//! A session is one bounded fetch/check/wait loop:
//! - fetch a fresh value through the caller's fetch function
//! - stop with `Succeeded` as soon as the predicate holds
//! - stop with `TimedOut` once the wall-clock timeout since the session
//!   started has elapsed
//! - otherwise sleep for the step interval and try again
//!
//! A fetch error ends the session in `Failed` without retrying. Raising the
//! session's cancellation token ends it in `Cancelled`, interrupting both the
//! wait and an in-flight fetch.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Timing of a poll session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Idle time between two fetches
    pub step_interval: Duration,
    /// Wall-clock budget measured from the start of the session
    pub timeout: Duration,
}

impl PollConfig {
    pub fn new(step_interval: Duration, timeout: Duration) -> Self {
        Self {
            step_interval,
            timeout,
        }
    }
}

/// Lifecycle of a poll session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Running,
    Succeeded,
    TimedOut,
    Failed,
    Cancelled,
}

impl PollState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, PollState::Running)
    }
}

/// Terminal result of a poll session
///
/// `attempts` counts completed fetches, including a failed one.
#[derive(Debug)]
pub enum PollOutcome<T, E> {
    /// The predicate held for `value`
    Succeeded { value: T, attempts: u32 },
    /// The timeout elapsed; `last` is the value of the final check
    TimedOut {
        last: T,
        attempts: u32,
        elapsed: Duration,
    },
    /// The cancellation token was raised
    Cancelled { last: Option<T>, attempts: u32 },
    /// A fetch failed
    Failed {
        error: E,
        last: Option<T>,
        attempts: u32,
    },
}

impl<T, E> PollOutcome<T, E> {
    pub fn state(&self) -> PollState {
        match self {
            PollOutcome::Succeeded { .. } => PollState::Succeeded,
            PollOutcome::TimedOut { .. } => PollState::TimedOut,
            PollOutcome::Cancelled { .. } => PollState::Cancelled,
            PollOutcome::Failed { .. } => PollState::Failed,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Succeeded { attempts, .. }
            | PollOutcome::TimedOut { attempts, .. }
            | PollOutcome::Cancelled { attempts, .. }
            | PollOutcome::Failed { attempts, .. } => *attempts,
        }
    }

    /// Most recent successfully fetched value, if any
    pub fn last(&self) -> Option<&T> {
        match self {
            PollOutcome::Succeeded { value, .. } => Some(value),
            PollOutcome::TimedOut { last, .. } => Some(last),
            PollOutcome::Cancelled { last, .. } | PollOutcome::Failed { last, .. } => last.as_ref(),
        }
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, PollOutcome::Succeeded { .. })
    }

    /// Maps the fetched values, keeping the terminal state
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> PollOutcome<U, E> {
        match self {
            PollOutcome::Succeeded { value, attempts } => PollOutcome::Succeeded {
                value: f(value),
                attempts,
            },
            PollOutcome::TimedOut {
                last,
                attempts,
                elapsed,
            } => PollOutcome::TimedOut {
                last: f(last),
                attempts,
                elapsed,
            },
            PollOutcome::Cancelled { last, attempts } => PollOutcome::Cancelled {
                last: last.map(f),
                attempts,
            },
            PollOutcome::Failed {
                error,
                last,
                attempts,
            } => PollOutcome::Failed {
                error,
                last: last.map(f),
                attempts,
            },
        }
    }
}

/// One polling session
///
/// Sessions share nothing, so independent sessions may run concurrently.
/// Running a session consumes it; polling again means building a new one.
pub struct PollSession {
    name: String,
    config: PollConfig,
    cancel: CancellationToken,
}

impl PollSession {
    /// Creates a session with its own, never-raised cancellation token
    ///
    /// # Arguments
    /// * `name` - Label used in log lines
    /// * `config` - Step interval and timeout
    pub fn new(name: impl Into<String>, config: PollConfig) -> Self {
        Self {
            name: name.into(),
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Ends the session early when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Runs the session to a terminal state
    ///
    /// The first fetch happens immediately. After an unsatisfied check the
    /// session sleeps for the step interval, capped at the time left before
    /// the timeout, so the last check lands on the deadline.
    ///
    /// # Arguments
    /// * `fetch` - Produces a fresh value per attempt
    /// * `predicate` - Decides whether a value ends the session successfully
    pub async fn run<T, E, F, Fut, P>(self, mut fetch: F, mut predicate: P) -> PollOutcome<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: FnMut(&T) -> bool,
        E: Display,
    {
        let started = Instant::now();
        let mut attempts = 0u32;
        let mut last: Option<T> = None;

        debug!(
            "Poll session '{}' started (step: {:?}, timeout: {:?})",
            self.name, self.config.step_interval, self.config.timeout
        );

        loop {
            let fetched = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                result = fetch() => Some(result),
            };

            let Some(fetched) = fetched else {
                info!("Poll session '{}' cancelled during fetch", self.name);
                return PollOutcome::Cancelled { last, attempts };
            };
            attempts += 1;

            let value = match fetched {
                Ok(value) => value,
                Err(error) => {
                    warn!(
                        "Poll session '{}' failed on attempt {}: {}",
                        self.name, attempts, error
                    );
                    return PollOutcome::Failed {
                        error,
                        last,
                        attempts,
                    };
                }
            };

            if predicate(&value) {
                info!(
                    "Poll session '{}' succeeded after {} attempt(s)",
                    self.name, attempts
                );
                return PollOutcome::Succeeded { value, attempts };
            }

            let elapsed = started.elapsed();
            if elapsed >= self.config.timeout {
                warn!(
                    "Poll session '{}' timed out after {:?} ({} attempt(s))",
                    self.name, elapsed, attempts
                );
                return PollOutcome::TimedOut {
                    last: value,
                    attempts,
                    elapsed,
                };
            }
            last = Some(value);

            let wait = self.config.step_interval.min(self.config.timeout - elapsed);
            debug!(
                "Poll session '{}': condition not met (attempt {}), next check in {:?}",
                self.name, attempts, wait
            );

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    info!("Poll session '{}' cancelled while waiting", self.name);
                    return PollOutcome::Cancelled { last, attempts };
                }
                _ = time::sleep(wait) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn config(step_secs: u64, timeout_secs: u64) -> PollConfig {
        PollConfig::new(
            Duration::from_secs(step_secs),
            Duration::from_secs(timeout_secs),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_first_check_without_waiting() {
        let started = Instant::now();

        let outcome: PollOutcome<u64, String> = PollSession::new("first", config(30, 3600))
            .run(|| async { Ok(1848u64) }, |completed| *completed >= 1848)
            .await;

        assert!(outcome.is_succeeded());
        assert_eq!(outcome.attempts(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_a_few_steps() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let started = Instant::now();

        let outcome: PollOutcome<u32, String> = PollSession::new("steps", config(10, 100))
            .run(
                move || {
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    async move { Ok(n) }
                },
                |n| *n == 3,
            )
            .await;

        match outcome {
            PollOutcome::Succeeded { value, attempts } => {
                assert_eq!(value, 3);
                assert_eq!(attempts, 3);
            }
            other => panic!("expected Succeeded, got {:?}", other),
        }
        assert_eq!(started.elapsed(), Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_on_the_deadline() {
        let check_times = Arc::new(std::sync::Mutex::new(Vec::new()));
        let recorder = Arc::clone(&check_times);
        let started = Instant::now();

        let outcome: PollOutcome<u64, String> = PollSession::new("timeout", config(30, 90))
            .run(
                move || {
                    recorder.lock().unwrap().push(started.elapsed());
                    async { Ok(0u64) }
                },
                |completed| *completed >= 1848,
            )
            .await;

        assert_eq!(outcome.state(), PollState::TimedOut);
        assert_eq!(outcome.attempts(), 4);
        assert_eq!(outcome.last(), Some(&0));
        assert_eq!(
            *check_times.lock().unwrap(),
            vec![
                Duration::from_secs(0),
                Duration::from_secs(30),
                Duration::from_secs(60),
                Duration::from_secs(90),
            ]
        );
        assert_eq!(started.elapsed(), Duration::from_secs(90));
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_wait_is_capped_at_deadline() {
        let started = Instant::now();

        let outcome: PollOutcome<(), String> = PollSession::new("capped", config(30, 100))
            .run(|| async { Ok(()) }, |_| false)
            .await;

        // Checks at 0, 30, 60, 90 and 100
        assert_eq!(outcome.attempts(), 5);
        assert_eq!(started.elapsed(), Duration::from_secs(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_error_fails_without_retry() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let outcome: PollOutcome<u32, String> = PollSession::new("failing", config(30, 3600))
            .run(
                move || {
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    async move {
                        if n == 2 {
                            Err("connection reset".to_string())
                        } else {
                            Ok(n)
                        }
                    }
                },
                |_| false,
            )
            .await;

        match outcome {
            PollOutcome::Failed {
                error,
                last,
                attempts,
            } => {
                assert_eq!(error, "connection reset");
                assert_eq!(last, Some(1));
                assert_eq!(attempts, 2);
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_interrupts_wait() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_secs(5)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let outcome: PollOutcome<u32, String> = PollSession::new("cancel", config(30, 3600))
            .with_cancellation(token)
            .run(|| async { Ok(7u32) }, |_| false)
            .await;

        match outcome {
            PollOutcome::Cancelled { last, attempts } => {
                assert_eq!(last, Some(7));
                assert_eq!(attempts, 1);
            }
            other => panic!("expected Cancelled, got {:?}", other),
        }
        assert_eq!(started.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_interrupts_fetch() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let outcome: PollOutcome<u32, String> = PollSession::new("slow-fetch", config(30, 3600))
            .with_cancellation(token)
            .run(
                || async {
                    time::sleep(Duration::from_secs(60)).await;
                    Ok(1u32)
                },
                |_| true,
            )
            .await;

        assert_eq!(outcome.state(), PollState::Cancelled);
        assert_eq!(outcome.attempts(), 0);
        assert!(outcome.last().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_cancelled_token_never_completes_fetch() {
        let token = CancellationToken::new();
        token.cancel();

        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let outcome: PollOutcome<u32, String> = PollSession::new("pre-cancelled", config(30, 90))
            .with_cancellation(token)
            .run(
                move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    async { Ok(1u32) }
                },
                |_| true,
            )
            .await;

        assert_eq!(outcome.state(), PollState::Cancelled);
        // select! builds the fetch future before checking the token, but never polls it
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(outcome.attempts(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_independent_sessions_run_concurrently() {
        let started = Instant::now();

        let fast = PollSession::new("fast", config(10, 100));
        let slow = PollSession::new("slow", config(10, 30));

        let fast_calls = Arc::new(AtomicU32::new(0));
        let fast_counter = Arc::clone(&fast_calls);

        let (fast_outcome, slow_outcome): (PollOutcome<u32, String>, PollOutcome<u32, String>) = tokio::join!(
            fast.run(
                move || {
                    let n = fast_counter.fetch_add(1, Ordering::SeqCst) + 1;
                    async move { Ok(n) }
                },
                |n| *n >= 2,
            ),
            slow.run(|| async { Ok(0u32) }, |_| false),
        );

        assert!(fast_outcome.is_succeeded());
        assert_eq!(fast_outcome.attempts(), 2);
        assert_eq!(slow_outcome.state(), PollState::TimedOut);
        assert_eq!(slow_outcome.attempts(), 4);
        assert_eq!(started.elapsed(), Duration::from_secs(30));
    }

    #[test]
    fn test_terminal_states() {
        assert!(!PollState::Running.is_terminal());
        assert!(PollState::Succeeded.is_terminal());
        assert!(PollState::TimedOut.is_terminal());
        assert!(PollState::Failed.is_terminal());
        assert!(PollState::Cancelled.is_terminal());
    }

    #[test]
    fn test_outcome_map_keeps_state() {
        let outcome: PollOutcome<u32, String> = PollOutcome::TimedOut {
            last: 2,
            attempts: 3,
            elapsed: Duration::from_secs(9),
        };

        let mapped = outcome.map(|n| n * 10);
        assert_eq!(mapped.state(), PollState::TimedOut);
        assert_eq!(mapped.last(), Some(&20));
        assert_eq!(mapped.attempts(), 3);
    }
}
