//! Scheduler layer for the runner
//!
//! This layer owns the timing of the workflow: a poll session repeatedly
//! fetches fresh state from the platform and decides when to stop waiting.
//! It knows nothing about jobs or runs; callers supply the fetch and the
//! stopping predicate.

pub mod poller;

pub use poller::{PollConfig, PollOutcome, PollSession, PollState};
