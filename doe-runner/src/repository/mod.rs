//! Repository layer
//!
//! Repositories are thin adapters over the Rescale client. They expose the
//! few reads and writes the scheduler needs while monitoring a job, without
//! any business logic.
//!
//! All repositories are trait-based to enable testing and mocking.

mod jobs;

// Re-export traits
pub use jobs::JobRepository;

// Re-export implementations
pub use jobs::HttpJobRepository;
