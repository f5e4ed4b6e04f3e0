//! DOE Runner
//!
//! Drives a parametric (DOE) job on the Rescale platform from upload to stop.
//!
//! Architecture:
//! - Configuration: Load settings from environment or defaults
//! - Repository: Reads and writes on the platform while a job is monitored
//! - Scheduler: Poll sessions with step interval, timeout and cancellation
//! - Services: Job monitoring, run summary reporting, the end-to-end workflow

pub mod config;
pub mod repository;
pub mod scheduler;
pub mod service;
