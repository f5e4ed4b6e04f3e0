//! Core domain types
//!
//! This module contains the platform entities the DOE workflow reads back
//! from the Rescale API. They are shared between the runner (which drives a
//! job to completion) and the CLI (which inspects jobs ad hoc).

pub mod file;
pub mod job;
pub mod run;
pub mod user;
