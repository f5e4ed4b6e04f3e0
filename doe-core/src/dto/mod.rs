//! Data Transfer Objects sent to the platform
//!
//! Request payloads are typed here so the client and the runner never build
//! JSON by hand.

pub mod job;
