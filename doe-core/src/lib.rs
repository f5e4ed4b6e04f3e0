//! DOE Core
//!
//! Core types and pure logic for driving parametric (DOE) jobs on the
//! Rescale platform.
//!
//! This crate contains:
//! - Domain types: jobs, runs, uploaded files, and run accounting
//! - DTOs: request payloads such as the job definition
//! - Extraction: scraping scalar results out of solver logs

pub mod domain;
pub mod dto;
pub mod extract;
