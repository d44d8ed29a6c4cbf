//! Core error types for apifirst services
//!
//! This crate provides pure data types for error handling, with no dependencies
//! on HTTP frameworks. It includes:
//! - RFC 9457 Problem Details (`Problem`)
//! - Classification URIs (`ProblemTypes`)
//! - Recognized error bodies awaiting translation (`Fault`, `CandidateBody`)
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod catalog;
pub mod fault;
pub mod problem;

pub use catalog::{DEFAULT_BASE_URL, FaultKind, ProblemTypes};
pub use fault::{CandidateBody, Fault};
pub use problem::{APPLICATION_PROBLEM_JSON, Problem, UNKNOWN_INSTANCE};
