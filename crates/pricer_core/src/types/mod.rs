//! Core error types.
//!
//! This module provides:
//! - `error`: Structured error types for linear-solver operations
//!
//! [`LinearSolverError`] is re-exported at this module level.

pub mod error;

pub use error::LinearSolverError;
