//! Numerical building blocks.
//!
//! - [`solvers`]: direct linear solvers (tridiagonal / Thomas algorithm)

pub mod solvers;
