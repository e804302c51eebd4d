//! # pricer_core: Numerical Foundation for the Theta-Scheme Pricer
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace, providing:
//! - Direct tridiagonal linear solver (`math::solvers`)
//! - Solver error type: `LinearSolverError` (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::math::solvers::TridiagonalSolver;
//! use pricer_core::types::LinearSolverError;
//!
//! let mut solver = TridiagonalSolver::<f64>::with_defaults();
//! let x = solver
//!     .solve(&[0.0, 1.0], &[3.0, 3.0], &[1.0, 0.0], &[4.0, 4.0])
//!     .unwrap();
//! assert!((x[0] - 1.0).abs() < 1e-12);
//!
//! // Singular systems are reported, never silently divided through
//! let err = solver.solve(&[0.0], &[0.0], &[0.0], &[1.0]).unwrap_err();
//! assert!(matches!(err, LinearSolverError::SingularSystem { .. }));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for error types

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
