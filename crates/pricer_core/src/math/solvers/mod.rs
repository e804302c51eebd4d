//! Direct linear solvers for numerical computation.
//!
//! Finite-difference schemes reduce each implicit time step to a banded
//! linear system. This module provides the tridiagonal case.
//!
//! ## Available Solvers
//!
//! - [`TridiagonalSolver`]: Thomas algorithm with reusable scratch buffers
//! - [`solve_tridiagonal`]: One-shot convenience wrapper
//! - [`tridiagonal_mul`]: Tridiagonal matrix-vector product for residual checks
//!
//! ## Configuration
//!
//! [`TridiagonalConfig`] sets the pivot tolerance (default: 1e-15) below which
//! elimination is aborted with `LinearSolverError::SingularSystem`.
//!
//! ## Examples
//!
//! ```
//! use pricer_core::math::solvers::{solve_tridiagonal, tridiagonal_mul};
//!
//! let a: [f64; 4] = [0.0, -1.0, -1.0, -1.0];
//! let b = [4.0, 4.0, 4.0, 4.0];
//! let c = [-1.0, -1.0, -1.0, 0.0];
//! let x_true = [1.0, 2.0, 3.0, 4.0];
//!
//! let d = tridiagonal_mul(&a, &b, &c, &x_true).unwrap();
//! let x = solve_tridiagonal(&a, &b, &c, &d).unwrap();
//! assert!((x[3] - 4.0).abs() < 1e-12);
//! ```

mod config;
mod tridiagonal;

// Re-export public types at module level
pub use config::{TridiagonalConfig, DEFAULT_PIVOT_TOLERANCE};
pub use tridiagonal::{solve_tridiagonal, tridiagonal_mul, TridiagonalSolver};
