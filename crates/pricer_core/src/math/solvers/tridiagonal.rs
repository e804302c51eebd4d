//! Direct tridiagonal solver (Thomas algorithm).

use super::TridiagonalConfig;
use crate::types::LinearSolverError;
use num_traits::Float;

/// Thomas-algorithm solver for tridiagonal systems.
///
/// Solves `a[i]·x[i-1] + b[i]·x[i] + c[i]·x[i+1] = d[i]` for `i = 0..n`,
/// where `a[0]` and `c[n-1]` are ignored. Forward elimination followed by back
/// substitution, O(n) time and O(n) scratch space.
///
/// The solver owns its scratch buffers (`c'`, `d'`) and reuses them across
/// calls, so a time-marching loop that solves same-sized systems repeatedly
/// allocates only once.
///
/// Elimination is only numerically stable for well-conditioned (typically
/// diagonally dominant) matrices. Near-zero pivots are never divided by; they
/// abort the solve with [`LinearSolverError::SingularSystem`].
///
/// # Type Parameters
///
/// * `T` - Floating-point type (e.g., `f64`)
///
/// # Example
///
/// ```
/// use pricer_core::math::solvers::TridiagonalSolver;
///
/// // [ 2 -1  0] [x0]   [1]
/// // [-1  2 -1] [x1] = [0]
/// // [ 0 -1  2] [x2]   [1]
/// let a: [f64; 3] = [0.0, -1.0, -1.0];
/// let b = [2.0, 2.0, 2.0];
/// let c = [-1.0, -1.0, 0.0];
/// let d = [1.0, 0.0, 1.0];
///
/// let mut solver = TridiagonalSolver::with_defaults();
/// let x = solver.solve(&a, &b, &c, &d).unwrap();
/// for xi in x {
///     assert!((xi - 1.0).abs() < 1e-12);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TridiagonalSolver<T: Float> {
    config: TridiagonalConfig<T>,
    c_prime: Vec<T>,
    d_prime: Vec<T>,
}

impl<T: Float> TridiagonalSolver<T> {
    /// Create a new solver with the given configuration.
    pub fn new(config: TridiagonalConfig<T>) -> Self {
        Self {
            config,
            c_prime: Vec::new(),
            d_prime: Vec::new(),
        }
    }

    /// Create a solver with default configuration (pivot tolerance 1e-15).
    pub fn with_defaults() -> Self {
        Self::new(TridiagonalConfig::default())
    }

    /// Create a solver with scratch buffers pre-sized for systems of size `n`.
    pub fn with_capacity(config: TridiagonalConfig<T>, n: usize) -> Self {
        Self {
            config,
            c_prime: Vec::with_capacity(n),
            d_prime: Vec::with_capacity(n),
        }
    }

    /// Returns the solver configuration.
    #[inline]
    pub fn config(&self) -> &TridiagonalConfig<T> {
        &self.config
    }

    /// Solve the system and return the solution as a new vector.
    ///
    /// # Errors
    ///
    /// * `LinearSolverError::InvalidArgument` - empty system or length mismatch
    /// * `LinearSolverError::SingularSystem` - pivot below tolerance
    pub fn solve(
        &mut self,
        a: &[T],
        b: &[T],
        c: &[T],
        d: &[T],
    ) -> Result<Vec<T>, LinearSolverError> {
        let mut x = vec![T::zero(); d.len()];
        self.solve_into(a, b, c, d, &mut x)?;
        Ok(x)
    }

    /// Solve the system, writing the solution into `x`.
    ///
    /// `x` must have the same length as `d`. On error `x` is left in an
    /// unspecified state.
    ///
    /// # Errors
    ///
    /// * `LinearSolverError::InvalidArgument` - empty system or length mismatch
    /// * `LinearSolverError::SingularSystem` - pivot below tolerance
    pub fn solve_into(
        &mut self,
        a: &[T],
        b: &[T],
        c: &[T],
        d: &[T],
        x: &mut [T],
    ) -> Result<(), LinearSolverError> {
        let n = d.len();
        check_dimensions(a, b, c, n)?;
        if x.len() != n {
            return Err(LinearSolverError::invalid_argument(format!(
                "output length {} does not match system size {}",
                x.len(),
                n
            )));
        }

        self.c_prime.clear();
        self.c_prime.resize(n, T::zero());
        self.d_prime.clear();
        self.d_prime.resize(n, T::zero());

        let tol = self.config.pivot_tolerance;

        // Forward elimination
        let pivot = b[0];
        if pivot.abs() < tol {
            return Err(singular(0, pivot));
        }
        self.c_prime[0] = c[0] / pivot;
        self.d_prime[0] = d[0] / pivot;

        for i in 1..n {
            let denom = b[i] - a[i] * self.c_prime[i - 1];
            if denom.abs() < tol {
                return Err(singular(i, denom));
            }
            let inv = T::one() / denom;
            if i < n - 1 {
                self.c_prime[i] = c[i] * inv;
            }
            self.d_prime[i] = (d[i] - a[i] * self.d_prime[i - 1]) * inv;
        }

        // Back substitution
        x[n - 1] = self.d_prime[n - 1];
        for i in (0..n - 1).rev() {
            x[i] = self.d_prime[i] - self.c_prime[i] * x[i + 1];
        }

        Ok(())
    }
}

impl<T: Float> Default for TridiagonalSolver<T> {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Solve a tridiagonal system with the default configuration.
///
/// Convenience wrapper that allocates fresh scratch buffers on every call.
/// Prefer a long-lived [`TridiagonalSolver`] inside loops.
///
/// # Example
///
/// ```
/// use pricer_core::math::solvers::solve_tridiagonal;
///
/// let x = solve_tridiagonal::<f64>(&[0.0, 1.0], &[4.0, 4.0], &[1.0, 0.0], &[5.0, 5.0]).unwrap();
/// assert!((x[0] - 1.0).abs() < 1e-12);
/// assert!((x[1] - 1.0).abs() < 1e-12);
/// ```
pub fn solve_tridiagonal<T: Float>(
    a: &[T],
    b: &[T],
    c: &[T],
    d: &[T],
) -> Result<Vec<T>, LinearSolverError> {
    TridiagonalSolver::with_defaults().solve(a, b, c, d)
}

/// Multiply the tridiagonal matrix `(a, b, c)` by `x`.
///
/// Uses the same storage convention as the solver (`a[0]` and `c[n-1]` are
/// ignored). Useful to build right-hand sides from a known solution and to
/// measure residuals.
///
/// # Errors
///
/// * `LinearSolverError::InvalidArgument` - empty input or length mismatch
pub fn tridiagonal_mul<T: Float>(
    a: &[T],
    b: &[T],
    c: &[T],
    x: &[T],
) -> Result<Vec<T>, LinearSolverError> {
    let n = x.len();
    check_dimensions(a, b, c, n)?;

    let mut d = vec![T::zero(); n];
    for i in 0..n {
        let mut acc = b[i] * x[i];
        if i > 0 {
            acc = acc + a[i] * x[i - 1];
        }
        if i + 1 < n {
            acc = acc + c[i] * x[i + 1];
        }
        d[i] = acc;
    }
    Ok(d)
}

fn check_dimensions<T>(a: &[T], b: &[T], c: &[T], n: usize) -> Result<(), LinearSolverError> {
    if n == 0 {
        return Err(LinearSolverError::invalid_argument("system is empty"));
    }
    if a.len() != n || b.len() != n || c.len() != n {
        return Err(LinearSolverError::invalid_argument(format!(
            "inconsistent dimensions: a={}, b={}, c={}, expected {}",
            a.len(),
            b.len(),
            c.len(),
            n
        )));
    }
    Ok(())
}

fn singular<T: Float>(index: usize, pivot: T) -> LinearSolverError {
    LinearSolverError::SingularSystem {
        index,
        pivot: pivot.to_f64().unwrap_or(f64::NAN),
    }
}
