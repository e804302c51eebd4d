//! Backward time-marching engine.
//!
//! # Overview
//!
//! [`PdeEngine`] coordinates:
//! 1. Terminal condition `V[i] = payoff(S[i])` on the [`LogGrid`]
//! 2. Coefficient assembly (via [`ThetaMatrices`])
//! 3. Per-step Dirichlet boundaries (via [`DirichletBoundaries`])
//! 4. One tridiagonal solve per step (via [`TridiagonalSolver`])
//! 5. Interpolation of price and Greeks at the requested spot
//!
//! # Workspace Reuse
//!
//! Operator, right-hand side and solver scratch buffers are owned by the
//! engine and reused across solves, so marching allocates nothing per step.

use pricer_core::math::solvers::TridiagonalSolver;
use pricer_models::instruments::Payoff;
use tracing::{debug, debug_span, trace};

use crate::boundary::DirichletBoundaries;
use crate::config::PdeConfig;
use crate::error::PdeError;
use crate::grid::LogGrid;
use crate::result::{evaluate, PricingResult, ValueGrid};
use crate::scheme::{SchemeCoefficients, ThetaMatrices};

/// Theta-scheme finite-difference engine for European options.
///
/// `solve` takes `&mut self` because the operator buffers are refilled in
/// place; use one engine per thread.
///
/// # Examples
///
/// ```rust
/// use pricer_models::instruments::VanillaPayoff;
/// use pricer_pde::{PdeConfig, PdeEngine};
///
/// let config = PdeConfig::builder()
///     .maturity(1.0)
///     .rate(0.05)
///     .volatility(0.2)
///     .s_max(500.0)
///     .build()
///     .unwrap();
///
/// let mut engine = PdeEngine::new(config);
/// let call = VanillaPayoff::call(100.0).unwrap();
/// let result = engine.solve(&call, 100.0).unwrap();
///
/// assert!((result.price - 10.4506).abs() < 0.05);
/// assert!(result.delta > 0.0 && result.delta < 1.0);
/// ```
#[derive(Debug)]
pub struct PdeEngine {
    config: PdeConfig,
    grid: LogGrid,
    matrices: ThetaMatrices,
    solver: TridiagonalSolver<f64>,
    values: Vec<f64>,
    previous: Vec<f64>,
    rhs: Vec<f64>,
    interior: Vec<f64>,
}

impl PdeEngine {
    /// Creates an engine and sizes its buffers for the configured grid.
    pub fn new(config: PdeConfig) -> Self {
        let n = config.space_steps();
        let grid = LogGrid::new(config.s_max(), n);
        let solver = TridiagonalSolver::with_capacity(Default::default(), n - 2);

        Self {
            grid,
            matrices: ThetaMatrices::new(n - 2),
            solver,
            values: vec![0.0; n],
            previous: Vec::new(),
            rhs: vec![0.0; n - 2],
            interior: vec![0.0; n - 2],
            config,
        }
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &PdeConfig {
        &self.config
    }

    /// Returns the spatial grid.
    #[inline]
    pub fn grid(&self) -> &LogGrid {
        &self.grid
    }

    /// Returns the operators from the last assembly.
    #[inline]
    pub fn matrices(&self) -> &ThetaMatrices {
        &self.matrices
    }

    /// Fills the implicit and explicit operators from the configuration.
    ///
    /// Called at the start of every solve.
    pub fn precompute_matrices(&mut self) {
        let coeffs = SchemeCoefficients::new(
            self.config.rate(),
            self.config.volatility(),
            self.config.dt(),
            self.grid.dx(),
        );
        self.matrices.assemble(&coeffs, self.config.theta());
        debug!(
            nu = coeffs.nu,
            lambda = coeffs.lambda,
            gamma = coeffs.gamma,
            rho = coeffs.rho,
            "assembled theta-scheme operators"
        );
    }

    /// Prices `payoff` at `spot`.
    ///
    /// # Errors
    /// - `PdeError::InvalidSpot` if spot is not finite and positive
    /// - `PdeError::LinearSolve` if a time step hits a singular system
    pub fn solve<P: Payoff + ?Sized>(
        &mut self,
        payoff: &P,
        spot: f64,
    ) -> Result<PricingResult, PdeError> {
        if !spot.is_finite() || spot <= 0.0 {
            return Err(PdeError::InvalidSpot(spot));
        }

        let span = debug_span!("pde_solve", spot, scheme = %self.config.scheme());
        let _guard = span.enter();

        self.march(payoff)?;

        let previous = self.config.compute_theta().then_some(self.previous.as_slice());
        let result = evaluate(
            &self.grid,
            &self.values,
            previous,
            self.config.dt(),
            spot,
        )?;

        debug!(
            price = result.price,
            delta = result.delta,
            gamma = result.gamma,
            theta = result.theta,
            "solve complete"
        );
        Ok(result)
    }

    /// Solves backward to today and returns the values on the whole grid.
    ///
    /// # Errors
    /// - `PdeError::LinearSolve` if a time step hits a singular system
    pub fn solve_grid<P: Payoff + ?Sized>(&mut self, payoff: &P) -> Result<ValueGrid, PdeError> {
        let span = debug_span!("pde_solve_grid", scheme = %self.config.scheme());
        let _guard = span.enter();

        self.march(payoff)?;

        let previous = self
            .config
            .compute_theta()
            .then(|| self.previous.clone());
        Ok(ValueGrid::new(
            self.grid.clone(),
            self.values.clone(),
            previous,
            self.config.dt(),
        ))
    }

    /// Runs the terminal condition and all time steps into `self.values`.
    fn march<P: Payoff + ?Sized>(&mut self, payoff: &P) -> Result<(), PdeError> {
        let n = self.grid.len();
        let rate = self.config.rate();
        let dt = self.config.dt();
        let steps = self.config.time_steps();

        debug!(
            n,
            m = steps,
            theta = self.config.theta(),
            dt,
            dx = self.grid.dx(),
            s_min = self.grid.spots()[0],
            s_max = self.grid.spots()[n - 1],
            "starting backward march"
        );

        self.precompute_matrices();

        for (v, &s) in self.values.iter_mut().zip(self.grid.spots()) {
            *v = payoff.evaluate(s);
        }

        let boundaries = DirichletBoundaries::new(payoff, &self.grid);
        debug!(right = ?boundaries.right(), "right boundary");

        for t in 0..steps {
            if t + 1 == steps && self.config.compute_theta() {
                self.previous.clone_from(&self.values);
            }

            let tau = (t + 1) as f64 * dt;
            let edges = boundaries.values_at(rate, tau);

            self.matrices.apply_explicit(&self.values, &mut self.rhs);
            DirichletBoundaries::inject(edges, &self.matrices, &mut self.rhs);

            self.solver.solve_into(
                self.matrices.a_lower(),
                self.matrices.a_diag(),
                self.matrices.a_upper(),
                &self.rhs,
                &mut self.interior,
            )?;

            self.values[1..n - 1].copy_from_slice(&self.interior);
            self.values[0] = edges.left;
            self.values[n - 1] = edges.right;

            trace!(step = t, tau, left = edges.left, right = edges.right, "time step");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThetaScheme;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use pricer_models::analytical::BlackScholes;
    use pricer_models::instruments::VanillaPayoff;
    use proptest::prelude::*;

    fn engine(n: usize, m: usize, scheme: ThetaScheme) -> PdeEngine {
        let config = PdeConfig::builder()
            .maturity(1.0)
            .rate(0.05)
            .volatility(0.2)
            .s_max(500.0)
            .scheme(scheme)
            .space_steps(n)
            .time_steps(m)
            .build()
            .unwrap();
        PdeEngine::new(config)
    }

    #[test]
    fn test_buffers_sized_for_interior() {
        let engine = engine(11, 10, ThetaScheme::CrankNicolson);
        assert_eq!(engine.grid().len(), 11);
        assert_eq!(engine.matrices().len(), 9);
    }

    #[test]
    fn test_precompute_matrices_matches_formulas() {
        let mut engine = engine(11, 10, ThetaScheme::CrankNicolson);
        engine.precompute_matrices();

        let dx = engine.grid().dx();
        let dt = 0.1;
        let lambda = 0.04 * dt / (dx * dx);
        let gamma = 0.03 * dt / (2.0 * dx);
        let rho = 0.05 * dt;

        let m = engine.matrices();
        for k in 0..m.len() {
            assert_relative_eq!(m.a_lower()[k], 0.5 * (-0.5 * lambda + gamma), epsilon = 1e-14);
            assert_relative_eq!(m.a_diag()[k], 1.0 + 0.5 * (lambda + rho), epsilon = 1e-14);
            assert_relative_eq!(m.a_upper()[k], 0.5 * (-0.5 * lambda - gamma), epsilon = 1e-14);
            assert_relative_eq!(m.b_lower()[k], 0.5 * (0.5 * lambda - gamma), epsilon = 1e-14);
            assert_relative_eq!(m.b_diag()[k], 1.0 - 0.5 * (lambda + rho), epsilon = 1e-14);
            assert_relative_eq!(m.b_upper()[k], 0.5 * (0.5 * lambda + gamma), epsilon = 1e-14);
        }
    }

    #[test]
    fn test_reference_call() {
        let mut engine = engine(400, 1000, ThetaScheme::CrankNicolson);
        let call = VanillaPayoff::call(100.0).unwrap();
        let result = engine.solve(&call, 100.0).unwrap();

        assert_abs_diff_eq!(result.price, 10.4506, epsilon = 0.01);
        assert_eq!(result.theta, 0.0);
    }

    #[test]
    fn test_solve_grid_agrees_with_solve() {
        let mut engine = engine(200, 200, ThetaScheme::CrankNicolson);
        let put = VanillaPayoff::put(100.0).unwrap();
        let direct = engine.solve(&put, 95.0).unwrap();
        let grid = engine.solve_grid(&put).unwrap();
        assert_eq!(grid.price_at(95.0).unwrap(), direct);
    }

    #[test]
    fn test_repeated_solves_are_identical() {
        let mut engine = engine(150, 150, ThetaScheme::Implicit);
        let call = VanillaPayoff::call(110.0).unwrap();
        let first = engine.solve(&call, 100.0).unwrap();
        let second = engine.solve(&call, 100.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_spot_rejected_before_marching() {
        let mut engine = engine(11, 10, ThetaScheme::CrankNicolson);
        let call = VanillaPayoff::call(100.0).unwrap();
        assert_eq!(
            engine.solve(&call, 0.0).unwrap_err(),
            PdeError::InvalidSpot(0.0)
        );
    }

    #[test]
    fn test_boundaries_written_back() {
        let mut engine = engine(50, 20, ThetaScheme::CrankNicolson);
        let call = VanillaPayoff::call(100.0).unwrap();
        let grid = engine.solve_grid(&call).unwrap();
        let values = grid.values();
        let s_max = grid.spots()[49];

        assert_eq!(values[0], 0.0);
        assert_relative_eq!(
            values[49],
            s_max - 100.0 * (-0.05_f64).exp(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_compute_theta_matches_closed_form() {
        let config = PdeConfig::builder()
            .maturity(1.0)
            .rate(0.05)
            .volatility(0.2)
            .s_max(500.0)
            .space_steps(400)
            .time_steps(2000)
            .compute_theta(true)
            .build()
            .unwrap();
        let mut engine = PdeEngine::new(config);
        let call = VanillaPayoff::call(100.0).unwrap();
        let result = engine.solve(&call, 100.0).unwrap();

        let bs = BlackScholes::new(100.0, 0.05, 0.2).unwrap();
        let expected = bs.theta(100.0, 1.0, true);
        assert!(result.theta < 0.0);
        assert_abs_diff_eq!(result.theta, expected, epsilon = 0.3);
    }

    #[test]
    fn test_single_time_step() {
        let mut engine = engine(101, 1, ThetaScheme::Implicit);
        let put = VanillaPayoff::put(100.0).unwrap();
        let result = engine.solve(&put, 100.0).unwrap();
        assert!(result.price.is_finite());
        assert!(result.price > 0.0);
    }

    #[test]
    fn test_closure_payoff() {
        let mut engine = engine(300, 300, ThetaScheme::CrankNicolson);
        let forward = |s: f64| s - 100.0;
        let result = engine.solve(&forward, 100.0).unwrap();
        // Forward value S - K e^{-rT}, delta 1, gamma 0.
        assert_abs_diff_eq!(result.price, 100.0 - 100.0 * (-0.05_f64).exp(), epsilon = 0.02);
        assert_abs_diff_eq!(result.delta, 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(result.gamma, 0.0, epsilon = 1e-3);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_call_within_no_arbitrage_bounds(
            spot in 60.0..140.0_f64,
            rate in 0.0..0.1_f64,
            vol in 0.1..0.5_f64,
        ) {
            let config = PdeConfig::builder()
                .maturity(1.0)
                .rate(rate)
                .volatility(vol)
                .s_max(500.0)
                .space_steps(120)
                .time_steps(120)
                .build()
                .unwrap();
            let mut engine = PdeEngine::new(config);
            let call = VanillaPayoff::call(100.0).unwrap();
            let price = engine.solve(&call, spot).unwrap().price;

            let lower = (spot - 100.0 * (-rate).exp()).max(0.0);
            prop_assert!(price >= lower - 0.1, "price {} below bound {}", price, lower);
            prop_assert!(price <= spot, "price {} above spot {}", price, spot);
        }
    }
}
