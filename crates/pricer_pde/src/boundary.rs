//! Dirichlet boundary conditions at the grid edges.
//!
//! Both edges are re-evaluated at every time step from the terminal payoff
//! and the time to maturity `τ`.

use pricer_models::instruments::Payoff;

use crate::grid::LogGrid;
use crate::scheme::ThetaMatrices;

/// Payoff-to-spot ratio above which the right edge is treated as linear.
pub const LINEAR_ASYMPTOTE_THRESHOLD: f64 = 0.1;

/// Behaviour of the payoff at the right edge of the grid.
///
/// # Examples
///
/// ```rust
/// use pricer_pde::boundary::RightBoundary;
///
/// let call = |s: f64| (s - 100.0_f64).max(0.0);
/// let edge = RightBoundary::classify(&call, 500.0);
/// assert_eq!(edge, RightBoundary::Linear { implied_strike: 100.0 });
///
/// // S - K e^{-rτ}
/// let v = edge.value(500.0, 0.05, 1.0);
/// assert!((v - (500.0 - 100.0 * (-0.05_f64).exp())).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RightBoundary {
    /// Payoff grows like `S - K`; value is `S - K e^{-rτ}`.
    Linear {
        /// `S_max - payoff(S_max)`.
        implied_strike: f64,
    },
    /// Payoff is small or bounded; value is the discounted intrinsic.
    Decaying {
        /// `payoff(S_max)`.
        intrinsic: f64,
    },
}

impl RightBoundary {
    /// Classifies the payoff at `s_right`.
    ///
    /// Linear when `payoff(s_right) > 0.1 * s_right`.
    pub fn classify<P: Payoff + ?Sized>(payoff: &P, s_right: f64) -> Self {
        let intrinsic = payoff.evaluate(s_right);
        if intrinsic > LINEAR_ASYMPTOTE_THRESHOLD * s_right {
            RightBoundary::Linear {
                implied_strike: s_right - intrinsic,
            }
        } else {
            RightBoundary::Decaying { intrinsic }
        }
    }

    /// Boundary value at time to maturity `tau`.
    #[inline]
    pub fn value(&self, s_right: f64, rate: f64, tau: f64) -> f64 {
        let discount = (-rate * tau).exp();
        match *self {
            RightBoundary::Linear { implied_strike } => s_right - implied_strike * discount,
            RightBoundary::Decaying { intrinsic } => intrinsic * discount,
        }
    }
}

/// Boundary values for one time layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryValues {
    /// Value at `S[0]`.
    pub left: f64,
    /// Value at `S[N-1]`.
    pub right: f64,
}

/// Boundary rule for one payoff on one grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirichletBoundaries {
    left_intrinsic: f64,
    s_right: f64,
    right: RightBoundary,
}

impl DirichletBoundaries {
    /// Evaluates the payoff at both grid edges.
    pub fn new<P: Payoff + ?Sized>(payoff: &P, grid: &LogGrid) -> Self {
        let spots = grid.spots();
        let s_right = spots[spots.len() - 1];
        Self {
            left_intrinsic: payoff.evaluate(spots[0]),
            s_right,
            right: RightBoundary::classify(payoff, s_right),
        }
    }

    /// The right-edge branch chosen for this payoff.
    #[inline]
    pub fn right(&self) -> RightBoundary {
        self.right
    }

    /// Boundary values at time to maturity `tau`.
    ///
    /// The left edge is always the discounted payoff at `S[0]`.
    pub fn values_at(&self, rate: f64, tau: f64) -> BoundaryValues {
        BoundaryValues {
            left: self.left_intrinsic * (-rate * tau).exp(),
            right: self.right.value(self.s_right, rate, tau),
        }
    }

    /// Moves the known edge values to the right-hand side.
    ///
    /// `rhs[0] -= A_lower[0] * left` and `rhs[last] -= A_upper[last] * right`.
    pub fn inject(values: BoundaryValues, matrices: &ThetaMatrices, rhs: &mut [f64]) {
        let last = rhs.len() - 1;
        rhs[0] -= matrices.a_lower()[0] * values.left;
        rhs[last] -= matrices.a_upper()[last] * values.right;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::SchemeCoefficients;
    use approx::assert_relative_eq;
    use pricer_models::instruments::VanillaPayoff;

    #[test]
    fn test_call_right_edge_is_linear() {
        let call = VanillaPayoff::call(100.0).unwrap();
        let edge = RightBoundary::classify(&call, 400.0);
        assert_eq!(
            edge,
            RightBoundary::Linear {
                implied_strike: 100.0
            }
        );
        assert_relative_eq!(
            edge.value(400.0, 0.05, 0.5),
            400.0 - 100.0 * (-0.025_f64).exp()
        );
    }

    #[test]
    fn test_put_right_edge_decays_to_zero() {
        let put = VanillaPayoff::put(100.0).unwrap();
        let edge = RightBoundary::classify(&put, 400.0);
        assert_eq!(edge, RightBoundary::Decaying { intrinsic: 0.0 });
        assert_eq!(edge.value(400.0, 0.05, 1.0), 0.0);
    }

    #[test]
    fn test_threshold_is_strict() {
        // Exactly 10% of spot stays on the decaying branch.
        let flat = |_: f64| 10.0;
        assert_eq!(
            RightBoundary::classify(&flat, 100.0),
            RightBoundary::Decaying { intrinsic: 10.0 }
        );
        assert!(matches!(
            RightBoundary::classify(&flat, 99.0),
            RightBoundary::Linear { .. }
        ));
    }

    #[test]
    fn test_digital_right_edge_discounts() {
        let digital = |s: f64| if s > 100.0 { 1.0 } else { 0.0 };
        let edge = RightBoundary::classify(&digital, 500.0);
        assert_eq!(edge, RightBoundary::Decaying { intrinsic: 1.0 });
        assert_relative_eq!(edge.value(500.0, 0.05, 2.0), (-0.1_f64).exp());
    }

    #[test]
    fn test_put_left_edge_is_discounted_intrinsic() {
        let grid = LogGrid::new(300.0, 11);
        let put = VanillaPayoff::put(100.0).unwrap();
        let bc = DirichletBoundaries::new(&put, &grid);
        let values = bc.values_at(0.05, 1.0);
        assert_relative_eq!(values.left, (100.0 - 0.1) * (-0.05_f64).exp(), epsilon = 1e-12);
        assert_eq!(values.right, 0.0);
    }

    #[test]
    fn test_values_at_expiry_match_payoff() {
        let grid = LogGrid::new(500.0, 21);
        let call = VanillaPayoff::call(100.0).unwrap();
        let bc = DirichletBoundaries::new(&call, &grid);
        let values = bc.values_at(0.05, 0.0);
        assert_eq!(values.left, 0.0);
        assert_relative_eq!(values.right, 400.0, epsilon = 1e-9);
    }

    #[test]
    fn test_inject() {
        let mut m = ThetaMatrices::new(3);
        m.assemble(&SchemeCoefficients::new(0.05, 0.2, 0.01, 0.1), 0.5);
        let mut rhs = [1.0, 1.0, 1.0];
        let values = BoundaryValues {
            left: 2.0,
            right: 3.0,
        };
        DirichletBoundaries::inject(values, &m, &mut rhs);

        assert_relative_eq!(rhs[0], 1.0 - m.a_lower()[0] * 2.0);
        assert_eq!(rhs[1], 1.0);
        assert_relative_eq!(rhs[2], 1.0 - m.a_upper()[2] * 3.0);
    }
}
