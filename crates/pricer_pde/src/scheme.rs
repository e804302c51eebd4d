//! Theta-scheme coefficient assembly.
//!
//! With `x = ln S` and `τ` the time to maturity, the Black-Scholes equation
//! becomes `V_τ = σ²/2 V_xx + ν V_x - r V` with `ν = r - σ²/2`. Central
//! differences and a θ-weighted time step give, for each interior node,
//!
//! ```text
//! A_lower V[i-1]' + A_diag V[i]' + A_upper V[i+1]' = B_lower V[i-1] + B_diag V[i] + B_upper V[i+1]
//! ```
//!
//! where primes denote the new time layer.

/// Dimensionless step ratios shared by every interior row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SchemeCoefficients {
    /// Drift in log-spot, `r - σ²/2`.
    pub nu: f64,
    /// Diffusion ratio `σ² dt / dx²`.
    pub lambda: f64,
    /// Convection ratio `ν dt / (2 dx)`.
    pub gamma: f64,
    /// Discount ratio `r dt`.
    pub rho: f64,
}

impl SchemeCoefficients {
    /// Computes the step ratios.
    pub fn new(rate: f64, volatility: f64, dt: f64, dx: f64) -> Self {
        let variance = volatility * volatility;
        let nu = rate - 0.5 * variance;
        Self {
            nu,
            lambda: variance * dt / (dx * dx),
            gamma: nu * dt / (2.0 * dx),
            rho: rate * dt,
        }
    }
}

/// Implicit (A) and explicit (B) tridiagonal operators over the interior nodes.
///
/// Buffers are sized once and refilled in place by [`assemble`](Self::assemble).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ThetaMatrices {
    a_lower: Vec<f64>,
    a_diag: Vec<f64>,
    a_upper: Vec<f64>,
    b_lower: Vec<f64>,
    b_diag: Vec<f64>,
    b_upper: Vec<f64>,
}

impl ThetaMatrices {
    /// Allocates zeroed operators for `interior` rows.
    pub fn new(interior: usize) -> Self {
        Self {
            a_lower: vec![0.0; interior],
            a_diag: vec![0.0; interior],
            a_upper: vec![0.0; interior],
            b_lower: vec![0.0; interior],
            b_diag: vec![0.0; interior],
            b_upper: vec![0.0; interior],
        }
    }

    /// Number of interior rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.a_diag.len()
    }

    /// Returns true when there are no interior rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.a_diag.is_empty()
    }

    /// Fills both operators for weight `theta`.
    ///
    /// - `A_lower = θ(-λ/2 + γ)`, `A_diag = 1 + θ(λ + ρ)`, `A_upper = θ(-λ/2 - γ)`
    /// - `B_lower = (1-θ)(λ/2 - γ)`, `B_diag = 1 - (1-θ)(λ + ρ)`, `B_upper = (1-θ)(λ/2 + γ)`
    pub fn assemble(&mut self, coeffs: &SchemeCoefficients, theta: f64) {
        let SchemeCoefficients {
            lambda, gamma, rho, ..
        } = *coeffs;
        let explicit = 1.0 - theta;

        let a = (
            theta * (-0.5 * lambda + gamma),
            1.0 + theta * (lambda + rho),
            theta * (-0.5 * lambda - gamma),
        );
        let b = (
            explicit * (0.5 * lambda - gamma),
            1.0 - explicit * (lambda + rho),
            explicit * (0.5 * lambda + gamma),
        );

        self.a_lower.fill(a.0);
        self.a_diag.fill(a.1);
        self.a_upper.fill(a.2);
        self.b_lower.fill(b.0);
        self.b_diag.fill(b.1);
        self.b_upper.fill(b.2);
    }

    /// Applies the explicit operator to the full layer `values`.
    ///
    /// `rhs[k] = B_lower[k] V[k] + B_diag[k] V[k+1] + B_upper[k] V[k+2]`,
    /// where `values` has `len() + 2` entries and `rhs` has `len()`.
    pub fn apply_explicit(&self, values: &[f64], rhs: &mut [f64]) {
        debug_assert_eq!(values.len(), self.len() + 2);
        debug_assert_eq!(rhs.len(), self.len());

        for (k, (d, window)) in rhs.iter_mut().zip(values.windows(3)).enumerate() {
            *d = self.b_lower[k] * window[0]
                + self.b_diag[k] * window[1]
                + self.b_upper[k] * window[2];
        }
    }

    /// Implicit sub-diagonal.
    #[inline]
    pub fn a_lower(&self) -> &[f64] {
        &self.a_lower
    }

    /// Implicit diagonal.
    #[inline]
    pub fn a_diag(&self) -> &[f64] {
        &self.a_diag
    }

    /// Implicit super-diagonal.
    #[inline]
    pub fn a_upper(&self) -> &[f64] {
        &self.a_upper
    }

    /// Explicit sub-diagonal.
    #[inline]
    pub fn b_lower(&self) -> &[f64] {
        &self.b_lower
    }

    /// Explicit diagonal.
    #[inline]
    pub fn b_diag(&self) -> &[f64] {
        &self.b_diag
    }

    /// Explicit super-diagonal.
    #[inline]
    pub fn b_upper(&self) -> &[f64] {
        &self.b_upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn coeffs() -> SchemeCoefficients {
        SchemeCoefficients::new(0.05, 0.2, 0.01, 0.1)
    }

    #[test]
    fn test_coefficients() {
        let c = coeffs();
        assert_relative_eq!(c.nu, 0.03, epsilon = 1e-15);
        assert_relative_eq!(c.lambda, 0.04, epsilon = 1e-15);
        assert_relative_eq!(c.gamma, 0.0015, epsilon = 1e-15);
        assert_relative_eq!(c.rho, 0.0005, epsilon = 1e-15);
    }

    #[test]
    fn test_crank_nicolson_entries() {
        let mut m = ThetaMatrices::new(4);
        m.assemble(&coeffs(), 0.5);

        assert_relative_eq!(m.a_lower()[0], 0.5 * (-0.02 + 0.0015), epsilon = 1e-15);
        assert_relative_eq!(m.a_diag()[2], 1.0 + 0.5 * 0.0405, epsilon = 1e-15);
        assert_relative_eq!(m.a_upper()[3], 0.5 * (-0.02 - 0.0015), epsilon = 1e-15);
        assert_relative_eq!(m.b_lower()[1], 0.5 * (0.02 - 0.0015), epsilon = 1e-15);
        assert_relative_eq!(m.b_diag()[0], 1.0 - 0.5 * 0.0405, epsilon = 1e-15);
        assert_relative_eq!(m.b_upper()[2], 0.5 * (0.02 + 0.0015), epsilon = 1e-15);
    }

    #[test]
    fn test_explicit_scheme_has_identity_implicit_operator() {
        let mut m = ThetaMatrices::new(3);
        m.assemble(&coeffs(), 0.0);
        assert!(m.a_lower().iter().all(|&v| v == 0.0));
        assert!(m.a_upper().iter().all(|&v| v == 0.0));
        assert!(m.a_diag().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_implicit_scheme_has_identity_explicit_operator() {
        let mut m = ThetaMatrices::new(3);
        m.assemble(&coeffs(), 1.0);
        assert!(m.b_lower().iter().all(|&v| v == 0.0));
        assert!(m.b_upper().iter().all(|&v| v == 0.0));
        assert!(m.b_diag().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_operators_sum_to_discount() {
        // Row sums encode the -rV term: A sums to 1 + θρ, B to 1 - (1-θ)ρ.
        let c = coeffs();
        let mut m = ThetaMatrices::new(2);
        m.assemble(&c, 0.3);
        let a_sum = m.a_lower()[0] + m.a_diag()[0] + m.a_upper()[0];
        let b_sum = m.b_lower()[0] + m.b_diag()[0] + m.b_upper()[0];
        assert_relative_eq!(a_sum, 1.0 + 0.3 * c.rho, epsilon = 1e-15);
        assert_relative_eq!(b_sum, 1.0 - 0.7 * c.rho, epsilon = 1e-15);
    }

    #[test]
    fn test_apply_explicit() {
        let mut m = ThetaMatrices::new(2);
        m.assemble(&coeffs(), 0.5);
        let values = [1.0, 2.0, 3.0, 4.0];
        let mut rhs = [0.0; 2];
        m.apply_explicit(&values, &mut rhs);

        let expected0 = m.b_lower()[0] + 2.0 * m.b_diag()[0] + 3.0 * m.b_upper()[0];
        let expected1 = 2.0 * m.b_lower()[1] + 3.0 * m.b_diag()[1] + 4.0 * m.b_upper()[1];
        assert_relative_eq!(rhs[0], expected0);
        assert_relative_eq!(rhs[1], expected1);
    }
}
