//! Pricing results and post-processing of the solved value layer.

use crate::error::PdeError;
use crate::grid::LogGrid;

/// Price and sensitivities at one spot.
///
/// `theta` is `0.0` unless the engine was configured with
/// `compute_theta`, in which case it is ∂V/∂t per year in calendar time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PricingResult {
    /// Present value.
    pub price: f64,
    /// ∂V/∂S.
    pub delta: f64,
    /// ∂²V/∂S².
    pub gamma: f64,
    /// ∂V/∂t.
    pub theta: f64,
}

/// Today's option values on the whole grid.
///
/// Returned by [`PdeEngine::solve_grid`](crate::engine::PdeEngine::solve_grid)
/// so that several spots can be evaluated from one backward solve.
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
///     .space_steps(200)
///     .time_steps(200)
///     .build()
///     .unwrap();
/// let mut engine = PdeEngine::new(config);
/// let grid = engine.solve_grid(&VanillaPayoff::call(100.0).unwrap()).unwrap();
///
/// let low = grid.price_at(90.0).unwrap().price;
/// let high = grid.price_at(110.0).unwrap().price;
/// assert!(low < high);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ValueGrid {
    grid: LogGrid,
    values: Vec<f64>,
    previous: Option<Vec<f64>>,
    dt: f64,
}

impl ValueGrid {
    pub(crate) fn new(
        grid: LogGrid,
        values: Vec<f64>,
        previous: Option<Vec<f64>>,
        dt: f64,
    ) -> Self {
        Self {
            grid,
            values,
            previous,
            dt,
        }
    }

    /// Spot coordinates of the grid nodes.
    #[inline]
    pub fn spots(&self) -> &[f64] {
        self.grid.spots()
    }

    /// Log-spot coordinates of the grid nodes.
    #[inline]
    pub fn log_spots(&self) -> &[f64] {
        self.grid.log_spots()
    }

    /// Option values at the grid nodes.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Interpolated price and Greeks at `spot`.
    ///
    /// # Errors
    /// - `PdeError::InvalidSpot` if spot is not finite and positive
    pub fn price_at(&self, spot: f64) -> Result<PricingResult, PdeError> {
        evaluate(
            &self.grid,
            &self.values,
            self.previous.as_deref(),
            self.dt,
            spot,
        )
    }
}

/// Interpolates price, delta and gamma from a solved layer.
///
/// Delta and gamma are centered differences at the lower node of the
/// located cell, not at `spot` itself.
pub(crate) fn evaluate(
    grid: &LogGrid,
    values: &[f64],
    previous: Option<&[f64]>,
    dt: f64,
    spot: f64,
) -> Result<PricingResult, PdeError> {
    if !spot.is_finite() || spot <= 0.0 {
        return Err(PdeError::InvalidSpot(spot));
    }

    let target = spot.ln();
    let i = grid.locate(target);
    let x = grid.log_spots();
    let s = grid.spots()[i];
    let dx = grid.dx();
    let ratio = (target - x[i]) / dx;

    let price = interpolate(values, i, ratio);

    let dv_dx = (values[i + 1] - values[i - 1]) / (2.0 * dx);
    let d2v_dx2 = (values[i + 1] - 2.0 * values[i] + values[i - 1]) / (dx * dx);

    let theta = match previous {
        Some(layer) => (interpolate(layer, i, ratio) - price) / dt,
        None => 0.0,
    };

    Ok(PricingResult {
        price,
        delta: dv_dx / s,
        gamma: (d2v_dx2 - dv_dx) / (s * s),
        theta,
    })
}

#[inline]
fn interpolate(values: &[f64], i: usize, ratio: f64) -> f64 {
    values[i] * (1.0 - ratio) + values[i + 1] * ratio
}
