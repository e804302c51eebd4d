//! Uniform grid in log-spot.

use crate::config::S_MIN_RATIO;

/// Uniform grid in `x = ln S` spanning `[ln(s_max/3000), ln s_max]`.
///
/// Nodes are strictly increasing and fixed for the lifetime of the grid.
///
/// # Examples
///
/// ```rust
/// use pricer_pde::grid::LogGrid;
///
/// let grid = LogGrid::new(300.0, 5);
/// assert_eq!(grid.len(), 5);
/// assert!((grid.spots()[0] - 0.1).abs() < 1e-12);
/// assert!((grid.spots()[4] - 300.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LogGrid {
    log_spots: Vec<f64>,
    spots: Vec<f64>,
    dx: f64,
}

impl LogGrid {
    /// Builds an `n`-node grid with upper edge `s_max`.
    ///
    /// Callers guarantee `s_max > 0` and `n >= 3`; both hold for any
    /// validated [`PdeConfig`](crate::config::PdeConfig).
    pub fn new(s_max: f64, n: usize) -> Self {
        let x_min = (s_max / S_MIN_RATIO).ln();
        let x_max = s_max.ln();
        let dx = (x_max - x_min) / (n - 1) as f64;

        let log_spots: Vec<f64> = (0..n).map(|i| x_min + i as f64 * dx).collect();
        let spots = log_spots.iter().map(|x| x.exp()).collect();

        Self {
            log_spots,
            spots,
            dx,
        }
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.log_spots.len()
    }

    /// Always false; a grid has at least three nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.log_spots.is_empty()
    }

    /// Node spacing in log-spot.
    #[inline]
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Log-spot coordinates `x[i]`.
    #[inline]
    pub fn log_spots(&self) -> &[f64] {
        &self.log_spots
    }

    /// Spot coordinates `S[i] = exp(x[i])`.
    #[inline]
    pub fn spots(&self) -> &[f64] {
        &self.spots
    }

    /// Finds the cell used to interpolate at `log_spot`.
    ///
    /// Scans forward from `i = 1` while `i < n - 2` and `x[i+1] < log_spot`,
    /// so `i - 1` and `i + 1` are always valid nodes. Targets outside the
    /// grid clamp to the first or last usable cell.
    pub fn locate(&self, log_spot: f64) -> usize {
        let last = self.len() - 2;
        let mut i = 1;
        while i < last && self.log_spots[i + 1] < log_spot {
            i += 1;
        }
        i
    }
}
