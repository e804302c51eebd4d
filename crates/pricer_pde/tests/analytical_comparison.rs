//! Analytical comparison tests for finite-difference pricing.
//!
//! These tests verify that the theta-scheme engine converges to the
//! closed-form Black-Scholes prices for European calls and puts.
//!
//! # Test Categories
//!
//! 1. **Benchmark table**: twenty market scenarios vs closed form
//! 2. **Arbitrage relations**: put-call parity, monotonicity, convexity
//! 3. **Convergence**: error decreases under grid refinement
//! 4. **Schemes**: explicit and fully implicit weights
//! 5. **Errors**: invalid inputs surface as typed errors

use approx::assert_abs_diff_eq;
use pricer_models::analytical::BlackScholes;
use pricer_models::instruments::{PayoffType, VanillaPayoff};
use pricer_pde::{PdeConfig, PdeEngine, PdeError, ThetaScheme};

/// (spot, strike, maturity, rate, volatility)
const BENCHMARK_CASES: [(f64, f64, f64, f64, f64); 20] = [
    (100.0, 100.0, 1.0, 0.05, 0.2),
    (80.0, 100.0, 1.0, 0.05, 0.2),
    (120.0, 100.0, 1.0, 0.05, 0.2),
    (100.0, 90.0, 1.0, 0.05, 0.2),
    (100.0, 110.0, 1.0, 0.05, 0.2),
    (100.0, 100.0, 0.5, 0.05, 0.2),
    (100.0, 100.0, 2.0, 0.05, 0.2),
    (100.0, 100.0, 1.0, 0.01, 0.2),
    (100.0, 100.0, 1.0, 0.1, 0.2),
    (100.0, 100.0, 1.0, 0.05, 0.1),
    (100.0, 100.0, 1.0, 0.05, 0.4),
    (95.0, 100.0, 1.0, 0.03, 0.25),
    (105.0, 100.0, 1.0, 0.03, 0.25),
    (90.0, 100.0, 2.0, 0.02, 0.3),
    (110.0, 100.0, 2.0, 0.02, 0.3),
    (70.0, 100.0, 1.5, 0.04, 0.35),
    (130.0, 100.0, 1.5, 0.04, 0.35),
    (150.0, 100.0, 0.75, 0.06, 0.18),
    (100.0, 120.0, 1.5, 0.04, 0.35),
    (100.0, 80.0, 1.5, 0.04, 0.35),
];

fn config(
    maturity: f64,
    rate: f64,
    volatility: f64,
    s_max: f64,
    n: usize,
    m: usize,
) -> PdeConfig {
    PdeConfig::builder()
        .maturity(maturity)
        .rate(rate)
        .volatility(volatility)
        .s_max(s_max)
        .space_steps(n)
        .time_steps(m)
        .build()
        .unwrap()
}

fn reference_engine(n: usize, m: usize) -> PdeEngine {
    PdeEngine::new(config(1.0, 0.05, 0.2, 500.0, n, m))
}

// ============================================================================
// Benchmark Table
// ============================================================================

#[test]
fn test_reference_case_within_one_cent() {
    let mut engine = reference_engine(400, 1000);
    let call = VanillaPayoff::call(100.0).unwrap();
    let result = engine.solve(&call, 100.0).unwrap();

    let bs = BlackScholes::new(100.0, 0.05, 0.2).unwrap();
    assert_abs_diff_eq!(result.price, bs.price_call(100.0, 1.0), epsilon = 0.01);
}

/// Standard case: S0 = K = 100, T = 1, r = 5%, σ = 20%, S_max = 400 on the default grid.
#[test]
fn test_standard_case_default_grid() {
    let mut engine = PdeEngine::new(config(1.0, 0.05, 0.2, 400.0, 250, 2500));
    let call = VanillaPayoff::call(100.0).unwrap();
    let put = VanillaPayoff::put(100.0).unwrap();

    let c = engine.solve(&call, 100.0).unwrap().price;
    let p = engine.solve(&put, 100.0).unwrap().price;

    let bs = BlackScholes::new(100.0, 0.05, 0.2).unwrap();
    assert_abs_diff_eq!(c, bs.price_call(100.0, 1.0), epsilon = 0.01);
    assert_abs_diff_eq!(p, bs.price_put(100.0, 1.0), epsilon = 0.01);
    assert_abs_diff_eq!(c - p, 100.0 - 100.0 * (-0.05_f64).exp(), epsilon = 0.01);
}

#[test]
fn test_benchmark_table_calls() {
    for (id, &(spot, strike, maturity, rate, vol)) in BENCHMARK_CASES.iter().enumerate() {
        let s_max = (5.0 * strike).max(300.0);
        let mut engine = PdeEngine::new(config(maturity, rate, vol, s_max, 250, 2500));
        let call = VanillaPayoff::call(strike).unwrap();
        let pde = engine.solve(&call, spot).unwrap().price;

        let bs = BlackScholes::new(spot, rate, vol)
            .unwrap()
            .price_call(strike, maturity);
        assert!(
            (pde - bs).abs() < 0.05,
            "case {}: pde {} vs closed form {}",
            id + 1,
            pde,
            bs
        );
    }
}

#[test]
fn test_reference_greeks() {
    let mut engine = reference_engine(400, 1000);
    let call = VanillaPayoff::call(100.0).unwrap();
    let result = engine.solve(&call, 100.0).unwrap();

    let bs = BlackScholes::new(100.0, 0.05, 0.2).unwrap();
    let expected = bs.greeks(PayoffType::Call, 100.0, 1.0);

    // Greeks are taken at the lower node of the located cell.
    assert_abs_diff_eq!(result.delta, expected.delta, epsilon = 0.05);
    assert_abs_diff_eq!(result.gamma, expected.gamma, epsilon = 1e-3);
}

// ============================================================================
// Arbitrage Relations
// ============================================================================

#[test]
fn test_put_call_parity() {
    let mut engine = reference_engine(400, 1000);
    let call = VanillaPayoff::call(100.0).unwrap();
    let put = VanillaPayoff::put(100.0).unwrap();

    for spot in [80.0, 95.0, 100.0, 110.0, 130.0] {
        let c = engine.solve(&call, spot).unwrap().price;
        let p = engine.solve(&put, spot).unwrap().price;
        let forward = spot - 100.0 * (-0.05_f64).exp();
        assert_abs_diff_eq!(c - p, forward, epsilon = 0.02);
    }
}

#[test]
fn test_call_price_increases_with_spot() {
    let mut engine = reference_engine(250, 500);
    let call = VanillaPayoff::call(100.0).unwrap();
    let grid = engine.solve_grid(&call).unwrap();

    let prices: Vec<f64> = (0..=12)
        .map(|k| grid.price_at(70.0 + 5.0 * k as f64).unwrap().price)
        .collect();
    assert!(
        prices.windows(2).all(|w| w[0] < w[1]),
        "prices not increasing: {:?}",
        prices
    );
}

#[test]
fn test_put_price_decreases_with_spot() {
    let mut engine = reference_engine(250, 500);
    let put = VanillaPayoff::put(100.0).unwrap();
    let grid = engine.solve_grid(&put).unwrap();

    let prices: Vec<f64> = (0..=12)
        .map(|k| grid.price_at(70.0 + 5.0 * k as f64).unwrap().price)
        .collect();
    assert!(prices.windows(2).all(|w| w[0] > w[1]));
}

#[test]
fn test_gamma_non_negative_near_the_money() {
    let mut engine = reference_engine(250, 500);
    let call = VanillaPayoff::call(100.0).unwrap();
    let grid = engine.solve_grid(&call).unwrap();

    for spot in [60.0, 80.0, 90.0, 100.0, 110.0, 120.0, 150.0] {
        let result = grid.price_at(spot).unwrap();
        assert!(result.gamma >= 0.0, "gamma {} at spot {}", result.gamma, spot);
        assert!(result.delta >= 0.0 && result.delta <= 1.0);
    }
}

// ============================================================================
// Convergence
// ============================================================================

#[test]
fn test_refinement_reduces_error() {
    let call = VanillaPayoff::call(100.0).unwrap();
    let exact = BlackScholes::new(100.0, 0.05, 0.2)
        .unwrap()
        .price_call(100.0, 1.0);

    let coarse = reference_engine(50, 200).solve(&call, 100.0).unwrap().price;
    let fine = reference_engine(400, 1600).solve(&call, 100.0).unwrap().price;

    assert!(
        (fine - exact).abs() < (coarse - exact).abs(),
        "fine error {} not below coarse error {}",
        (fine - exact).abs(),
        (coarse - exact).abs()
    );
}

/// Doubling N and M at S_max = 400. The error is not monotone level by level
/// (the at-the-money spot moves relative to the nodes), so only the overall
/// trend is asserted.
#[test]
fn test_doubling_sweep_converges() {
    let call = VanillaPayoff::call(100.0).unwrap();
    let exact = BlackScholes::new(100.0, 0.05, 0.2)
        .unwrap()
        .price_call(100.0, 1.0);

    let errors: Vec<f64> = [(50, 200), (100, 400), (200, 800), (400, 1600), (800, 3200)]
        .iter()
        .map(|&(n, m)| {
            let mut engine = PdeEngine::new(config(1.0, 0.05, 0.2, 400.0, n, m));
            (engine.solve(&call, 100.0).unwrap().price - exact).abs()
        })
        .collect();

    let coarsest = errors[0];
    let finest = errors[errors.len() - 1];
    assert!(
        errors[1..].iter().all(|&e| e < coarsest),
        "errors: {:?}",
        errors
    );
    assert!(finest < 0.01, "errors: {:?}", errors);
}

// ============================================================================
// Schemes
// ============================================================================

#[test]
fn test_fully_implicit_converges() {
    let mut engine = PdeEngine::new(
        PdeConfig::builder()
            .maturity(1.0)
            .rate(0.05)
            .volatility(0.2)
            .s_max(500.0)
            .scheme(ThetaScheme::Implicit)
            .space_steps(300)
            .time_steps(2000)
            .build()
            .unwrap(),
    );
    let put = VanillaPayoff::put(100.0).unwrap();
    let price = engine.solve(&put, 100.0).unwrap().price;

    let bs = BlackScholes::new(100.0, 0.05, 0.2).unwrap();
    assert_abs_diff_eq!(price, bs.price_put(100.0, 1.0), epsilon = 0.05);
}

#[test]
fn test_explicit_with_small_time_step_converges() {
    // dt well inside the explicit stability limit dx² / σ².
    let mut engine = PdeEngine::new(
        PdeConfig::builder()
            .maturity(1.0)
            .rate(0.05)
            .volatility(0.2)
            .s_max(500.0)
            .scheme(ThetaScheme::Explicit)
            .space_steps(150)
            .time_steps(500)
            .build()
            .unwrap(),
    );
    let call = VanillaPayoff::call(100.0).unwrap();
    let price = engine.solve(&call, 100.0).unwrap().price;

    let bs = BlackScholes::new(100.0, 0.05, 0.2).unwrap();
    assert_abs_diff_eq!(price, bs.price_call(100.0, 1.0), epsilon = 0.05);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_invalid_spot_is_typed_error() {
    let mut engine = reference_engine(50, 50);
    let call = VanillaPayoff::call(100.0).unwrap();
    assert!(matches!(
        engine.solve(&call, -5.0),
        Err(PdeError::InvalidSpot(s)) if s == -5.0
    ));
}

#[test]
fn test_config_error_converts_into_pde_error() {
    fn build() -> Result<PdeEngine, PdeError> {
        let config = PdeConfig::builder()
            .maturity(1.0)
            .rate(0.05)
            .volatility(0.2)
            .s_max(500.0)
            .space_steps(2)
            .build()?;
        Ok(PdeEngine::new(config))
    }

    assert!(matches!(build(), Err(PdeError::Config(_))));
}
